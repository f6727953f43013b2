use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use survey_core::model::Exposure;

use super::ExposureProvider;
use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// NewsAPI caps `pageSize` at this value.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Clone)]
pub struct NewsApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl NewsApiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn everything_url(&self) -> String {
        format!("{}/everything", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Article search against NewsAPI's `/everything` endpoint, matching the
/// topic in titles only, newest first.
#[derive(Clone)]
pub struct NewsApiProvider {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiProvider {
    #[must_use]
    pub fn new(config: NewsApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn query<'a>(&'a self, topic: &'a str, page_size: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("qInTitle", topic),
            ("language", "en"),
            ("sortBy", "publishedAt"),
            ("pageSize", page_size),
            ("apiKey", self.config.api_key.as_str()),
        ]
    }
}

#[async_trait]
impl ExposureProvider for NewsApiProvider {
    async fn fetch(&self, topic: &str, max_count: usize) -> Result<Vec<Exposure>, FetchError> {
        if max_count == 0 {
            return Ok(Vec::new());
        }
        let page_size = max_count.min(MAX_PAGE_SIZE).to_string();

        tracing::debug!(topic, page_size = %page_size, "requesting articles");
        let response = self
            .client
            .get(self.config.everything_url())
            .query(&self.query(topic, &page_size))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body: EverythingResponse = response.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(FetchError::Api(
                body.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let mut exposures = articles_to_exposures(body.articles);
        exposures.truncate(max_count);
        Ok(exposures)
    }
}

#[derive(Debug, Default, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Default, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keeps articles that have a title plus a description (or, failing that,
/// content). The description wins when both are present.
fn articles_to_exposures(articles: Vec<Article>) -> Vec<Exposure> {
    articles
        .into_iter()
        .filter_map(|article| {
            let title = non_blank(article.title)?;
            let summary = non_blank(article.description).or_else(|| non_blank(article.content))?;
            Exposure::new(title, summary).ok()
        })
        .collect()
}
