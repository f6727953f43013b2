//! Deployment configuration.
//!
//! Values are layered: the `secrets.toml` file first, then environment
//! variables, then whatever the binary overrides from its command line.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;
use storage::supabase::SupabaseConfig;

use crate::error::ConfigError;
use crate::exposures::{MAX_PAGE_SIZE, NewsApiConfig};

pub const DEFAULT_TOPIC: &str = "Pete Buttigieg";
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_FETCH_COUNT: usize = 10;
pub const DEFAULT_SQLITE_URL: &str = "sqlite://survey.sqlite3";
pub const DEFAULT_CACHE_TTL_SECS: i64 = crate::exposures::DEFAULT_TTL_SECS;

/// Fixed-per-deployment survey shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySettings {
    pub topic: String,
    /// Upper bound on exposures shown per session.
    pub target_sample_size: usize,
    /// Candidates requested from the provider per `begin`.
    pub fetch_count: usize,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            target_sample_size: DEFAULT_SAMPLE_SIZE,
            fetch_count: DEFAULT_FETCH_COUNT,
        }
    }
}

impl SurveySettings {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty topic, a zero sample
    /// size, or a fetch count outside `1..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "SURVEY_TOPIC",
                raw: self.topic.clone(),
            });
        }
        if self.target_sample_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SURVEY_SAMPLE_SIZE",
                raw: "0".into(),
            });
        }
        if self.fetch_count == 0 || self.fetch_count > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                name: "SURVEY_FETCH_COUNT",
                raw: self.fetch_count.to_string(),
            });
        }
        Ok(())
    }
}

/// Where finished sessions are written.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Supabase(SupabaseConfig),
    Sqlite { url: String },
}

impl StoreConfig {
    #[must_use]
    pub fn backend(&self) -> &'static str {
        match self {
            StoreConfig::Supabase(_) => "supabase",
            StoreConfig::Sqlite { .. } => "sqlite",
        }
    }
}

/// `secrets.toml` layout.
///
/// ```toml
/// [news]
/// api_key = "..."
///
/// [supabase]
/// url = "https://project.supabase.co"
/// key = "..."
/// table = "infdriven"   # optional
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    #[serde(default)]
    pub news: Option<NewsSecrets>,
    #[serde(default)]
    pub supabase: Option<SupabaseSecrets>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsSecrets {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupabaseSecrets {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
}

impl SecretsFile {
    /// # Errors
    ///
    /// Returns `ConfigError::ParseSecrets` for malformed TOML.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load the file if it exists; a missing file is an empty one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadSecrets` when the file exists but cannot be
    /// read, or `ConfigError::ParseSecrets` for malformed TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::ReadSecrets {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Fully resolved configuration for one deployment.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub settings: SurveySettings,
    pub news: NewsApiConfig,
    pub store: StoreConfig,
    pub cache_ttl: Duration,
    pub export_dir: PathBuf,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_count(name: &'static str, raw: Option<String>, default: usize) -> Result<usize, ConfigError> {
    match non_blank(raw) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, raw }),
    }
}

impl SurveyConfig {
    /// Resolve configuration from the process environment plus an optional
    /// secrets file.
    ///
    /// # Errors
    ///
    /// See [`SurveyConfig::resolve`].
    pub fn from_env(secrets_path: Option<&Path>) -> Result<Self, ConfigError> {
        let secrets = match secrets_path {
            Some(path) => SecretsFile::load(path)?,
            None => SecretsFile::default(),
        };
        Self::resolve(secrets, |name| std::env::var(name).ok())
    }

    /// Combine secrets with environment lookups (environment wins).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when no NewsAPI key is
    /// available or when only half of the Supabase credentials are set, and
    /// `ConfigError::InvalidValue` for unparsable numbers.
    pub fn resolve(
        secrets: SecretsFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let news_secrets = secrets.news.unwrap_or_default();
        let api_key = non_blank(env("NEWSAPI_KEY"))
            .or(non_blank(news_secrets.api_key))
            .ok_or(ConfigError::MissingCredential {
                name: "NEWSAPI_KEY",
            })?;
        let mut news = NewsApiConfig::new(api_key);
        if let Some(base_url) = non_blank(env("NEWSAPI_BASE_URL")).or(non_blank(news_secrets.base_url)) {
            news = news.with_base_url(base_url);
        }

        let supabase = secrets.supabase.unwrap_or_default();
        let supabase_url = non_blank(env("SUPABASE_URL")).or(non_blank(supabase.url));
        let supabase_key = non_blank(env("SUPABASE_KEY")).or(non_blank(supabase.key));
        let store = match (supabase_url, supabase_key) {
            (Some(url), Some(key)) => {
                let mut config = SupabaseConfig::new(url, key);
                if let Some(table) = non_blank(supabase.table) {
                    config = config.with_table(table);
                }
                StoreConfig::Supabase(config)
            }
            (Some(_), None) => return Err(ConfigError::MissingCredential { name: "SUPABASE_KEY" }),
            (None, Some(_)) => return Err(ConfigError::MissingCredential { name: "SUPABASE_URL" }),
            (None, None) => StoreConfig::Sqlite {
                url: non_blank(env("SURVEY_DB_URL")).unwrap_or_else(|| DEFAULT_SQLITE_URL.into()),
            },
        };

        let settings = SurveySettings {
            topic: non_blank(env("SURVEY_TOPIC")).unwrap_or_else(|| DEFAULT_TOPIC.into()),
            target_sample_size: parse_count(
                "SURVEY_SAMPLE_SIZE",
                env("SURVEY_SAMPLE_SIZE"),
                DEFAULT_SAMPLE_SIZE,
            )?,
            fetch_count: parse_count(
                "SURVEY_FETCH_COUNT",
                env("SURVEY_FETCH_COUNT"),
                DEFAULT_FETCH_COUNT,
            )?,
        };
        settings.validate()?;

        let export_dir = non_blank(env("SURVEY_EXPORT_DIR")).map_or_else(|| PathBuf::from("."), PathBuf::from);

        Ok(Self {
            settings,
            news,
            store,
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            export_dir,
        })
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.settings.topic = topic.into();
        self
    }

    #[must_use]
    pub fn with_target_sample_size(mut self, size: usize) -> Self {
        self.settings.target_sample_size = size;
        self
    }

    #[must_use]
    pub fn with_fetch_count(mut self, count: usize) -> Self {
        self.settings.fetch_count = count;
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_news_key_is_fatal() {
        let err = SurveyConfig::resolve(SecretsFile::default(), env_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential {
                name: "NEWSAPI_KEY"
            }
        ));

        let blank = SurveyConfig::resolve(SecretsFile::default(), env_from(&[("NEWSAPI_KEY", "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn defaults_fall_back_to_sqlite() {
        let config =
            SurveyConfig::resolve(SecretsFile::default(), env_from(&[("NEWSAPI_KEY", "k")])).unwrap();
        assert_eq!(config.settings, SurveySettings::default());
        assert_eq!(config.news.api_key, "k");
        assert!(matches!(config.store, StoreConfig::Sqlite { ref url } if url == DEFAULT_SQLITE_URL));
        assert_eq!(config.cache_ttl, Duration::hours(1));
    }

    #[test]
    fn secrets_file_supplies_credentials() {
        let secrets = SecretsFile::parse(
            r#"
                [news]
                api_key = "from-file"

                [supabase]
                url = "https://proj.supabase.co"
                key = "anon"
            "#,
        )
        .unwrap();
        let config = SurveyConfig::resolve(secrets, env_from(&[])).unwrap();

        assert_eq!(config.news.api_key, "from-file");
        match config.store {
            StoreConfig::Supabase(supabase) => {
                assert_eq!(supabase.url, "https://proj.supabase.co");
                assert_eq!(supabase.key, "anon");
                assert_eq!(supabase.table, "infdriven");
            }
            other @ StoreConfig::Sqlite { .. } => panic!("unexpected store {other:?}"),
        }
    }

    #[test]
    fn environment_overrides_file() {
        let secrets = SecretsFile::parse("[news]\napi_key = \"file\"\n").unwrap();
        let config = SurveyConfig::resolve(
            secrets,
            env_from(&[
                ("NEWSAPI_KEY", "env"),
                ("SURVEY_TOPIC", "Someone Else"),
                ("SURVEY_SAMPLE_SIZE", "5"),
                ("SURVEY_FETCH_COUNT", "20"),
            ]),
        )
        .unwrap();
        assert_eq!(config.news.api_key, "env");
        assert_eq!(config.settings.topic, "Someone Else");
        assert_eq!(config.settings.target_sample_size, 5);
        assert_eq!(config.settings.fetch_count, 20);
    }

    #[test]
    fn half_configured_supabase_is_rejected() {
        let err = SurveyConfig::resolve(
            SecretsFile::default(),
            env_from(&[("NEWSAPI_KEY", "k"), ("SUPABASE_URL", "https://x")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential {
                name: "SUPABASE_KEY"
            }
        ));
    }

    #[test]
    fn invalid_counts_are_rejected() {
        let err = SurveyConfig::resolve(
            SecretsFile::default(),
            env_from(&[("NEWSAPI_KEY", "k"), ("SURVEY_SAMPLE_SIZE", "ten")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = SurveyConfig::resolve(
            SecretsFile::default(),
            env_from(&[("NEWSAPI_KEY", "k"), ("SURVEY_FETCH_COUNT", "500")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "SURVEY_FETCH_COUNT",
                ..
            }
        ));
    }

    #[test]
    fn missing_secrets_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = SecretsFile::load(&dir.path().join("absent.toml")).unwrap();
        assert!(secrets.news.is_none());
        assert!(secrets.supabase.is_none());
    }

    #[test]
    fn malformed_secrets_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "[news\napi_key = ").unwrap();
        assert!(matches!(
            SecretsFile::load(&path),
            Err(ConfigError::ParseSecrets(_))
        ));
    }
}
