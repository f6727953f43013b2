//! Sources of headline/summary pairs for a survey.

mod cache;
mod news_api;

use async_trait::async_trait;
use survey_core::model::Exposure;

use crate::error::FetchError;

pub use cache::{CachedExposureProvider, DEFAULT_TTL_SECS, TtlCache};
pub use news_api::{MAX_PAGE_SIZE, NewsApiConfig, NewsApiProvider};

/// Fetches candidate exposures for a topic.
///
/// Implementations return at most `max_count` items, every one of them with a
/// non-empty headline and summary. Fewer items (including none) is a valid
/// answer; failures are not retried.
#[async_trait]
pub trait ExposureProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `FetchError` when the upstream call fails or answers with a
    /// non-success status.
    async fn fetch(&self, topic: &str, max_count: usize) -> Result<Vec<Exposure>, FetchError>;
}
