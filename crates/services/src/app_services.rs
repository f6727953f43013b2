use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::Storage;

use crate::Clock;
use crate::config::{StoreConfig, SurveyConfig, SurveySettings};
use crate::error::AppServicesError;
use crate::exposures::{CachedExposureProvider, ExposureProvider, NewsApiProvider};
use crate::sessions::SurveyLoopService;

/// Assembles app-facing services from resolved configuration.
#[derive(Clone)]
pub struct AppServices {
    survey_loop: Arc<SurveyLoopService>,
    export_dir: PathBuf,
    backend: &'static str,
}

impl AppServices {
    /// Build services for `config`: cached NewsAPI provider plus the
    /// configured response store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the `SQLite` store cannot be opened.
    pub async fn build(config: &SurveyConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = match &config.store {
            StoreConfig::Supabase(supabase) => Storage::supabase(supabase.clone()),
            StoreConfig::Sqlite { url } => Storage::sqlite(url).await?,
        };
        let news: Arc<dyn ExposureProvider> = Arc::new(NewsApiProvider::new(config.news.clone()));
        let provider: Arc<dyn ExposureProvider> =
            Arc::new(CachedExposureProvider::new(news, config.cache_ttl).with_clock(clock));

        Ok(Self::from_parts(
            SurveyLoopService::new(clock, config.settings.clone(), provider, storage.responses),
            config.export_dir.clone(),
        ))
    }

    /// Wrap an already-built survey loop.
    #[must_use]
    pub fn from_parts(survey_loop: SurveyLoopService, export_dir: impl Into<PathBuf>) -> Self {
        let backend = survey_loop.store_backend();
        Self {
            survey_loop: Arc::new(survey_loop),
            export_dir: export_dir.into(),
            backend,
        }
    }

    #[must_use]
    pub fn survey_loop(&self) -> Arc<SurveyLoopService> {
        Arc::clone(&self.survey_loop)
    }

    #[must_use]
    pub fn settings(&self) -> &SurveySettings {
        self.survey_loop.settings()
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Name of the response store in use, for logs and the status line.
    #[must_use]
    pub fn store_backend(&self) -> &'static str {
        self.backend
    }
}
