use std::path::{Path, PathBuf};
use std::sync::Arc;

use services::SurveyLoopService;

pub trait UiApp: Send + Sync {
    fn survey_loop(&self) -> Arc<SurveyLoopService>;
    fn export_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    survey_loop: Arc<SurveyLoopService>,
    topic: String,
    export_dir: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let survey_loop = app.survey_loop();
        let topic = survey_loop.settings().topic.clone();
        Self {
            survey_loop,
            topic,
            export_dir: app.export_dir(),
        }
    }

    #[must_use]
    pub fn survey_loop(&self) -> Arc<SurveyLoopService> {
        Arc::clone(&self.survey_loop)
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
