#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod export;
pub mod exposures;
pub mod sessions;

pub use survey_core::Clock;

pub use app_services::AppServices;
pub use config::{StoreConfig, SurveyConfig, SurveySettings};
pub use error::{AppServicesError, ConfigError, ExportError, FetchError, SessionError};
pub use exposures::{CachedExposureProvider, ExposureProvider, NewsApiConfig, NewsApiProvider};
pub use sessions::{
    ExposureSampler, SaveOutcome, SessionProgress, SessionReport, SurveyLoopService, SurveySession,
};
