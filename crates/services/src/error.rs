//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::StorageError;
use storage::sqlite::SqliteInitError;
use survey_core::model::{PayloadError, SessionPhase};

/// Errors emitted by exposure providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("article search failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("article search returned an error: {0}")]
    Api(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the session state machine and the survey loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while the session is in the {phase} phase")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error("could not load stories: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Errors emitted while resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing required credential {name}")]
    MissingCredential { name: &'static str },
    #[error("invalid value for {name}: {raw}")]
    InvalidValue { name: &'static str, raw: String },
    #[error("failed to read secrets file {path}: {source}")]
    ReadSecrets {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse secrets file: {0}")]
    ParseSecrets(#[from] toml::de::Error),
}

/// Errors emitted while producing the local CSV export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("export is not valid UTF-8")]
    Encoding,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
