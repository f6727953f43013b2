mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::ExposureSampler;
pub use progress::SessionProgress;
pub use service::{SaveOutcome, SurveySession};
pub use workflow::{SessionReport, SurveyLoopService};
