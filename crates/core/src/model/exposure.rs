use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExposureError {
    #[error("exposure headline is empty")]
    EmptyHeadline,

    #[error("exposure summary is empty")]
    EmptySummary,
}

/// One headline/summary pair shown to the participant for rating.
///
/// Both fields are guaranteed non-empty; source items that fail this check
/// are dropped by the provider before sampling ever sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    headline: String,
    summary: String,
}

impl Exposure {
    /// Build an exposure, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ExposureError::EmptyHeadline` or `ExposureError::EmptySummary`
    /// when either field is blank.
    pub fn new(
        headline: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<Self, ExposureError> {
        let headline = headline.into().trim().to_owned();
        let summary = summary.into().trim().to_owned();
        if headline.is_empty() {
            return Err(ExposureError::EmptyHeadline);
        }
        if summary.is_empty() {
            return Err(ExposureError::EmptySummary);
        }
        Ok(Self { headline, summary })
    }

    #[must_use]
    pub fn headline(&self) -> &str {
        &self.headline
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }
}
