use thiserror::Error;

use crate::model::{Exposure, Rating, SessionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadError {
    #[error("exposure count ({exposures}) does not match response count ({responses})")]
    LengthMismatch { exposures: usize, responses: usize },
}

/// One stored row per rated exposure.
///
/// Field order doubles as the export column order.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRow {
    pub session_id: SessionId,
    pub starting_score: Rating,
    pub exposure_index: u32,
    pub headline: String,
    pub summary: String,
    pub rating: Rating,
}

/// Pair every exposure with its rating.
///
/// Only meaningful once a session is done; callers must not rely on partial
/// output.
///
/// # Errors
///
/// Returns `PayloadError::LengthMismatch` when the two sequences differ in
/// length. Nothing is truncated.
pub fn assemble_rows(
    session_id: SessionId,
    starting_score: Rating,
    exposures: &[Exposure],
    responses: &[Rating],
) -> Result<Vec<PersistedRow>, PayloadError> {
    if exposures.len() != responses.len() {
        return Err(PayloadError::LengthMismatch {
            exposures: exposures.len(),
            responses: responses.len(),
        });
    }

    Ok(exposures
        .iter()
        .zip(responses)
        .zip(0_u32..)
        .map(|((exposure, rating), exposure_index)| PersistedRow {
            session_id,
            starting_score,
            exposure_index,
            headline: exposure.headline().to_owned(),
            summary: exposure.summary().to_owned(),
            rating: *rating,
        })
        .collect())
}
