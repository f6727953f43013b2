use chrono::{DateTime, Utc};
use std::fmt;

use survey_core::model::{
    Exposure, PersistedRow, Rating, SessionId, SessionPhase, assemble_rows,
};
use survey_core::ScoreReport;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SAVE OUTCOME ──────────────────────────────────────────────────────────────
//

/// What happened when the finished session was handed to the response store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { rows: usize },
    Failed { reason: String },
}

impl SaveOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one participant's survey.
///
/// The phase only moves forward (`Init` → `Survey` → `Done`). The current
/// exposure index is always the number of ratings collected so far, so the
/// two can never drift apart.
#[derive(Clone)]
pub struct SurveySession {
    id: SessionId,
    phase: SessionPhase,
    started_at: DateTime<Utc>,
    starting_score: Option<Rating>,
    exposures: Vec<Exposure>,
    responses: Vec<Rating>,
    save: Option<SaveOutcome>,
}

impl SurveySession {
    /// Create a fresh session in the `Init` phase with a new identifier.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self::with_id(SessionId::generate(), started_at)
    }

    #[must_use]
    pub fn with_id(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            phase: SessionPhase::Init,
            started_at,
            starting_score: None,
            exposures: Vec::new(),
            responses: Vec::new(),
            save: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Set once the session leaves `Init`.
    #[must_use]
    pub fn starting_score(&self) -> Option<Rating> {
        self.starting_score
    }

    #[must_use]
    pub fn exposures(&self) -> &[Exposure] {
        &self.exposures
    }

    #[must_use]
    pub fn responses(&self) -> &[Rating] {
        &self.responses
    }

    /// Index of the exposure awaiting a rating.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn current_exposure(&self) -> Option<&Exposure> {
        if self.phase == SessionPhase::Survey {
            self.exposures.get(self.current_index())
        } else {
            None
        }
    }

    /// Pre-filled value for the current rating control.
    ///
    /// Anchors on the most recent judgment: the starting score for the first
    /// exposure, the previous rating afterwards. `None` outside `Survey`.
    #[must_use]
    pub fn default_rating(&self) -> Option<Rating> {
        if self.phase != SessionPhase::Survey {
            return None;
        }
        self.responses.last().copied().or(self.starting_score)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.exposures.len();
        let answered = self.responses.len();
        SessionProgress {
            total,
            answered,
            is_complete: self.is_complete(),
        }
    }

    /// Leave `Init` with the given starting score and the exposures to show.
    ///
    /// An empty exposure list completes the session immediately.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Init`; the session
    /// is left untouched.
    pub fn begin_with(
        &mut self,
        starting_score: Rating,
        exposures: Vec<Exposure>,
    ) -> Result<SessionPhase, SessionError> {
        self.expect_phase(SessionPhase::Init, "begin")?;

        self.starting_score = Some(starting_score);
        self.exposures = exposures;
        self.responses = Vec::with_capacity(self.exposures.len());
        self.phase = if self.exposures.is_empty() {
            SessionPhase::Done
        } else {
            SessionPhase::Survey
        };
        Ok(self.phase)
    }

    /// Record the rating for the current exposure and advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Survey`; the session
    /// is left untouched.
    pub fn next(&mut self, rating: Rating) -> Result<SessionPhase, SessionError> {
        self.expect_phase(SessionPhase::Survey, "record a rating")?;

        self.responses.push(rating);
        if self.responses.len() >= self.exposures.len() {
            self.phase = SessionPhase::Done;
        }
        Ok(self.phase)
    }

    /// Volatility score for a finished session.
    #[must_use]
    pub fn score(&self) -> Option<ScoreReport> {
        if !self.is_complete() {
            return None;
        }
        let start = self.starting_score?;
        Some(ScoreReport::from_responses(start, &self.responses))
    }

    /// Rows to persist/export, one per exposure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before `Done`, or
    /// `SessionError::Payload` if exposures and ratings disagree in length.
    pub fn rows(&self) -> Result<Vec<PersistedRow>, SessionError> {
        self.expect_phase(SessionPhase::Done, "assemble rows")?;
        let start = self.starting_score.ok_or(SessionError::InvalidTransition {
            action: "assemble rows",
            phase: self.phase,
        })?;
        Ok(assemble_rows(self.id, start, &self.exposures, &self.responses)?)
    }

    #[must_use]
    pub fn save_outcome(&self) -> Option<&SaveOutcome> {
        self.save.as_ref()
    }

    pub(crate) fn record_save(&mut self, outcome: SaveOutcome) {
        self.save = Some(outcome);
    }

    fn expect_phase(&self, expected: SessionPhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }
}

impl fmt::Debug for SurveySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveySession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("starting_score", &self.starting_score)
            .field("exposures_len", &self.exposures.len())
            .field("responses_len", &self.responses.len())
            .field("save", &self.save)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
