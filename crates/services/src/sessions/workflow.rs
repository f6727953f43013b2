use std::sync::Arc;

use storage::ResponseStore;
use survey_core::ScoreReport;
use survey_core::model::{PersistedRow, Rating, SessionPhase};

use super::plan::ExposureSampler;
use super::service::{SaveOutcome, SurveySession};
use crate::Clock;
use crate::config::SurveySettings;
use crate::error::SessionError;
use crate::exposures::ExposureProvider;

/// Everything the final screen needs once a session is done.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub score: ScoreReport,
    pub rows: Vec<PersistedRow>,
    pub save: SaveOutcome,
}

/// Orchestrates session start (fetch + sample), rating, and the one-shot save.
#[derive(Clone)]
pub struct SurveyLoopService {
    clock: Clock,
    settings: SurveySettings,
    provider: Arc<dyn ExposureProvider>,
    responses: Arc<dyn ResponseStore>,
    sampler: Arc<ExposureSampler>,
}

impl SurveyLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: SurveySettings,
        provider: Arc<dyn ExposureProvider>,
        responses: Arc<dyn ResponseStore>,
    ) -> Self {
        Self {
            clock,
            settings,
            provider,
            responses,
            sampler: Arc::new(ExposureSampler::from_entropy()),
        }
    }

    #[must_use]
    pub fn with_sampler(mut self, sampler: ExposureSampler) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SurveySettings {
        &self.settings
    }

    #[must_use]
    pub fn store_backend(&self) -> &'static str {
        self.responses.backend()
    }

    /// Create a new session in the `Init` phase.
    #[must_use]
    pub fn start_session(&self) -> SurveySession {
        let session = SurveySession::new(self.clock.now());
        tracing::info!(session_id = %session.id(), "session created");
        session
    }

    /// Fetch candidates, sample them, and move the session out of `Init`.
    ///
    /// Makes exactly one provider call. On fetch failure the session stays in
    /// `Init` and the caller may try again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Init` (no fetch is
    /// made) and `SessionError::Fetch` when the provider fails.
    pub async fn begin(
        &self,
        session: &mut SurveySession,
        starting_score: Rating,
    ) -> Result<SessionPhase, SessionError> {
        if session.phase() != SessionPhase::Init {
            return Err(SessionError::InvalidTransition {
                action: "begin",
                phase: session.phase(),
            });
        }

        let candidates = self
            .provider
            .fetch(&self.settings.topic, self.settings.fetch_count)
            .await
            .inspect_err(|err| {
                tracing::warn!(session_id = %session.id(), error = %err, "exposure fetch failed");
            })?;
        let available = candidates.len();
        let exposures = self
            .sampler
            .sample(candidates, self.settings.target_sample_size);

        tracing::info!(
            session_id = %session.id(),
            starting_score = starting_score.value(),
            available,
            sampled = exposures.len(),
            "session begun"
        );
        if exposures.is_empty() {
            tracing::warn!(session_id = %session.id(), "no usable exposures; survey skipped");
        }

        session.begin_with(starting_score, exposures)
    }

    /// Record a rating for the current exposure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Survey`.
    pub fn next(
        &self,
        session: &mut SurveySession,
        rating: Rating,
    ) -> Result<SessionPhase, SessionError> {
        let index = session.current_index();
        let phase = session.next(rating)?;
        tracing::debug!(
            session_id = %session.id(),
            index,
            rating = rating.value(),
            phase = %phase,
            "rating recorded"
        );
        Ok(phase)
    }

    /// Score the finished session and hand its rows to the response store.
    ///
    /// The store is called at most once per session; later calls return the
    /// recorded outcome. A store failure is reported in the outcome, not as
    /// an error, so the rows stay available for export.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before `Done`.
    pub async fn finish(&self, session: &mut SurveySession) -> Result<SessionReport, SessionError> {
        let rows = session.rows()?;
        let score = session.score().ok_or(SessionError::InvalidTransition {
            action: "score",
            phase: session.phase(),
        })?;

        let save = match session.save_outcome() {
            Some(existing) => existing.clone(),
            None => {
                let outcome = self.persist(session, &rows).await;
                session.record_save(outcome.clone());
                outcome
            }
        };

        Ok(SessionReport { score, rows, save })
    }

    async fn persist(&self, session: &SurveySession, rows: &[PersistedRow]) -> SaveOutcome {
        match self.responses.insert_batch(rows).await {
            Ok(written) => {
                tracing::info!(
                    session_id = %session.id(),
                    backend = self.responses.backend(),
                    rows = written,
                    "responses saved"
                );
                SaveOutcome::Saved { rows: written }
            }
            Err(err) => {
                tracing::error!(
                    session_id = %session.id(),
                    backend = self.responses.backend(),
                    error = %err,
                    "saving responses failed"
                );
                SaveOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
