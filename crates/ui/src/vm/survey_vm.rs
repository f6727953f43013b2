use services::{SessionError, SessionReport, SurveyLoopService, SurveySession};
use survey_core::model::{Rating, SessionPhase};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurveyIntent {
    Begin(Rating),
    Next(Rating),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurveyOutcome {
    Continue,
    Completed,
}

/// UI-side owner of one participant's session and, once done, its report.
pub struct SurveyVm {
    session: SurveySession,
    report: Option<SessionReport>,
}

fn map_session_error(err: &SessionError) -> ViewError {
    match err {
        SessionError::Fetch(_) => ViewError::FetchFailed,
        _ => ViewError::Unknown,
    }
}

impl SurveyVm {
    #[must_use]
    pub fn new(session: SurveySession) -> Self {
        Self {
            session,
            report: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn session(&self) -> &SurveySession {
        &self.session
    }

    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// # Errors
    ///
    /// Returns `ViewError::FetchFailed` when no stories could be loaded; the
    /// session stays on the start screen.
    pub async fn begin(
        &mut self,
        survey_loop: &SurveyLoopService,
        starting_score: Rating,
    ) -> Result<SurveyOutcome, ViewError> {
        let phase = survey_loop
            .begin(&mut self.session, starting_score)
            .await
            .map_err(|err| map_session_error(&err))?;
        self.settle(survey_loop, phase).await
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session is not accepting ratings.
    pub async fn next(
        &mut self,
        survey_loop: &SurveyLoopService,
        rating: Rating,
    ) -> Result<SurveyOutcome, ViewError> {
        let phase = survey_loop
            .next(&mut self.session, rating)
            .map_err(|err| map_session_error(&err))?;
        self.settle(survey_loop, phase).await
    }

    async fn settle(
        &mut self,
        survey_loop: &SurveyLoopService,
        phase: SessionPhase,
    ) -> Result<SurveyOutcome, ViewError> {
        if phase != SessionPhase::Done {
            return Ok(SurveyOutcome::Continue);
        }
        let report = survey_loop
            .finish(&mut self.session)
            .await
            .map_err(|err| map_session_error(&err))?;
        self.report = Some(report);
        Ok(SurveyOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use services::{Clock, ExposureProvider, FetchError, SurveySettings};
    use storage::InMemoryResponseStore;
    use survey_core::model::Exposure;

    use super::*;

    struct FixedProvider(usize);

    #[async_trait]
    impl ExposureProvider for FixedProvider {
        async fn fetch(&self, _topic: &str, _max: usize) -> Result<Vec<Exposure>, FetchError> {
            Ok((0..self.0)
                .map(|i| Exposure::new(format!("H{i}"), format!("S{i}")).unwrap())
                .collect())
        }
    }

    fn survey_loop(items: usize) -> SurveyLoopService {
        SurveyLoopService::new(
            Clock::default_clock(),
            SurveySettings {
                topic: "topic".into(),
                target_sample_size: 10,
                fetch_count: 10,
            },
            Arc::new(FixedProvider(items)),
            Arc::new(InMemoryResponseStore::new()),
        )
    }

    #[tokio::test]
    async fn outcome_tracks_completion() {
        let service = survey_loop(1);
        let mut vm = SurveyVm::new(service.start_session());
        let begun = vm.begin(&service, Rating::default()).await.unwrap();
        assert_eq!(begun, SurveyOutcome::Continue);
        assert!(vm.report().is_none());

        let last = vm.next(&service, Rating::new(70.0).unwrap()).await.unwrap();
        assert_eq!(last, SurveyOutcome::Completed);
        assert_eq!(vm.report().unwrap().rows.len(), 1);
    }

    #[tokio::test]
    async fn empty_story_set_completes_on_begin() {
        let service = survey_loop(0);
        let mut vm = SurveyVm::new(service.start_session());
        let outcome = vm.begin(&service, Rating::default()).await.unwrap();
        assert_eq!(outcome, SurveyOutcome::Completed);
        assert_eq!(vm.phase(), SessionPhase::Done);
    }
}
