use services::SurveySession;
use survey_core::model::Rating;

/// What the survey screen shows for the exposure awaiting a rating.
#[derive(Clone, Debug, PartialEq)]
pub struct ExposureCardVm {
    pub index: usize,
    pub progress_label: String,
    pub headline: String,
    pub summary: String,
    pub default_rating: Rating,
}

#[must_use]
pub fn map_exposure_card(session: &SurveySession) -> Option<ExposureCardVm> {
    let exposure = session.current_exposure()?;
    let progress = session.progress();
    let position = progress.position()?;
    Some(ExposureCardVm {
        index: session.current_index(),
        progress_label: format!("Story {position} of {}", progress.total),
        headline: exposure.headline().to_string(),
        summary: exposure.summary().to_string(),
        default_rating: session.default_rating().unwrap_or_default(),
    })
}
