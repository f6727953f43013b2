mod done;
mod exposure;
mod init;
mod slider;
mod state;
mod survey_page;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use done::DonePanel;
pub use exposure::ExposurePanel;
pub use init::InitPanel;
pub use slider::RatingSlider;
pub use state::ViewError;
pub use survey_page::SurveyPage;
