mod exposure_vm;
mod report_vm;
mod survey_vm;

pub use exposure_vm::{ExposureCardVm, map_exposure_card};
pub use report_vm::{ReportVm, map_report};
pub use survey_vm::{SurveyIntent, SurveyOutcome, SurveyVm};
