use services::{SaveOutcome, SessionReport};

/// Final screen labels, all numbers with one decimal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub title: String,
    pub start: String,
    pub end: String,
    pub avg_delta: String,
    pub rated: usize,
    pub save_status: String,
    pub saved: bool,
}

#[must_use]
pub fn map_report(report: &SessionReport) -> ReportVm {
    let score = &report.score;
    let (save_status, saved) = match &report.save {
        SaveOutcome::Saved { rows } => (format!("Responses saved ({rows} rows)."), true),
        SaveOutcome::Failed { reason } => (format!("Could not save responses: {reason}"), false),
    };
    ReportVm {
        title: format!("Level {}: {}", score.level.level(), score.level.label()),
        start: format!("{:.1}", score.start.value()),
        end: score
            .end
            .map_or_else(|| "n/a".to_string(), |end| format!("{:.1}", end.value())),
        avg_delta: format!("{:.1}", score.avg_delta),
        rated: report.rows.len(),
        save_status,
        saved,
    }
}
