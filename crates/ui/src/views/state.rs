#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    FetchFailed,
    ExportFailed,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::FetchFailed => "Could not load stories right now. Please try again.",
            ViewError::ExportFailed => "Could not write the export file.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}
