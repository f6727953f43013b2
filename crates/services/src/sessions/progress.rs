/// Aggregated view of survey progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// One-based position of the exposure currently shown, if any.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        (self.answered < self.total).then_some(self.answered + 1)
    }
}
