use std::fmt;

/// Coarse-grained stage of a survey session.
///
/// Phases only ever advance: `Init` → `Survey` → `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionPhase {
    /// Waiting for the starting score.
    Init,
    /// Exposures are being shown and rated.
    Survey,
    /// Every exposure has been rated.
    Done,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Init => "init",
            SessionPhase::Survey => "survey",
            SessionPhase::Done => "done",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Done)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
