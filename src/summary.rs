use std::fmt;

use thousands::Separable;

use crate::systems::{EndReason, SessionState};

/// The outcome of a session, shown once it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub total_notes: u32,
    /// Truncated; 0 when no notes were spawned.
    pub completion_percent: u32,
    /// `None` while the session is still running.
    pub reason: Option<EndReason>,
}

impl SessionSummary {
    pub fn from_state(state: &SessionState, reason: Option<EndReason>) -> Self {
        Self {
            score: state.score,
            total_notes: state.total_notes_spawned,
            completion_percent: state.completion_percent(),
            reason,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score.separate_with_commas())?;
        writeln!(f, "Notes: {}", self.total_notes.separate_with_commas())?;
        write!(f, "Completion: {}%", self.completion_percent)?;
        if let Some(reason) = self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
