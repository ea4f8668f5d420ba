use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a quiz attempt.
///
/// `Configuring → Running ⇄ Paused → Finished → Reviewing`, with `reset`
/// returning to `Configuring` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Configuring,
    Running,
    Paused,
    Finished,
    Reviewing,
}

impl SessionState {
    /// True while an attempt is underway (running or paused).
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Running | SessionState::Paused)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Configuring => "configuring",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
            SessionState::Reviewing => "reviewing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
