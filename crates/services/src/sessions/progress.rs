use serde::Serialize;

use quiz_core::model::{Question, SessionState};

/// Owned view of a session for UI binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub current_index: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining_secs: u32,
    pub elapsed_secs: u32,
    pub remaining_clock: String,
    pub elapsed_clock: String,
    pub progress_percent: u32,
    pub current_question: Option<Question>,
}

/// Render seconds as zero-padded `MM:SS`. Minutes are not wrapped at 60.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
