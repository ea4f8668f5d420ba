use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a question within a question bank.
///
/// Banks use free-form string ids, so this wraps the raw string as supplied.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a generated report. Rendered as `sim_<uuid>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ReportId(Uuid);

const REPORT_PREFIX: &str = "sim_";

impl ReportId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({:?})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReportId({self})")
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REPORT_PREFIX}{}", self.0.simple())
    }
}

// ─── Parsing ───────────────────────────────────────────────────────────────────

/// Error type for parsing a `ReportId` from its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReportIdError {
    raw: String,
}

impl fmt::Display for ParseReportIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse ReportId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseReportIdError {}

impl FromStr for ReportId {
    type Err = ParseReportIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(REPORT_PREFIX)
            .and_then(|rest| Uuid::parse_str(rest).ok())
            .map(ReportId)
            .ok_or_else(|| ParseReportIdError { raw: s.to_string() })
    }
}

impl From<ReportId> for String {
    fn from(id: ReportId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ReportId {
    type Error = ParseReportIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
