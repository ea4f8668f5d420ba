use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::question::{Difficulty, Question};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("question count must be at least 1")]
    ZeroQuestions,

    #[error("duration must be at least 1 minute")]
    ZeroDuration,

    #[error("invalid difficulty filter: {0}")]
    InvalidDifficulty(String),
}

//
// ─── DIFFICULTY FILTER ─────────────────────────────────────────────────────────
//

/// Either a single difficulty tier or every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(tier) => tier == difficulty,
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyFilter::All => f.write_str("all"),
            DifficultyFilter::Only(tier) => tier.fmt(f),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("todas") {
            return Ok(DifficultyFilter::All);
        }
        trimmed
            .parse::<Difficulty>()
            .map(DifficultyFilter::Only)
            .map_err(|_| ConfigError::InvalidDifficulty(s.to_string()))
    }
}

impl From<DifficultyFilter> for String {
    fn from(filter: DifficultyFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for DifficultyFilter {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(tier: Difficulty) -> Self {
        DifficultyFilter::Only(tier)
    }
}

//
// ─── SIMULATOR CONFIG ──────────────────────────────────────────────────────────
//

/// Parameters of a quiz attempt. Snapshotted into every report.
///
/// Deserialization goes through [`SimulatorConfig::new`], so zero counts or
/// durations are rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSimulatorConfig")]
pub struct SimulatorConfig {
    difficulty: DifficultyFilter,
    question_count: u32,
    duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl SimulatorConfig {
    pub const DEFAULT_QUESTION_COUNT: u32 = 10;
    pub const DEFAULT_DURATION_MINUTES: u32 = 30;

    /// # Errors
    ///
    /// Returns `ConfigError::ZeroQuestions` or `ConfigError::ZeroDuration`
    /// when either value is zero.
    pub fn new(
        difficulty: DifficultyFilter,
        question_count: u32,
        duration_minutes: u32,
    ) -> Result<Self, ConfigError> {
        if question_count == 0 {
            return Err(ConfigError::ZeroQuestions);
        }
        if duration_minutes == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(Self {
            difficulty,
            question_count,
            duration_minutes,
            category: None,
        })
    }

    /// Restrict selection to one category. Blank names clear the filter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        let trimmed = category.trim();
        self.category = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyFilter {
        self.difficulty
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether `question` passes the difficulty and category filters.
    #[must_use]
    pub fn admits(&self, question: &Question) -> bool {
        self.difficulty.matches(question.difficulty)
            && self
                .category
                .as_deref()
                .is_none_or(|wanted| question.category.as_deref() == Some(wanted))
    }
}

/// Unvalidated wire form of [`SimulatorConfig`].
#[derive(Deserialize)]
struct RawSimulatorConfig {
    difficulty: DifficultyFilter,
    question_count: u32,
    duration_minutes: u32,
    #[serde(default)]
    category: Option<String>,
}

impl TryFrom<RawSimulatorConfig> for SimulatorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSimulatorConfig) -> Result<Self, Self::Error> {
        let config = Self::new(raw.difficulty, raw.question_count, raw.duration_minutes)?;
        Ok(match raw.category {
            Some(category) => config.with_category(category),
            None => config,
        })
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyFilter::All,
            question_count: Self::DEFAULT_QUESTION_COUNT,
            duration_minutes: Self::DEFAULT_DURATION_MINUTES,
            category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerValue, QuestionKind};

    fn question(difficulty: Difficulty, category: Option<&str>) -> Question {
        let q = Question::new("q", "p", QuestionKind::TrueFalse, difficulty, AnswerValue::scalar("t"));
        match category {
            Some(c) => q.with_category(c),
            None => q,
        }
    }

    #[test]
    fn rejects_zero_values() {
        assert_eq!(
            SimulatorConfig::new(DifficultyFilter::All, 0, 5),
            Err(ConfigError::ZeroQuestions)
        );
        assert_eq!(
            SimulatorConfig::new(DifficultyFilter::All, 5, 0),
            Err(ConfigError::ZeroDuration)
        );
    }

    #[test]
    fn default_matches_simulator_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.difficulty(), DifficultyFilter::All);
        assert_eq!(config.question_count(), 10);
        assert_eq!(config.duration_secs(), 1_800);
    }

    #[test]
    fn filter_parses_all_and_tiers() {
        assert_eq!("todas".parse::<DifficultyFilter>().unwrap(), DifficultyFilter::All);
        assert_eq!(
            "basica".parse::<DifficultyFilter>().unwrap(),
            DifficultyFilter::Only(Difficulty::Basic)
        );
        assert!(matches!(
            "hard".parse::<DifficultyFilter>(),
            Err(ConfigError::InvalidDifficulty(_))
        ));
    }

    #[test]
    fn admits_applies_both_filters() {
        let config = SimulatorConfig::new(Difficulty::Basic.into(), 3, 1)
            .unwrap()
            .with_category("redes");

        assert!(config.admits(&question(Difficulty::Basic, Some("redes"))));
        assert!(!config.admits(&question(Difficulty::Basic, Some("bd"))));
        assert!(!config.admits(&question(Difficulty::Basic, None)));
        assert!(!config.admits(&question(Difficulty::Advanced, Some("redes"))));
    }

    #[test]
    fn blank_category_clears_filter() {
        let config = SimulatorConfig::default().with_category("   ");
        assert_eq!(config.category(), None);
    }

    #[test]
    fn deserializing_rejects_zero_values() {
        let zero_count = r#"{"difficulty":"all","question_count":0,"duration_minutes":5}"#;
        let err = serde_json::from_str::<SimulatorConfig>(zero_count).unwrap_err();
        assert!(err.to_string().contains("question count must be at least 1"));

        let zero_minutes = r#"{"difficulty":"basic","question_count":3,"duration_minutes":0}"#;
        let err = serde_json::from_str::<SimulatorConfig>(zero_minutes).unwrap_err();
        assert!(err.to_string().contains("duration must be at least 1 minute"));
    }

    #[test]
    fn deserializes_through_the_validating_constructor() {
        let raw = r#"{"difficulty":"avanzada","question_count":4,"duration_minutes":2,"category":"redes"}"#;
        let config: SimulatorConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.difficulty(), DifficultyFilter::Only(Difficulty::Advanced));
        assert_eq!(config.question_count(), 4);
        assert_eq!(config.duration_secs(), 120);
        assert_eq!(config.category(), Some("redes"));

        let back: SimulatorConfig =
            serde_json::from_value(serde_json::to_value(&config).unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn serializes_filter_as_string() {
        let config = SimulatorConfig::new(Difficulty::Intermediate.into(), 4, 2).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["difficulty"], "intermediate");
    }
}
