use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::AnswerRecord;
use crate::model::config::SimulatorConfig;
use crate::model::ids::ReportId;

/// Immutable result of a quiz attempt.
///
/// `correct + incorrect + unanswered == max_score` always holds, since every
/// selected question is worth one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    id: ReportId,
    generated_at: DateTime<Utc>,
    config: SimulatorConfig,
    answers: Vec<AnswerRecord>,
    total_score: u32,
    max_score: u32,
    percentage: u32,
    elapsed_secs: u32,
    duration_secs: u32,
    correct: u32,
    incorrect: u32,
    unanswered: u32,
}

impl Report {
    /// Aggregate a report from the answers of a session with `selected` questions.
    ///
    /// Answers are expected to be keyed by distinct selected questions; any
    /// surplus beyond `selected` is clamped out of the unanswered count.
    #[must_use]
    pub fn from_answers(
        id: ReportId,
        generated_at: DateTime<Utc>,
        config: SimulatorConfig,
        answers: Vec<AnswerRecord>,
        selected: usize,
        elapsed_secs: u32,
    ) -> Self {
        let max_score = count(selected);
        let total_score = answers
            .iter()
            .fold(0_u32, |sum, a| sum.saturating_add(a.points));
        let correct = count(answers.iter().filter(|a| a.is_correct).count());
        let incorrect = count(answers.len()).saturating_sub(correct);
        let unanswered = max_score.saturating_sub(count(answers.len()));
        let duration_secs = config.duration_secs();

        Self {
            id,
            generated_at,
            config,
            answers,
            total_score,
            max_score,
            percentage: rounded_percentage(total_score, max_score),
            elapsed_secs,
            duration_secs,
            correct,
            incorrect,
            unanswered,
        }
    }

    #[must_use]
    pub fn id(&self) -> ReportId {
        self.id
    }

    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Configured duration of the attempt.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Integer percentage of `part` over `whole`, rounded half-up; zero when `whole` is zero.
#[must_use]
pub fn rounded_percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = u64::from(part) * 100 + u64::from(whole) / 2;
    u32::try_from(scaled / u64::from(whole)).unwrap_or(u32::MAX)
}
