use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, SimulatorConfig};

/// Selection result for a session start.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub questions: Vec<Question>,
    /// Size of the pool after filtering, before truncation.
    pub eligible: usize,
}

/// Picks the questions of an attempt: filter, shuffle, truncate.
pub struct QuestionSelector<'a> {
    config: &'a SimulatorConfig,
}

impl<'a> QuestionSelector<'a> {
    #[must_use]
    pub fn new(config: &'a SimulatorConfig) -> Self {
        Self { config }
    }

    /// Build a plan from the full pool.
    ///
    /// - Questions failing the difficulty or category filter are dropped.
    /// - The remainder is shuffled with `rng`, so a seeded rng gives a stable order.
    /// - At most `question_count` questions are kept.
    pub fn build<R: Rng + ?Sized>(self, pool: &[Question], rng: &mut R) -> SelectionPlan {
        let mut eligible: Vec<Question> = pool
            .iter()
            .filter(|q| self.config.admits(q))
            .cloned()
            .collect();
        let eligible_len = eligible.len();

        eligible.as_mut_slice().shuffle(rng);
        let cap = usize::try_from(self.config.question_count()).unwrap_or(usize::MAX);
        eligible.truncate(cap);

        SelectionPlan {
            questions: eligible,
            eligible: eligible_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerValue, Difficulty, DifficultyFilter, QuestionKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn build_pool() -> Vec<Question> {
        (0..12)
            .map(|i| {
                let tier = Difficulty::ALL[i % 3];
                Question::new(
                    format!("q{i}"),
                    format!("Prompt {i}"),
                    QuestionKind::TrueFalse,
                    tier,
                    AnswerValue::scalar("true"),
                )
            })
            .collect()
    }

    #[test]
    fn selects_exactly_count_without_duplicates() {
        let pool = build_pool();
        let mut rng = StdRng::seed_from_u64(7);
        for count in 1..=12 {
            let config = SimulatorConfig::new(DifficultyFilter::All, count, 5).unwrap();
            let plan = QuestionSelector::new(&config).build(&pool, &mut rng);

            assert_eq!(plan.questions.len(), count as usize);
            let ids: HashSet<_> = plan.questions.iter().map(|q| q.id.clone()).collect();
            assert_eq!(ids.len(), plan.questions.len());
            assert!(plan.questions.iter().all(|q| pool.contains(q)));
        }
    }

    #[test]
    fn filters_by_difficulty_before_truncating() {
        let pool = build_pool();
        let config = SimulatorConfig::new(Difficulty::Advanced.into(), 10, 5).unwrap();
        let plan = QuestionSelector::new(&config).build(&pool, &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.eligible, 4);
        assert_eq!(plan.questions.len(), 4);
        assert!(plan.questions.iter().all(|q| q.difficulty == Difficulty::Advanced));
    }

    #[test]
    fn same_seed_gives_same_order() {
        let pool = build_pool();
        let config = SimulatorConfig::new(DifficultyFilter::All, 6, 5).unwrap();
        let a = QuestionSelector::new(&config).build(&pool, &mut StdRng::seed_from_u64(42));
        let b = QuestionSelector::new(&config).build(&pool, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_pool_yields_empty_plan() {
        let config = SimulatorConfig::default();
        let plan = QuestionSelector::new(&config).build(&[], &mut StdRng::seed_from_u64(0));
        assert!(plan.questions.is_empty());
        assert_eq!(plan.eligible, 0);
    }
}
