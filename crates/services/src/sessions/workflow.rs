use std::sync::Arc;

use quiz_core::model::SimulatorConfig;
use storage::repository::QuestionSource;
use tracing::info;

use super::manager::SessionManager;
use crate::Clock;
use crate::error::SimulatorError;
use crate::ticker::TickScheduler;

/// Loads a question pool from a source and hands back a ready session.
#[derive(Clone)]
pub struct SimulatorLoader {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    seed: Option<u64>,
}

impl SimulatorLoader {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build a configuring session whose pool is the source's questions.
    ///
    /// # Errors
    ///
    /// Returns `SimulatorError::Storage` if the source fails and
    /// `SimulatorError::NoQuestions` if nothing in the pool passes the filters.
    pub async fn prepare(
        &self,
        config: SimulatorConfig,
        ticker: impl TickScheduler + 'static,
    ) -> Result<SessionManager, SimulatorError> {
        let questions = self.source.load_questions().await?;
        let eligible = questions.iter().filter(|q| config.admits(q)).count();
        if eligible == 0 {
            return Err(SimulatorError::NoQuestions);
        }
        info!(
            pool = questions.len(),
            eligible,
            requested = config.question_count(),
            "simulator prepared"
        );

        let mut manager = SessionManager::new(ticker)
            .with_clock(self.clock)
            .with_config(config);
        if let Some(seed) = self.seed {
            manager = manager.with_seed(seed);
        }
        manager.load_questions(questions);
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::ManualTicker;
    use async_trait::async_trait;
    use quiz_core::model::{Difficulty, Question, QuestionKind, SessionState};
    use quiz_core::time::fixed_clock;
    use storage::repository::{InMemoryQuestionBank, StorageError};

    struct BrokenSource;

    #[async_trait]
    impl QuestionSource for BrokenSource {
        async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn bank() -> InMemoryQuestionBank {
        InMemoryQuestionBank::with_questions(vec![
            Question::new("b1", "Basic", QuestionKind::TrueFalse, Difficulty::Basic, "x".into()),
            Question::new("b2", "Basic", QuestionKind::TrueFalse, Difficulty::Basic, "y".into()),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn prepare_loads_pool_into_configuring_session() {
        let loader = SimulatorLoader::new(fixed_clock(), Arc::new(bank())).with_seed(Some(9));
        let manager = loader
            .prepare(SimulatorConfig::default(), ManualTicker::new())
            .await
            .unwrap();

        assert_eq!(manager.state(), SessionState::Configuring);
        assert_eq!(manager.pool().len(), 2);
        assert!(manager.selected_questions().is_empty());
    }

    #[tokio::test]
    async fn prepare_rejects_filters_with_no_match() {
        let loader = SimulatorLoader::new(fixed_clock(), Arc::new(bank()));
        let config = SimulatorConfig::new(Difficulty::Advanced.into(), 5, 5).unwrap();
        let err = loader.prepare(config, ManualTicker::new()).await.unwrap_err();
        assert!(matches!(err, SimulatorError::NoQuestions));
    }

    #[tokio::test]
    async fn prepare_surfaces_source_errors() {
        let loader = SimulatorLoader::new(fixed_clock(), Arc::new(BrokenSource));
        let err = loader
            .prepare(SimulatorConfig::default(), ManualTicker::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SimulatorError::Storage(StorageError::Connection(_))));
    }
}
