use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, QuestionId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),

    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
}

/// Supplier of the question pool for a simulator.
///
/// Questions are loaded once per session setup and treated as read-only.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load the full question pool.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the pool cannot be read or contains invalid entries.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Validate every question and reject repeated ids.
///
/// # Errors
///
/// Returns `StorageError::InvalidQuestion` or `StorageError::DuplicateId` on the first offender.
pub fn validate_pool(questions: &[Question]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        question.validate()?;
        if !seen.insert(&question.id) {
            return Err(StorageError::DuplicateId(question.id.clone()));
        }
    }
    Ok(())
}

/// Shared in-memory question pool for tests and embedding hosts.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank from an initial list of questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any question is invalid or ids repeat.
    pub fn with_questions(questions: Vec<Question>) -> Result<Self, StorageError> {
        validate_pool(&questions)?;
        Ok(Self {
            questions: Arc::new(Mutex::new(questions)),
        })
    }

    /// Insert a question or replace the one with the same id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuestion` if the question fails validation.
    pub fn upsert(&self, question: Question) -> Result<(), StorageError> {
        question.validate()?;
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => *existing = question,
            None => guard.push(question),
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the pool lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionBank {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}
