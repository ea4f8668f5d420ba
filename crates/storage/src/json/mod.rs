use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::Question;

use crate::repository::{QuestionSource, StorageError, validate_pool};

/// Question bank stored as a JSON array on disk.
///
/// The file is re-read on every load so hosts can edit the bank between sessions.
#[derive(Debug, Clone)]
pub struct JsonFileQuestionSource {
    path: PathBuf,
}

impl JsonFileQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse and validate a JSON question bank.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and validation
/// errors for invalid or duplicated questions.
pub fn parse_bank(raw: &str) -> Result<Vec<Question>, StorageError> {
    let questions: Vec<Question> =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    validate_pool(&questions)?;
    Ok(questions)
}

/// Render a question bank as pretty JSON.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn render_bank(questions: &[Question]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(questions).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl QuestionSource for JsonFileQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        let questions = parse_bank(&raw)?;
        tracing::info!(
            path = %self.path.display(),
            count = questions.len(),
            "loaded question bank"
        );
        Ok(questions)
    }
}
