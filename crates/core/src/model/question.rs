use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::answer::AnswerValue;
use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} of kind {kind} cannot take that answer shape")]
    AnswerShape { id: QuestionId, kind: QuestionKind },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── TAGS ──────────────────────────────────────────────────────────────────────
//

/// Question format. Decides which answer shapes are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(alias = "verdadero_falso")]
    TrueFalse,
    #[serde(alias = "opcion_multiple")]
    MultipleChoice,
    #[serde(alias = "ordenamiento")]
    Ordering,
    #[serde(alias = "relacionar")]
    Matching,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Ordering => "ordering",
            QuestionKind::Matching => "matching",
        }
    }

    /// Whether a correct answer of this shape makes sense for the kind.
    #[must_use]
    pub fn fits(self, answer: &AnswerValue) -> bool {
        matches!(
            (self, answer),
            (QuestionKind::TrueFalse, AnswerValue::Scalar(_))
                | (
                    QuestionKind::MultipleChoice,
                    AnswerValue::Scalar(_) | AnswerValue::List(_)
                )
                | (QuestionKind::Ordering, AnswerValue::List(_))
                | (QuestionKind::Matching, AnswerValue::Mapping(_))
        )
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tier of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[serde(alias = "basica")]
    Basic,
    #[serde(alias = "intermedia")]
    Intermediate,
    #[serde(alias = "avanzada")]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Basic,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "basica" => Ok(Difficulty::Basic),
            "intermediate" | "intermedia" => Ok(Difficulty::Intermediate),
            "advanced" | "avanzada" => Ok(Difficulty::Advanced),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single question as supplied by a question bank. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(alias = "pregunta")]
    pub prompt: String,
    #[serde(default, alias = "opciones")]
    pub options: Vec<String>,
    #[serde(alias = "respuesta_correcta")]
    pub correct_answer: AnswerValue,
    #[serde(alias = "tipo")]
    pub kind: QuestionKind,
    #[serde(alias = "complejidad")]
    pub difficulty: Difficulty,
    #[serde(default, alias = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "tiempo_estimado", skip_serializing_if = "Option::is_none")]
    pub estimated_secs: Option<u32>,
}

impl Question {
    #[must_use]
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        kind: QuestionKind,
        difficulty: Difficulty,
        correct_answer: AnswerValue,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options: Vec::new(),
            correct_answer,
            kind,
            difficulty,
            category: None,
            estimated_secs: None,
        }
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_estimated_secs(mut self, secs: u32) -> Self {
        self.estimated_secs = Some(secs);
        self
    }

    /// Check the invariants a question bank entry must hold.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyId` / `EmptyPrompt` for blank text and
    /// `QuestionError::AnswerShape` if the correct answer does not fit the kind.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.id.is_blank() {
            return Err(QuestionError::EmptyId);
        }
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt {
                id: self.id.clone(),
            });
        }
        if !self.kind.fits(&self.correct_answer) {
            return Err(QuestionError::AnswerShape {
                id: self.id.clone(),
                kind: self.kind,
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spanish_bank_format() {
        let raw = r#"{
            "id": "p-7",
            "pregunta": "Ordena las fases",
            "opciones": ["a", "b", "c"],
            "respuesta_correcta": ["c", "a", "b"],
            "tipo": "ordenamiento",
            "complejidad": "avanzada",
            "categoria": "procesos",
            "tiempo_estimado": 45
        }"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(q.kind, QuestionKind::Ordering);
        assert_eq!(q.difficulty, Difficulty::Advanced);
        assert_eq!(q.category.as_deref(), Some("procesos"));
        assert_eq!(q.estimated_secs, Some(45));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn parses_english_keys() {
        let raw = r#"{
            "id": "m-1",
            "prompt": "Match",
            "correct_answer": {"a": "1", "b": "2"},
            "kind": "matching",
            "difficulty": "basic"
        }"#;
        let q: Question = serde_json::from_str(raw).unwrap();
        assert!(q.options.is_empty());
        assert_eq!(q.correct_answer, AnswerValue::mapping([("a", "1"), ("b", "2")]));
    }

    #[test]
    fn validate_rejects_mismatched_shape() {
        let q = Question::new(
            "o-1",
            "Order these",
            QuestionKind::Ordering,
            Difficulty::Basic,
            AnswerValue::scalar("a"),
        );
        assert!(matches!(
            q.validate(),
            Err(QuestionError::AnswerShape { kind: QuestionKind::Ordering, .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_text() {
        let q = Question::new(" ", "p", QuestionKind::TrueFalse, Difficulty::Basic, "x".into());
        assert_eq!(q.validate(), Err(QuestionError::EmptyId));

        let q = Question::new("t", "  ", QuestionKind::TrueFalse, Difficulty::Basic, "x".into());
        assert!(matches!(q.validate(), Err(QuestionError::EmptyPrompt { .. })));
    }

    #[test]
    fn multiple_choice_accepts_scalar_or_list() {
        assert!(QuestionKind::MultipleChoice.fits(&AnswerValue::scalar("a")));
        assert!(QuestionKind::MultipleChoice.fits(&AnswerValue::list(["a", "b"])));
        assert!(!QuestionKind::MultipleChoice.fits(&AnswerValue::mapping([("a", "b")])));
    }

    #[test]
    fn difficulty_parses_both_vocabularies() {
        assert_eq!("intermedia".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
        assert_eq!("Advanced".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
