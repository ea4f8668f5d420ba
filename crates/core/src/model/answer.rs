use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::QuestionId;

//
// ─── ANSWER VALUE ──────────────────────────────────────────────────────────────
//

/// Shape of both correct answers and submitted answers.
///
/// Deserializes untagged: a JSON string is a `Scalar`, an array a `List`,
/// an object a `Mapping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scalar(String),
    List(Vec<String>),
    Mapping(BTreeMap<String, String>),
}

impl AnswerValue {
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    #[must_use]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns true when `submitted` matches `self` taken as the correct answer.
    ///
    /// - `List`: compared as sorted sequences, so order is irrelevant.
    /// - `Mapping`: every key and value must match.
    /// - `Scalar`: exact string equality.
    ///
    /// A submission of a different shape never matches.
    #[must_use]
    pub fn accepts(&self, submitted: &AnswerValue) -> bool {
        match (self, submitted) {
            (Self::List(expected), Self::List(given)) => sorted(expected) == sorted(given),
            (Self::Mapping(expected), Self::Mapping(given)) => expected == given,
            (Self::Scalar(expected), Self::Scalar(given)) => expected == given,
            _ => false,
        }
    }
}

fn sorted(items: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = items.iter().map(String::as_str).collect();
    out.sort_unstable();
    out
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// A scored submission for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub value: AnswerValue,
    /// Seconds between session start and submission.
    pub elapsed_secs: u32,
    pub is_correct: bool,
    pub points: u32,
}

impl AnswerRecord {
    /// Score `value` against `correct` and build the record.
    #[must_use]
    pub fn score(
        question_id: QuestionId,
        correct: &AnswerValue,
        value: AnswerValue,
        elapsed_secs: u32,
    ) -> Self {
        let is_correct = correct.accepts(&value);
        Self {
            question_id,
            value,
            elapsed_secs,
            is_correct,
            points: u32::from(is_correct),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_answers_ignore_order() {
        let correct = AnswerValue::list(["a", "b"]);
        assert!(correct.accepts(&AnswerValue::list(["b", "a"])));
        assert!(!correct.accepts(&AnswerValue::list(["a"])));
        assert!(!correct.accepts(&AnswerValue::list(["a", "b", "c"])));
    }

    #[test]
    fn list_answers_respect_multiplicity() {
        let correct = AnswerValue::list(["a", "a", "b"]);
        assert!(!correct.accepts(&AnswerValue::list(["a", "b", "b"])));
    }

    #[test]
    fn mapping_answers_need_every_pair() {
        let correct = AnswerValue::mapping([("x", "1"), ("y", "2")]);
        assert!(correct.accepts(&AnswerValue::mapping([("y", "2"), ("x", "1")])));
        assert!(!correct.accepts(&AnswerValue::mapping([("x", "1")])));
        assert!(!correct.accepts(&AnswerValue::mapping([("x", "1"), ("y", "3")])));
    }

    #[test]
    fn shape_mismatch_is_incorrect() {
        let correct = AnswerValue::list(["a"]);
        assert!(!correct.accepts(&AnswerValue::scalar("a")));
        let correct = AnswerValue::scalar("true");
        assert!(!correct.accepts(&AnswerValue::list(["true"])));
    }

    #[test]
    fn record_awards_one_point_when_correct() {
        let correct = AnswerValue::scalar("verdadero");
        let hit = AnswerRecord::score(QuestionId::new("q1"), &correct, "verdadero".into(), 4);
        let miss = AnswerRecord::score(QuestionId::new("q1"), &correct, "falso".into(), 4);
        assert_eq!((hit.is_correct, hit.points), (true, 1));
        assert_eq!((miss.is_correct, miss.points), (false, 0));
    }

    #[test]
    fn deserializes_untagged_shapes() {
        let scalar: AnswerValue = serde_json::from_str(r#""b""#).unwrap();
        let list: AnswerValue = serde_json::from_str(r#"["b","a"]"#).unwrap();
        let mapping: AnswerValue = serde_json::from_str(r#"{"k":"v"}"#).unwrap();
        assert_eq!(scalar, AnswerValue::scalar("b"));
        assert_eq!(list, AnswerValue::list(["b", "a"]));
        assert_eq!(mapping, AnswerValue::mapping([("k", "v")]));
    }
}

