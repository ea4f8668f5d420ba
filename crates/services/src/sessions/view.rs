use serde::Serialize;

use quiz_core::model::{AnswerRecord, AnswerValue, Question, QuestionId};

/// Per-question outcome shown while reviewing a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub is_correct: bool,
    /// Seconds from session start to the submission; zero when unanswered.
    pub elapsed_secs: u32,
    pub user_answer: Option<AnswerValue>,
    pub correct_answer: AnswerValue,
}

impl QuestionReview {
    #[must_use]
    pub fn new(question: &Question, answer: Option<&AnswerRecord>) -> Self {
        Self {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            is_correct: answer.is_some_and(|a| a.is_correct),
            elapsed_secs: answer.map_or(0, |a| a.elapsed_secs),
            user_answer: answer.map(|a| a.value.clone()),
            correct_answer: question.correct_answer.clone(),
        }
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.user_answer.is_some()
    }
}
