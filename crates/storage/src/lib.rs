#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::JsonFileQuestionSource;
pub use repository::{InMemoryQuestionBank, QuestionSource, StorageError};
