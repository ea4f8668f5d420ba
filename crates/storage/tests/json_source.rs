use std::path::PathBuf;

use quiz_core::model::{AnswerValue, Difficulty, QuestionKind};
use storage::repository::{QuestionSource, StorageError};
use storage::JsonFileQuestionSource;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("quiz-storage-{}-{name}.json", std::process::id()))
}

const BANK: &str = r#"[
    {
        "id": "tf-1",
        "pregunta": "Rust has a garbage collector.",
        "opciones": ["verdadero", "falso"],
        "respuesta_correcta": "falso",
        "tipo": "verdadero_falso",
        "complejidad": "basica"
    },
    {
        "id": "match-1",
        "prompt": "Match the keyword to its purpose.",
        "options": ["mut", "ref"],
        "correct_answer": {"mut": "mutability", "ref": "borrow"},
        "kind": "matching",
        "difficulty": "advanced",
        "category": "syntax",
        "estimated_secs": 90
    }
]"#;

#[tokio::test]
async fn loads_mixed_format_bank() {
    let path = scratch_path("mixed");
    tokio::fs::write(&path, BANK).await.unwrap();

    let source = JsonFileQuestionSource::new(&path);
    let questions = source.load_questions().await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].kind, QuestionKind::TrueFalse);
    assert_eq!(questions[0].difficulty, Difficulty::Basic);
    assert_eq!(questions[1].category.as_deref(), Some("syntax"));
    assert_eq!(
        questions[1].correct_answer,
        AnswerValue::mapping([("ref", "borrow"), ("mut", "mutability")])
    );
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let path = scratch_path("does-not-exist");
    let source = JsonFileQuestionSource::new(&path);
    assert_eq!(source.path(), path.as_path());
    let err = source.load_questions().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn malformed_json_is_a_serialization_error() {
    let path = scratch_path("malformed");
    tokio::fs::write(&path, "[{\"id\": ").await.unwrap();

    let err = JsonFileQuestionSource::new(&path)
        .load_questions()
        .await
        .unwrap_err();
    tokio::fs::remove_file(&path).await.unwrap();

    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn duplicate_ids_are_rejected() {
    let path = scratch_path("dupes");
    let raw = r#"[
        {"id": "a", "prompt": "p", "correct_answer": "x", "kind": "true_false", "difficulty": "basic"},
        {"id": "a", "prompt": "q", "correct_answer": "y", "kind": "true_false", "difficulty": "basic"}
    ]"#;
    tokio::fs::write(&path, raw).await.unwrap();

    let err = JsonFileQuestionSource::new(&path)
        .load_questions()
        .await
        .unwrap_err();
    tokio::fs::remove_file(&path).await.unwrap();

    assert!(matches!(err, StorageError::DuplicateId(id) if id.as_str() == "a"));
}
