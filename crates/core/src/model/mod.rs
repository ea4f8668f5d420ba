mod answer;
mod config;
mod ids;
mod question;
mod report;
mod state;

pub use answer::{AnswerRecord, AnswerValue};
pub use config::{ConfigError, DifficultyFilter, SimulatorConfig};
pub use ids::{ParseReportIdError, QuestionId, ReportId};
pub use question::{Difficulty, Question, QuestionError, QuestionKind};
pub use report::{Report, rounded_percentage};
pub use state::SessionState;
