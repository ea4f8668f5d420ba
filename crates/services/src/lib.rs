#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod ticker;

pub use quiz_core::Clock;

pub use error::SimulatorError;
pub use sessions::{
    QuestionReview, SessionManager, SessionSnapshot, SimulatorLoader, format_clock,
};
pub use ticker::{ManualTicker, TICK_PERIOD, TickHandle, TickScheduler, TokioTicker};
