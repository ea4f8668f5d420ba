mod manager;
mod progress;
mod selection;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SimulatorError;
pub use manager::SessionManager;
pub use progress::{SessionSnapshot, format_clock};
pub use selection::{QuestionSelector, SelectionPlan};
pub use view::QuestionReview;
pub use workflow::SimulatorLoader;
