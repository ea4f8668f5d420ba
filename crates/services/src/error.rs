//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted while preparing a simulator session.
///
/// Session operations themselves never fail; they degrade to no-ops.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimulatorError {
    #[error("no questions match the configured filters")]
    NoQuestions,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
