use crate::env::ContentError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::PersistError;

/// Errors surfaced by [`super::Simulation`] operations that touch both the
/// persisted record and static content.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl GameError for SimulationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Persist(err) => err.severity(),
            Self::Content(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Persist(err) => err.error_code(),
            Self::Content(err) => err.error_code(),
        }
    }
}
