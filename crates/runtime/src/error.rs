//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from storage, content loading and the simulation so
//! clients can bubble them up with consistent context.
use std::path::PathBuf;

use shadow_core::{ContentError, ErrorSeverity, GameError, PersistError, SimulationError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Level(#[from] ContentError),

    #[error("session requires content to be configured before building")]
    MissingContent,

    #[error("failed to load content from {path}: {reason}")]
    ContentLoad { path: PathBuf, reason: String },

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Persist(err) => err.severity(),
            Self::Simulation(err) => err.severity(),
            Self::Level(err) => err.severity(),
            Self::Repository(_) => ErrorSeverity::Recoverable,
            Self::MissingContent | Self::ContentLoad { .. } => ErrorSeverity::Validation,
            Self::Logging(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::Persist(err) => err.error_code(),
            Self::Simulation(err) => err.error_code(),
            Self::Level(err) => err.error_code(),
            Self::MissingContent => "RUNTIME_MISSING_CONTENT",
            Self::ContentLoad { .. } => "RUNTIME_CONTENT_LOAD",
            Self::Logging(_) => "RUNTIME_LOGGING",
        }
    }
}
