//! Static content lookup errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when the simulation asks for content that was never
/// loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// No level is registered for the scene and entry pair.
    #[error("no level for scene '{scene}' entry '{entry}'")]
    UnknownLevel { scene: String, entry: String },

    /// Two levels claim the same scene and id.
    #[error("level '{id}' of scene '{scene}' registered twice")]
    DuplicateLevel { scene: String, id: String },

    /// A dialogue script failed validation.
    #[error("dialogue '{id}' is invalid: {reason}")]
    InvalidDialogue { id: String, reason: String },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownLevel { .. } => ErrorSeverity::Validation,
            Self::DuplicateLevel { .. } | Self::InvalidDialogue { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLevel { .. } => "CONTENT_UNKNOWN_LEVEL",
            Self::DuplicateLevel { .. } => "CONTENT_DUPLICATE_LEVEL",
            Self::InvalidDialogue { .. } => "CONTENT_INVALID_DIALOGUE",
        }
    }
}
