//! Common error infrastructure for shadow-core.
//!
//! Domain-specific errors (e.g. `InventoryError`, `PurchaseError`) live beside
//! the systems that raise them. Every one of them implements [`GameError`] so
//! callers can classify failures without matching on concrete types.
//!
//! Failures never leave partial state behind: an operation that returns `Err`
//! has not mutated the save record.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - the same request may succeed later.
    ///
    /// Examples: not enough credits yet, storage temporarily unavailable
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: objective index out of range, zero purchase quantity
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - persisted data is corrupt and cannot be used.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or corrupted data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all shadow-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a stable SCREAMING_SNAKE_CASE code from `error_code` for logs and tests
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
