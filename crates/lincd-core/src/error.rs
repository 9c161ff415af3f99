//! Error types for the Lincd service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Lincd service.
///
/// Store-level failures (`StoreUnavailable`, `StoreQuery`, `Conflict`) are
/// produced by `RecordStore` implementations. Services never recover from
/// them; they wrap them in `Operation` with a human-readable action and
/// hand them back to the caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LincdError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The underlying store could not be reached or opened
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A query or write against the store failed
    #[error("Store query failed: {0}")]
    StoreQuery(String),

    /// A uniqueness constraint enforced by the store was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),

    /// A service operation failed; terminal for the request
    #[error("Failed to {action}: {source}")]
    Operation {
        action: String,
        source: Box<LincdError>,
    },
}

impl LincdError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a StoreQuery error
    pub fn store_query(message: impl Into<String>) -> Self {
        Self::StoreQuery(message.into())
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wraps this error as the failure of a named service operation.
    ///
    /// ```
    /// use lincd_core::LincdError;
    ///
    /// let err = LincdError::store_query("connection reset").during("fetch user");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Failed to fetch user: Store query failed: connection reset"
    /// );
    /// ```
    pub fn during(self, action: impl Into<String>) -> Self {
        Self::Operation {
            action: action.into(),
            source: Box::new(self),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Returns the innermost error, unwrapping any `Operation` layers.
    pub fn root_cause(&self) -> &LincdError {
        match self {
            Self::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self.root_cause(), Self::NotFound { .. })
    }

    /// Check if this error originated in the store
    pub fn is_store(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::StoreUnavailable(_) | Self::StoreQuery(_)
        )
    }

    /// Check if this is a Conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self.root_cause(), Self::Conflict(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self.root_cause(), Self::Validation(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self.root_cause(), Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<regex::Error> for LincdError {
    fn from(err: regex::Error) -> Self {
        Self::Validation(format!("invalid search pattern: {}", err))
    }
}

/// A type alias for `Result<T, LincdError>`.
pub type Result<T> = std::result::Result<T, LincdError>;
