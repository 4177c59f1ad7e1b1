//! Error types for the BUGUA application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole BUGUA workspace.
///
/// The variants follow the failure taxonomy of a reading round: input that is
/// not complete yet, prompt template misconfiguration, oracle failures and
/// persistence failures. Only the first one is ever surfaced to the player as
/// an error; the orchestrator turns the others into degraded readings.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BuguaError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "Firestore"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A transition was requested before the round had everything it needs
    #[error("Incomplete input: {0}")]
    Incomplete(String),

    /// The prompt template could not be rendered into a valid request
    #[error("Template error: {0}")]
    Template(String),

    /// The AI oracle failed or answered with something unusable
    #[error("Agent error: {0}")]
    Agent(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuguaError {
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

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Incomplete error
    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::Incomplete(message.into())
    }

    /// Creates a Template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template(message.into())
    }

    /// Creates an Agent error
    pub fn agent(message: impl Into<String>) -> Self {
        Self::Agent(message.into())
    }

    /// Creates a Serialization error for an arbitrary wire format
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an input incompleteness error
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BuguaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BuguaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BuguaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for BuguaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for BuguaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<String> for BuguaError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, BuguaError>`.
pub type Result<T> = std::result::Result<T, BuguaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_kind() {
        let err: BuguaError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_predicates() {
        assert!(BuguaError::not_found("record", "k").is_not_found());
        assert!(BuguaError::incomplete("board").is_incomplete());
        assert!(!BuguaError::config("x").is_incomplete());
    }

    #[test]
    fn test_foreign_errors_become_internal() {
        let err: BuguaError = anyhow::anyhow!("store offline").into();
        assert!(matches!(err, BuguaError::Internal(ref m) if m == "store offline"));
    }
}
