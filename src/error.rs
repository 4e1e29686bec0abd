//! Error types for the book catalog
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are split into the four client-facing categories every catalog
//! operation can report, plus infrastructure errors from storage and config.
//!
//! ## Client-facing categories
//! - `NotFound` - lookup by key failed (editing a missing book, favouriting an unknown ISBN)
//! - `DuplicateKey` - a natural key (name, username, email) is already taken
//! - `Validation` - a field failed its format or range rule
//! - `Unauthorized` - a non-admin attempted a privileged mutation
//!
//! None of these are retried and none are fatal. The operation that produced
//! one has already rolled back its transaction by the time the caller sees it.

use thiserror::Error;

/// Result type alias using our CatalogError type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== Client Errors =====

    /// Entity lookup by primary or natural key failed
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity kind ("book", "author", ...)
        entity: &'static str,
        /// Key that was looked up
        key: String,
    },

    /// Natural key already used by another entity
    #[error("{entity} already exists: {key}")]
    DuplicateKey {
        entity: &'static str,
        key: String,
    },

    /// Malformed field value
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Acting user lacks the role required for the operation
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    // ===== Storage Errors =====

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("File I/O error: {0}")]
    FileIoError(String),

    // ===== Configuration Errors =====

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ===== External Library Errors =====

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper methods for creating common errors
impl CatalogError {
    pub fn not_found<K: ToString>(entity: &'static str, key: K) -> Self {
        CatalogError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn duplicate<K: ToString>(entity: &'static str, key: K) -> Self {
        CatalogError::DuplicateKey {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation<S: Into<String>>(field: &'static str, message: S) -> Self {
        CatalogError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn unauthorized<S: Into<String>>(action: S) -> Self {
        CatalogError::Unauthorized(action.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, CatalogError::DuplicateKey { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CatalogError::Unauthorized(_))
    }

    /// Check if the error was caused by the caller's input or identity
    ///
    /// Client errors are shown to the user as-is. Everything else is an
    /// infrastructure failure and should be logged.
    pub fn is_client_error(&self) -> bool {
        self.is_not_found() || self.is_duplicate_key() || self.is_validation() || self.is_unauthorized()
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::NotFound { entity, key } => {
                format!("The {} '{}' could not be found.", entity, key)
            }
            CatalogError::DuplicateKey { entity, key } => {
                format!("A {} named '{}' already exists. Please choose another name.", entity, key)
            }
            CatalogError::Validation { field, message } => {
                format!("Please check the {} field: {}.", field, message)
            }
            CatalogError::Unauthorized(_) => {
                "You do not have permission to perform this action.".to_string()
            }
            _ => "Something went wrong while accessing the catalog. Please try again later.".to_string(),
        }
    }
}

/// Map a SQLite UNIQUE violation to `DuplicateKey`, pass everything else through
pub(crate) fn map_unique_violation<K: ToString>(
    err: sqlx::Error,
    entity: &'static str,
    key: K,
) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CatalogError::duplicate(entity, key);
        }
    }
    CatalogError::SqlxError(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(CatalogError::not_found("book", 42).is_client_error());
        assert!(CatalogError::duplicate("genre", "Poetry").is_client_error());
        assert!(CatalogError::validation("year", "expected four digits").is_client_error());
        assert!(CatalogError::unauthorized("delete author").is_client_error());
        assert!(!CatalogError::MigrationFailed("boom".to_string()).is_client_error());
    }

    #[test]
    fn test_messages() {
        let err = CatalogError::not_found("book", 42);
        assert_eq!(err.to_string(), "book not found: 42");
        assert_eq!(err.user_message(), "The book '42' could not be found.");

        let err = CatalogError::duplicate("author", "Leo Tolstoy");
        assert!(err.user_message().contains("Leo Tolstoy"));

        let err = CatalogError::ConfigurationError("bad".to_string());
        assert!(!err.user_message().contains("bad"));
    }
}
