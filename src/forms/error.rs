use thiserror::Error;

use crate::database::DatabaseError;
use crate::storage::StorageError;

/// Errors raised by the form pipeline and the services built on top of it
#[derive(Debug, Error)]
pub enum FormError {
    /// Structurally malformed input. `property_id` names the offending field when known.
    #[error("Validation error: {message}")]
    Validation {
        property_id: Option<String>,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Asset or external record store I/O failed; safe to retry
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FormError {
    pub fn validation(message: impl Into<String>) -> Self {
        FormError::Validation {
            property_id: None,
            message: message.into(),
        }
    }

    pub fn invalid_property(property_id: impl Into<String>, message: impl Into<String>) -> Self {
        FormError::Validation {
            property_id: Some(property_id.into()),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        FormError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        FormError::Forbidden(message.into())
    }
}

pub type FormResult<T> = Result<T, FormError>;
