use thiserror::Error;

use crate::contract::model::UserId;

/// Errors that are safe to expose to other in-process consumers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserDirectoryError {
    #[error("User not found: {id}")]
    NotFound { id: UserId },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store error: {message}")]
    Store { message: String },
}

impl UserDirectoryError {
    pub fn not_found(id: UserId) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for UserDirectoryError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id),
            MissingRequiredFields => Self::validation("missing"),
            e @ (Validation { .. } | InvalidDate { .. }) => Self::validation(e.to_string()),
            Database { message } => Self::store(message),
        }
    }
}
