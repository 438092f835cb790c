use thiserror::Error;

use crate::contract::model::UserId;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("not found")]
    UserNotFound { id: UserId },

    /// `name` or `email` absent on create.
    #[error("missing")]
    MissingRequiredFields,

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{field}: invalid date '{value}'")]
    InvalidDate { field: String, value: String },

    /// Raw message chain reported by the store.
    #[error("{message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: UserId) -> Self {
        Self::UserNotFound { id }
    }

    pub fn missing_required_fields() -> Self {
        Self::MissingRequiredFields
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Keeps the whole `anyhow` context chain so the store's own message survives.
    pub fn database(err: &anyhow::Error) -> Self {
        Self::Database {
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn database_error_keeps_source_chain() {
        let err = Err::<(), _>(std::io::Error::other("UNIQUE constraint failed: users.email"))
            .context("insert failed")
            .unwrap_err();
        let domain = DomainError::database(&err);
        assert_eq!(
            domain.to_string(),
            "insert failed: UNIQUE constraint failed: users.email"
        );
    }

    #[test]
    fn wire_messages() {
        assert_eq!(DomainError::user_not_found(7).to_string(), "not found");
        assert_eq!(DomainError::missing_required_fields().to_string(), "missing");
        assert_eq!(
            DomainError::validation("name", "cannot be blank").to_string(),
            "name: cannot be blank"
        );
    }
}
