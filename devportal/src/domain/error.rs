use std::fmt::Display;

use devportal_sdk::PortalError;
use thiserror::Error;

/// Domain-specific errors.
///
/// Converted into [`PortalError`] at the crate boundary; database detail
/// never reaches callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("identity provider failure: {message}")]
    Upstream { message: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}

/// Convert domain errors to the SDK error for public consumption.
impl From<DomainError> for PortalError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { entity, id } => PortalError::not_found(entity, id),
            DomainError::Conflict { message } => PortalError::conflict(message),
            DomainError::Unauthorized { message } => PortalError::unauthorized(message),
            DomainError::Forbidden { message } => PortalError::forbidden(message),
            DomainError::Upstream { message } => PortalError::upstream(message),
            DomainError::Validation { message } => PortalError::validation(message),
            DomainError::Database { .. } => PortalError::Internal,
        }
    }
}
