//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use starbot_common::AppError;
use starbot_core::DomainError;
use starbot_store::StoreError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or failed platform call
    Domain(DomainError),

    /// Persisted state could not be read or written
    Store(StoreError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Request rejected; the message is shown to the requester as is
    Validation(String),

    /// Request conflicts with existing state; shown to the requester as is
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Store(_) => "STORAGE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure is the requester's doing rather than the bot's
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_conflict(),
            Self::Validation(_) | Self::Conflict(_) => true,
            _ => false,
        }
    }

    /// The single reply sent to a user whose request failed
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(e) => match e {
                DomainError::ChannelNotFound(name) => {
                    format!("I could not find a channel called #{name}.")
                }
                DomainError::UnknownChannel(_) => "I could not find that channel.".to_string(),
                DomainError::MessageNotFound(_) => "I could not find that message.".to_string(),
                DomainError::MemberNotFound(_) => "I could not find that member.".to_string(),
                DomainError::PermissionDenied(_) => {
                    "I am not allowed to do that here.".to_string()
                }
                DomainError::Transport(_) => {
                    "Discord did not answer me. Try again in a bit.".to_string()
                }
                DomainError::ConfigurationMissing(key) => {
                    format!("The `{key}` setting is missing or invalid.")
                }
                DomainError::NameAlreadyLocked(_) => {
                    "That name is already registered, so you cannot lock it.".to_string()
                }
                DomainError::NotNameOwner(name) => {
                    format!("You are not the owner of \"{name}\", so you cannot change its images.")
                }
            },
            Self::Store(_) => "I could not save that. Try again in a bit.".to_string(),
            Self::NotFound { resource, id } => format!("I could not find {resource} \"{id}\"."),
            Self::Validation(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Internal(_) => "Something went wrong on my end.".to_string(),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::Store(e) => AppError::store(e),
            ServiceError::NotFound { resource, id } => {
                AppError::internal(anyhow::anyhow!("{resource} not found: {id}"))
            }
            ServiceError::Validation(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::Internal(msg) => AppError::internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
