//! Handler error types

use starbot_core::DomainError;
use starbot_service::ServiceError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Command called with the wrong arguments; the message is the reply
    #[error("Bad usage: {0}")]
    Usage(String),

    /// Service error
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    /// Domain error (from direct client calls)
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
}

impl HandlerError {
    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// The single reply sent to the user whose command failed
    pub fn user_message(&self) -> String {
        match self {
            Self::Usage(msg) => msg.clone(),
            Self::ServiceError(e) => e.user_message(),
            Self::DomainError(e) => ServiceError::from(e.clone()).user_message(),
        }
    }

    /// Whether the failure was caused by the requester and is not worth an error log
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Usage(_) => true,
            Self::ServiceError(e) => e.is_rejection(),
            Self::DomainError(e) => e.is_conflict(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
