//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
///
/// Grouped into the four families the bot reacts to differently:
/// not found (skip and log), permission/transport (surface to the caller),
/// configuration (abort and warn), and conflicting requests (reply and reject).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: #{0}")]
    ChannelNotFound(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    // =========================================================================
    // Permission / Transport Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    PermissionDenied(String),

    #[error("Chat platform request failed: {0}")]
    Transport(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Setting missing or malformed: {0}")]
    ConfigurationMissing(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Name \"{0}\" is already locked by someone else")]
    NameAlreadyLocked(String),

    #[error("Name \"{0}\" is owned by someone else")]
    NotNameOwner(String),
}

impl DomainError {
    /// Get a stable error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ChannelNotFound(_) | Self::UnknownChannel(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",

            // Permission / Transport
            Self::PermissionDenied(_) => "MISSING_PERMISSIONS",
            Self::Transport(_) => "TRANSPORT_ERROR",

            // Configuration
            Self::ConfigurationMissing(_) => "CONFIGURATION_MISSING",

            // Conflict
            Self::NameAlreadyLocked(_) => "NAME_ALREADY_LOCKED",
            Self::NotNameOwner(_) => "NOT_NAME_OWNER",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_)
                | Self::UnknownChannel(_)
                | Self::MessageNotFound(_)
                | Self::MemberNotFound(_)
        )
    }

    /// Check if the platform rejected or failed to carry a call
    pub fn is_permission_or_transport(&self) -> bool {
        matches!(self, Self::PermissionDenied(_) | Self::Transport(_))
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationMissing(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::NameAlreadyLocked(_) | Self::NotNameOwner(_))
    }
}
