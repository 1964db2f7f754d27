//! Inbound events
//!
//! Platform events the transport forwards to the bot's event loop, already
//! filtered to the configured guild.

use crate::entities::InboundMessage;
use crate::value_objects::Snowflake;

/// A single reaction added to or removed from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: String,
    pub user_id: Snowflake,
}

impl ReactionEvent {
    /// Create a new ReactionEvent
    pub fn new(
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: impl Into<String>,
        user_id: Snowflake,
    ) -> Self {
        Self {
            channel_id,
            message_id,
            emoji: emoji.into(),
            user_id,
        }
    }
}

/// Events consumed by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    ReactionAdded(ReactionEvent),
    ReactionRemoved(ReactionEvent),
    ReactionsCleared {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    MessageCreated(InboundMessage),
}

impl InboundEvent {
    /// Event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReactionAdded(_) => "REACTION_ADD",
            Self::ReactionRemoved(_) => "REACTION_REMOVE",
            Self::ReactionsCleared { .. } => "REACTION_REMOVE_ALL",
            Self::MessageCreated(_) => "MESSAGE_CREATE",
        }
    }
}
