//! Chat client trait (port) - the bot's view of the chat platform
//!
//! The domain layer defines what it needs from the platform; the transport
//! crate provides the implementation. Every call is fire-and-check: a failed
//! post, edit or delete is returned to the caller and never retried here.

use async_trait::async_trait;

use crate::entities::{ChannelInfo, Member, OutgoingMessage, SourceMessage};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for chat client operations
pub type ClientResult<T> = Result<T, DomainError>;

// ============================================================================
// Chat Client
// ============================================================================

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// The bot's own user id
    fn bot_user_id(&self) -> Snowflake;

    /// Find a text channel of the guild by name
    async fn find_channel_by_name(&self, name: &str) -> ClientResult<Option<ChannelInfo>>;

    /// Fetch a message with its live reaction counts
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ClientResult<SourceMessage>;

    /// Post a message, returning the new message id
    async fn send(&self, channel_id: Snowflake, payload: &OutgoingMessage)
        -> ClientResult<Snowflake>;

    /// Overwrite an existing message in place
    async fn edit(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        payload: &OutgoingMessage,
    ) -> ClientResult<()>;

    /// Delete a message
    async fn delete(&self, channel_id: Snowflake, message_id: Snowflake) -> ClientResult<()>;

    /// React to a message as the bot
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ClientResult<()>;

    /// Retract another user's reaction
    async fn remove_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        user_id: Snowflake,
    ) -> ClientResult<()>;

    /// Members currently connected to any voice channel of the guild
    async fn voice_members(&self) -> ClientResult<Vec<Member>>;

    /// Display name of a guild member, `None` if they cannot be resolved
    async fn display_name(&self, user_id: Snowflake) -> ClientResult<Option<String>>;
}
