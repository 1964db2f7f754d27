//! Gateway event handler
//!
//! Translates serenity gateway events into `InboundEvent`s for the event
//! loop. Only events from the configured guild are forwarded.

use serenity::all::{ChannelId, Context, EventHandler, GuildId, Message, MessageId, Reaction, Ready};
use serenity::async_trait;
use starbot_core::{InboundEvent, InboundMessage, ReactionEvent, Snowflake};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::inbound_attachments;

/// Forwards guild events into the dispatcher channel
pub struct GatewayHandler {
    events: mpsc::Sender<InboundEvent>,
    guild_id: GuildId,
}

impl GatewayHandler {
    pub fn new(events: mpsc::Sender<InboundEvent>, guild_id: GuildId) -> Self {
        Self { events, guild_id }
    }

    async fn forward(&self, event: InboundEvent) {
        let name = event.name();
        if self.events.send(event).await.is_err() {
            warn!(event = name, "Event loop has stopped, dropping event");
        }
    }

    fn reaction_event(&self, reaction: &Reaction) -> Option<ReactionEvent> {
        if reaction.guild_id != Some(self.guild_id) {
            return None;
        }
        let user_id = reaction.user_id?;

        Some(ReactionEvent::new(
            Snowflake::from(reaction.channel_id.get()),
            Snowflake::from(reaction.message_id.get()),
            reaction.emoji.to_string(),
            Snowflake::from(user_id.get()),
        ))
    }
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
    }

    async fn message(&self, _ctx: Context, new_message: Message) {
        if new_message.guild_id != Some(self.guild_id) {
            return;
        }

        let message = InboundMessage {
            id: Snowflake::from(new_message.id.get()),
            channel_id: Snowflake::from(new_message.channel_id.get()),
            author_id: Snowflake::from(new_message.author.id.get()),
            author_is_bot: new_message.author.bot,
            attachments: inbound_attachments(&new_message.attachments),
            content: new_message.content,
        };
        self.forward(InboundEvent::MessageCreated(message)).await;
    }

    async fn reaction_add(&self, _ctx: Context, add_reaction: Reaction) {
        if let Some(event) = self.reaction_event(&add_reaction) {
            self.forward(InboundEvent::ReactionAdded(event)).await;
        }
    }

    async fn reaction_remove(&self, _ctx: Context, removed_reaction: Reaction) {
        if let Some(event) = self.reaction_event(&removed_reaction) {
            self.forward(InboundEvent::ReactionRemoved(event)).await;
        }
    }

    async fn reaction_remove_all(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        removed_from_message_id: MessageId,
    ) {
        // This event carries no guild id; go by the cached channel list
        let in_guild = ctx
            .cache
            .guild(self.guild_id)
            .is_some_and(|guild| guild.channels.contains_key(&channel_id));
        if !in_guild {
            debug!(channel_id = %channel_id, "Ignoring reaction purge outside the guild");
            return;
        }

        self.forward(InboundEvent::ReactionsCleared {
            channel_id: Snowflake::from(channel_id.get()),
            message_id: Snowflake::from(removed_from_message_id.get()),
        })
        .await;
    }
}
