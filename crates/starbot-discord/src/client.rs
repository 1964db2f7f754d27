//! Discord implementation of the `ChatClient` port
//!
//! Voice state, members and channels are read from the gateway cache where
//! possible and fall back to REST calls when the cache has not been filled
//! yet. HTTP failures are mapped onto `DomainError` by status code.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, ChannelType, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage,
    EditMessage, GuildChannel, GuildId, Message, MessageId, ReactionType, Timestamp, UserId,
};
use serenity::cache::Cache;
use serenity::http::Http;
use starbot_core::{
    Attachment, ChannelInfo, ChatClient, ClientResult, DomainError, Embed, Member,
    OutgoingMessage, ReactionCount, Snowflake, SourceMessage,
};

/// Chat client backed by a serenity HTTP client and gateway cache
#[derive(Clone)]
pub struct DiscordClient {
    http: Arc<Http>,
    cache: Arc<Cache>,
    guild_id: GuildId,
    bot_user_id: Snowflake,
}

impl DiscordClient {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, guild_id: GuildId, bot_user_id: Snowflake) -> Self {
        Self {
            http,
            cache,
            guild_id,
            bot_user_id,
        }
    }

    /// Name of a channel of the guild, empty if it cannot be told
    async fn channel_name(&self, channel_id: ChannelId) -> ClientResult<String> {
        let cached = self.cache.guild(self.guild_id).and_then(|guild| {
            guild
                .channels
                .get(&channel_id)
                .map(|c| c.name.clone())
                .or_else(|| {
                    guild
                        .threads
                        .iter()
                        .find(|t| t.id == channel_id)
                        .map(|t| t.name.clone())
                })
        });
        if let Some(name) = cached {
            return Ok(name);
        }

        let channel = self
            .http
            .get_channel(channel_id)
            .await
            .map_err(|e| classify(e, || DomainError::UnknownChannel(snowflake(channel_id.get()))))?;
        Ok(channel.guild().map(|c| c.name).unwrap_or_default())
    }

    async fn text_channels(&self) -> ClientResult<Vec<GuildChannel>> {
        let cached: Option<Vec<GuildChannel>> = self
            .cache
            .guild(self.guild_id)
            .map(|guild| guild.channels.values().cloned().collect());

        let channels = match cached {
            Some(channels) => channels,
            None => self
                .guild_id
                .channels(&self.http)
                .await
                .map_err(|e| classify(e, || DomainError::Transport("guild is unavailable".to_string())))?
                .into_values()
                .collect(),
        };

        Ok(channels
            .into_iter()
            .filter(|c| c.kind == ChannelType::Text)
            .collect())
    }

    fn jump_url(&self, channel_id: ChannelId, message_id: MessageId) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.guild_id, channel_id, message_id
        )
    }

    fn source_message(&self, message: Message, channel_name: String) -> SourceMessage {
        let author_name = message
            .author
            .global_name
            .clone()
            .unwrap_or_else(|| message.author.name.clone());

        SourceMessage {
            id: snowflake(message.id.get()),
            channel_id: snowflake(message.channel_id.get()),
            channel_name,
            author_id: snowflake(message.author.id.get()),
            author_name,
            author_avatar_url: Some(message.author.face()),
            jump_url: self.jump_url(message.channel_id, message.id),
            created_at: DateTime::from_timestamp(message.timestamp.unix_timestamp(), 0)
                .unwrap_or_default(),
            attachments: message.attachments.into_iter().map(attachment).collect(),
            reactions: message
                .reactions
                .into_iter()
                .map(|r| ReactionCount::new(r.reaction_type.to_string(), r.count))
                .collect(),
            content: message.content,
        }
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("guild_id", &self.guild_id)
            .field("bot_user_id", &self.bot_user_id)
            .finish()
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    fn bot_user_id(&self) -> Snowflake {
        self.bot_user_id
    }

    async fn find_channel_by_name(&self, name: &str) -> ClientResult<Option<ChannelInfo>> {
        let found = self
            .text_channels()
            .await?
            .into_iter()
            .filter(|c| c.name == name)
            .min_by_key(|c| (c.position, c.id))
            .map(|c| ChannelInfo::new(snowflake(c.id.get()), c.name));
        Ok(found)
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ClientResult<SourceMessage> {
        let source_channel = to_channel(channel_id)?;
        let message = source_channel
            .message(&self.http, to_message(message_id)?)
            .await
            .map_err(|e| classify(e, || DomainError::MessageNotFound(message_id)))?;
        let channel_name = self.channel_name(source_channel).await?;
        Ok(self.source_message(message, channel_name))
    }

    async fn send(&self, channel_id: Snowflake, payload: &OutgoingMessage) -> ClientResult<Snowflake> {
        let posted = to_channel(channel_id)?
            .send_message(&self.http, create_message(payload))
            .await
            .map_err(|e| classify(e, || DomainError::UnknownChannel(channel_id)))?;
        Ok(snowflake(posted.id.get()))
    }

    async fn edit(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        payload: &OutgoingMessage,
    ) -> ClientResult<()> {
        to_channel(channel_id)?
            .edit_message(&self.http, to_message(message_id)?, edit_message(payload))
            .await
            .map_err(|e| classify(e, || DomainError::MessageNotFound(message_id)))?;
        Ok(())
    }

    async fn delete(&self, channel_id: Snowflake, message_id: Snowflake) -> ClientResult<()> {
        to_channel(channel_id)?
            .delete_message(&self.http, to_message(message_id)?)
            .await
            .map_err(|e| classify(e, || DomainError::MessageNotFound(message_id)))
    }

    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ClientResult<()> {
        to_channel(channel_id)?
            .create_reaction(&self.http, to_message(message_id)?, reaction(emoji)?)
            .await
            .map_err(|e| classify(e, || DomainError::MessageNotFound(message_id)))
    }

    async fn remove_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        user_id: Snowflake,
    ) -> ClientResult<()> {
        to_channel(channel_id)?
            .delete_reaction(
                &self.http,
                to_message(message_id)?,
                Some(to_user(user_id)?),
                reaction(emoji)?,
            )
            .await
            .map_err(|e| classify(e, || DomainError::MessageNotFound(message_id)))
    }

    async fn voice_members(&self) -> ClientResult<Vec<Member>> {
        let members = self.cache.guild(self.guild_id).map(|guild| {
            guild
                .voice_states
                .values()
                .filter(|state| state.channel_id.is_some())
                .map(|state| {
                    let name = guild
                        .members
                        .get(&state.user_id)
                        .or(state.member.as_ref())
                        .map_or_else(|| state.user_id.to_string(), |m| m.display_name().to_string());
                    Member::new(snowflake(state.user_id.get()), name)
                })
                .collect::<Vec<_>>()
        });

        members.ok_or_else(|| DomainError::Transport("guild is not in the cache yet".to_string()))
    }

    async fn display_name(&self, user_id: Snowflake) -> ClientResult<Option<String>> {
        let id = to_user(user_id)?;
        let cached = self
            .cache
            .guild(self.guild_id)
            .and_then(|guild| guild.members.get(&id).map(|m| m.display_name().to_string()));
        if cached.is_some() {
            return Ok(cached);
        }

        match self.http.get_member(self.guild_id, id).await {
            Ok(member) => Ok(Some(member.display_name().to_string())),
            Err(e) => match classify(e, || DomainError::MemberNotFound(user_id)) {
                DomainError::MemberNotFound(_) => Ok(None),
                other => Err(other),
            },
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn snowflake(id: u64) -> Snowflake {
    Snowflake::from(id)
}

// Serenity ids are non-zero; a zero id can only come from user input.
fn to_channel(id: Snowflake) -> ClientResult<ChannelId> {
    if id.is_zero() {
        return Err(DomainError::UnknownChannel(id));
    }
    Ok(ChannelId::new(id.as_u64()))
}

fn to_message(id: Snowflake) -> ClientResult<MessageId> {
    if id.is_zero() {
        return Err(DomainError::MessageNotFound(id));
    }
    Ok(MessageId::new(id.as_u64()))
}

fn to_user(id: Snowflake) -> ClientResult<UserId> {
    if id.is_zero() {
        return Err(DomainError::MemberNotFound(id));
    }
    Ok(UserId::new(id.as_u64()))
}

fn reaction(emoji: &str) -> ClientResult<ReactionType> {
    ReactionType::try_from(emoji)
        .map_err(|_| DomainError::ConfigurationMissing(format!("\"{emoji}\" is not an emoji")))
}

fn attachment(file: serenity::all::Attachment) -> Attachment {
    Attachment {
        filename: file.filename,
        url: file.url,
        content_type: file.content_type,
        height: file.height,
    }
}

pub(crate) fn inbound_attachments(files: &[serenity::all::Attachment]) -> Vec<Attachment> {
    files.iter().cloned().map(attachment).collect()
}

fn create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();

    if let Some(author) = &embed.author {
        let mut line = CreateEmbedAuthor::new(author.name.clone());
        if let Some(icon) = &author.icon_url {
            line = line.icon_url(icon.clone());
        }
        builder = builder.author(line);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description.clone());
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer.clone()));
    }
    if let Some(url) = &embed.image_url {
        builder = builder.image(url.clone());
    }
    if let Some(timestamp) = embed
        .timestamp
        .and_then(|t: DateTime<Utc>| Timestamp::from_unix_timestamp(t.timestamp()).ok())
    {
        builder = builder.timestamp(timestamp);
    }

    builder
}

fn create_message(payload: &OutgoingMessage) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if let Some(content) = &payload.content {
        builder = builder.content(content.clone());
    }
    if let Some(embed) = &payload.embed {
        builder = builder.embed(create_embed(embed));
    }
    builder
}

fn edit_message(payload: &OutgoingMessage) -> EditMessage {
    let mut builder = EditMessage::new();
    if let Some(content) = &payload.content {
        builder = builder.content(content.clone());
    }
    if let Some(embed) = &payload.embed {
        builder = builder.embed(create_embed(embed));
    }
    builder
}

/// Map a serenity error onto the domain error families
///
/// 404 becomes the caller's not-found error, 403 a permission error, and
/// anything else a transport error.
fn classify(err: serenity::Error, not_found: impl FnOnce() -> DomainError) -> DomainError {
    let status = match &err {
        serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()),
        _ => None,
    };

    match status {
        Some(404) => not_found(),
        Some(403) => DomainError::PermissionDenied(err.to_string()),
        _ => DomainError::Transport(err.to_string()),
    }
}
