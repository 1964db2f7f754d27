//! Starboard service
//!
//! Mirrors messages that collect enough of the configured emoji onto the
//! board channel. Every reaction event on a source message resamples its live
//! reaction count and moves it between two states:
//!
//! | state         | tally >= threshold | tally < threshold |
//! |---------------|--------------------|-------------------|
//! | not reflected | create             | nothing           |
//! | reflected     | edit in place      | delete            |
//!
//! The outcome depends only on the latest sample, never on history.

use starbot_core::{
    DomainError, Embed, EmbedAuthor, OutgoingMessage, Snowflake, SourceMessage,
};
use tracing::{debug, info, instrument, warn};

use super::context::BotContext;
use super::error::ServiceResult;
use crate::documents::StarboardSettings;

/// Longest source content copied into a reflection
pub const CONTENT_PREVIEW_LEN: usize = 1024;

/// What a sample does to the reflection of one source message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Post a new reflection
    Create,
    /// Overwrite the existing reflection
    Update(Snowflake),
    /// Delete the existing reflection
    Remove(Snowflake),
    Noop,
}

/// Decide the transition for a sample
pub fn decide(existing: Option<Snowflake>, tally: u64, threshold: u64) -> Transition {
    match (existing, tally >= threshold) {
        (None, true) => Transition::Create,
        (Some(id), true) => Transition::Update(id),
        (Some(id), false) => Transition::Remove(id),
        (None, false) => Transition::Noop,
    }
}

/// Build the reflection card of a source message
pub fn render_reflection(source: &SourceMessage, emoji: &str, tally: u64) -> OutgoingMessage {
    OutgoingMessage::embed(Embed {
        author: Some(EmbedAuthor {
            name: source.author_name.clone(),
            icon_url: source.author_avatar_url.clone(),
        }),
        description: Some(format!(
            "**[Jump]({})**\n{}",
            source.jump_url,
            source.preview(CONTENT_PREVIEW_LEN)
        )),
        footer: Some(format!("{emoji}{tally}  | #{}", source.channel_name)),
        image_url: source.first_image().map(|a| a.url.clone()),
        timestamp: Some(source.created_at),
    })
}

fn threshold_of(settings: &StarboardSettings) -> Result<u64, DomainError> {
    u64::try_from(settings.threshold)
        .ok()
        .filter(|t| *t >= 1)
        .ok_or_else(|| DomainError::ConfigurationMissing("starboard.threshold".to_string()))
}

/// Starboard service
pub struct StarboardService<'a> {
    ctx: &'a BotContext,
}

impl<'a> StarboardService<'a> {
    /// Create a new StarboardService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Resolve the board channel by its configured name
    async fn board_channel(&self, settings: &StarboardSettings) -> ServiceResult<Snowflake> {
        self.ctx
            .client()
            .find_channel_by_name(&settings.channel)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| DomainError::ChannelNotFound(settings.channel.clone()).into())
    }

    /// Bring the reflection of one source message in line with its live tally
    ///
    /// Returns the transition that was applied. If the board channel cannot
    /// be resolved nothing is changed.
    #[instrument(skip(self))]
    pub async fn sync(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<Transition> {
        let settings = self.ctx.settings().snapshot().await.starboard;
        let threshold = threshold_of(&settings)?;
        let board = self.board_channel(&settings).await?;

        if channel_id == board {
            debug!("Reaction on the board itself, skipping");
            return Ok(Transition::Noop);
        }

        let client = self.ctx.client();

        // Sample while holding the map so overlapping syncs act on the latest count
        let mut map = self.ctx.reflections().begin().await;
        let source = client.fetch_message(channel_id, message_id).await?;
        let tally = source.tally(&settings.emoji);
        let transition = decide(map.get(message_id), tally, threshold);

        debug!(tally, threshold, ?transition, "Starboard sample");

        match transition {
            Transition::Create => {
                let payload = render_reflection(&source, &settings.emoji, tally);
                let reflection = client.send(board, &payload).await?;
                map.insert(message_id, reflection);
                map.commit().await?;
                info!(reflection_id = %reflection, tally, "Message posted to the starboard");
            }
            Transition::Update(reflection) => {
                let payload = render_reflection(&source, &settings.emoji, tally);
                match client.edit(board, reflection, &payload).await {
                    Ok(()) => {
                        debug!(reflection_id = %reflection, tally, "Starboard message edited");
                    }
                    Err(e) if e.is_not_found() => {
                        // Someone deleted the reflection by hand; post it again
                        let replacement = client.send(board, &payload).await?;
                        map.insert(message_id, replacement);
                        map.commit().await?;
                        warn!(
                            old_reflection_id = %reflection,
                            reflection_id = %replacement,
                            "Starboard message was gone, reposted it"
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Transition::Remove(reflection) => {
                match client.delete(board, reflection).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {
                        debug!(reflection_id = %reflection, "Starboard message already gone");
                    }
                    Err(e) => return Err(e.into()),
                }
                map.remove(message_id);
                map.commit().await?;
                info!(reflection_id = %reflection, tally, "Message removed from the starboard");
            }
            Transition::Noop => {}
        }

        Ok(transition)
    }

    /// Force-delete a reflection by its own id
    ///
    /// Every map entry pointing at it is pruned. Returns the number of
    /// pruned entries; an orphaned id prunes nothing.
    #[instrument(skip(self))]
    pub async fn delete_starred(&self, reflection_id: Snowflake) -> ServiceResult<usize> {
        let settings = self.ctx.settings().snapshot().await.starboard;
        let board = self.board_channel(&settings).await?;

        match self.ctx.client().delete(board, reflection_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!("Starboard message to delete was already gone");
            }
            Err(e) => return Err(e.into()),
        }

        let mut map = self.ctx.reflections().begin().await;
        let pruned = map.prune_reflection(reflection_id);
        if pruned > 0 {
            map.commit().await?;
        }

        info!(pruned, "Starboard message deleted");
        Ok(pruned)
    }
}
