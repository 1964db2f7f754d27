//! Message entities - what the bot sees of a chat message

use chrono::{DateTime, Utc};

use super::reaction::ReactionCount;
use crate::value_objects::Snowflake;

/// A message fetched from the platform, sampled at processing time
///
/// Reaction counts are the live counts at the moment of the fetch and are
/// never stored by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub channel_name: String,
    pub author_id: Snowflake,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub content: String,
    pub jump_url: String,
    pub created_at: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
    pub reactions: Vec<ReactionCount>,
}

impl SourceMessage {
    /// Count of reactions using `emoji`, zero if nobody used it
    pub fn tally(&self, emoji: &str) -> u64 {
        self.reactions
            .iter()
            .find(|r| r.is_emoji(emoji))
            .map_or(0, |r| r.count)
    }

    /// First attachment that is an image
    pub fn first_image(&self) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.is_image())
    }

    /// Get a truncated preview of the content, cut on a char boundary
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}

/// Attachment on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
    pub height: Option<u32>,
}

impl Attachment {
    /// Create a new Attachment without media metadata
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            content_type: None,
            height: None,
        }
    }

    /// Check if attachment is an image
    ///
    /// The platform only reports dimensions for images, so a height is
    /// enough even when the content type is missing.
    pub fn is_image(&self) -> bool {
        self.height.is_some()
            || self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// A newly posted message delivered to the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub author_is_bot: bool,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

impl InboundMessage {
    /// Create a plain text message
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author_id: Snowflake,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            author_is_bot: false,
            content: content.into(),
            attachments: Vec::new(),
        }
    }
}
