//! Outbound payloads - what the bot posts or edits

use chrono::{DateTime, Utc};

/// Message body sent to or edited on the platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embed: Option<Embed>,
}

impl OutgoingMessage {
    /// Plain text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    /// Message consisting of a single embed
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
        }
    }
}

/// Rich embed card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub author: Option<EmbedAuthor>,
    pub description: Option<String>,
    pub footer: Option<String>,
    pub image_url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Author line of an embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}
