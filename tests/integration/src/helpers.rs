//! Test helpers for integration tests
//!
//! `FakeChatClient` is an in-memory guild: named channels, source messages
//! with settable reaction counts, the messages the bot posted, voice
//! members, and a log of every mutating call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use starbot_core::{
    ChannelInfo, ChatClient, ClientResult, DomainError, Member, OutgoingMessage, ReactionCount,
    Snowflake, SourceMessage,
};

/// A mutating call the bot made against the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    Edit {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    Delete {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    AddReaction {
        message_id: Snowflake,
        emoji: String,
    },
    RemoveReaction {
        message_id: Snowflake,
        emoji: String,
        user_id: Snowflake,
    },
}

/// A message the bot posted and has not deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub channel_id: Snowflake,
    pub payload: OutgoingMessage,
}

#[derive(Default)]
struct Guild {
    channels: Vec<ChannelInfo>,
    sources: HashMap<Snowflake, SourceMessage>,
    posted: HashMap<Snowflake, Posted>,
    voice: Vec<Member>,
    names: HashMap<Snowflake, String>,
    calls: Vec<Call>,
    sent: Vec<(Snowflake, OutgoingMessage)>,
}

/// In-memory chat platform
pub struct FakeChatClient {
    bot_user: Snowflake,
    guild: Mutex<Guild>,
    next_id: AtomicI64,
}

impl FakeChatClient {
    pub fn new(bot_user: Snowflake) -> Arc<Self> {
        Arc::new(Self {
            bot_user,
            guild: Mutex::new(Guild::default()),
            next_id: AtomicI64::new(10_000),
        })
    }

    fn mint(&self) -> Snowflake {
        Snowflake::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Create a text channel, returning its id
    pub fn add_channel(&self, name: &str) -> Snowflake {
        let id = self.mint();
        self.guild.lock().channels.push(ChannelInfo::new(id, name));
        id
    }

    pub fn channel_id(&self, name: &str) -> Option<Snowflake> {
        self.guild
            .lock()
            .channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }

    /// Post a user message that the bot can later fetch
    pub fn post_source(&self, channel_id: Snowflake, author_id: Snowflake, content: &str) -> Snowflake {
        let id = self.mint();
        let mut guild = self.guild.lock();
        let channel_name = guild
            .channels
            .iter()
            .find(|c| c.id == channel_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();

        guild.sources.insert(
            id,
            SourceMessage {
                id,
                channel_id,
                channel_name,
                author_id,
                author_name: format!("user{author_id}"),
                author_avatar_url: None,
                content: content.to_string(),
                jump_url: format!("https://discord.com/channels/1/{channel_id}/{id}"),
                created_at: Utc::now(),
                attachments: Vec::new(),
                reactions: Vec::new(),
            },
        );
        id
    }

    /// Set the live count of one emoji on a source message
    pub fn set_reactions(&self, message_id: Snowflake, emoji: &str, count: u64) {
        let mut guild = self.guild.lock();
        let Some(source) = guild.sources.get_mut(&message_id) else {
            panic!("no source message {message_id}");
        };
        source.reactions.retain(|r| !r.is_emoji(emoji));
        if count > 0 {
            source.reactions.push(ReactionCount::new(emoji, count));
        }
    }

    /// Delete a message as a moderator would, without logging a call
    pub fn delete_by_hand(&self, message_id: Snowflake) {
        let mut guild = self.guild.lock();
        guild.posted.remove(&message_id);
        guild.sources.remove(&message_id);
    }

    pub fn set_voice(&self, members: Vec<Member>) {
        self.guild.lock().voice = members;
    }

    pub fn set_display_name(&self, user_id: Snowflake, name: &str) {
        self.guild.lock().names.insert(user_id, name.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.guild.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.guild.lock().calls.clear();
    }

    /// Number of messages the bot sent to a channel, deleted or not
    pub fn sends_to(&self, channel_id: Snowflake) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Send { channel_id: ch, .. } if *ch == channel_id))
            .count()
    }

    /// Bot message still present on the platform
    pub fn posted(&self, message_id: Snowflake) -> Option<Posted> {
        self.guild.lock().posted.get(&message_id).cloned()
    }

    /// Ids of the bot's live messages in a channel
    pub fn live_in(&self, channel_id: Snowflake) -> Vec<Snowflake> {
        let mut ids: Vec<Snowflake> = self
            .guild
            .lock()
            .posted
            .iter()
            .filter(|(_, p)| p.channel_id == channel_id)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Text of every message the bot sent to a channel, in order
    pub fn texts_in(&self, channel_id: Snowflake) -> Vec<String> {
        self.guild
            .lock()
            .sent
            .iter()
            .filter(|(ch, _)| *ch == channel_id)
            .filter_map(|(_, payload)| payload.content.clone())
            .collect()
    }

    fn log(&self, call: Call) {
        self.guild.lock().calls.push(call);
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    fn bot_user_id(&self) -> Snowflake {
        self.bot_user
    }

    async fn find_channel_by_name(&self, name: &str) -> ClientResult<Option<ChannelInfo>> {
        Ok(self
            .guild
            .lock()
            .channels
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn fetch_message(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ClientResult<SourceMessage> {
        self.guild
            .lock()
            .sources
            .get(&message_id)
            .cloned()
            .ok_or(DomainError::MessageNotFound(message_id))
    }

    async fn send(&self, channel_id: Snowflake, payload: &OutgoingMessage) -> ClientResult<Snowflake> {
        if self.guild.lock().channels.iter().all(|c| c.id != channel_id) {
            return Err(DomainError::UnknownChannel(channel_id));
        }

        let message_id = self.mint();
        {
            let mut guild = self.guild.lock();
            guild.posted.insert(
                message_id,
                Posted {
                    channel_id,
                    payload: payload.clone(),
                },
            );
            guild.sent.push((channel_id, payload.clone()));
        }
        self.log(Call::Send {
            channel_id,
            message_id,
        });
        Ok(message_id)
    }

    async fn edit(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        payload: &OutgoingMessage,
    ) -> ClientResult<()> {
        {
            let mut guild = self.guild.lock();
            let Some(posted) = guild.posted.get_mut(&message_id) else {
                return Err(DomainError::MessageNotFound(message_id));
            };
            posted.payload = payload.clone();
        }
        self.log(Call::Edit {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn delete(&self, channel_id: Snowflake, message_id: Snowflake) -> ClientResult<()> {
        let removed = {
            let mut guild = self.guild.lock();
            guild.posted.remove(&message_id).is_some() || guild.sources.remove(&message_id).is_some()
        };
        if !removed {
            return Err(DomainError::MessageNotFound(message_id));
        }
        self.log(Call::Delete {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn add_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ClientResult<()> {
        self.log(Call::AddReaction {
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn remove_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        user_id: Snowflake,
    ) -> ClientResult<()> {
        self.log(Call::RemoveReaction {
            message_id,
            emoji: emoji.to_string(),
            user_id,
        });
        Ok(())
    }

    async fn voice_members(&self) -> ClientResult<Vec<Member>> {
        Ok(self.guild.lock().voice.clone())
    }

    async fn display_name(&self, user_id: Snowflake) -> ClientResult<Option<String>> {
        Ok(self.guild.lock().names.get(&user_id).cloned())
    }
}

/// Poll `check` until it holds, failing the test after two seconds
pub async fn wait_until(mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
