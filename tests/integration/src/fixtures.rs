//! Test fixtures
//!
//! `TestBot` wires the real services and dispatcher to a `FakeChatClient`
//! and a store in a temporary directory. The guild has `#general`,
//! `#starboard` and `#points` channels.

use std::path::Path;
use std::sync::Arc;

use starbot_common::PointsPolicy;
use starbot_core::{Attachment, InboundEvent, InboundMessage, ReactionEvent, Snowflake};
use starbot_gateway::EventDispatcher;
use starbot_service::{BotContext, BotContextBuilder, Settings};
use starbot_store::DocumentStore;
use tempfile::TempDir;

use crate::helpers::FakeChatClient;

pub const BOT_USER: Snowflake = Snowflake::new(1);
pub const USER_A: Snowflake = Snowflake::new(101);
pub const USER_B: Snowflake = Snowflake::new(102);
pub const USER_C: Snowflake = Snowflake::new(103);

pub const STAR: &str = "⭐";
pub const THUMBS_UP: &str = "\u{1F44D}";
pub const THUMBS_DOWN: &str = "\u{1F44E}";

/// Bot running against an in-memory guild
pub struct TestBot {
    pub client: Arc<FakeChatClient>,
    pub ctx: BotContext,
    pub dispatcher: EventDispatcher,
    pub general: Snowflake,
    pub starboard: Snowflake,
    pub points: Snowflake,
    dir: TempDir,
}

impl TestBot {
    /// Start with default settings in a fresh directory
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let client = FakeChatClient::new(BOT_USER);
        let general = client.add_channel("general");
        let starboard = client.add_channel("starboard");
        let points = client.add_channel("points");

        let ctx = context(&client, dir.path()).await;
        Self {
            dispatcher: EventDispatcher::new(ctx.clone()),
            client,
            ctx,
            general,
            starboard,
            points,
            dir,
        }
    }

    /// Start and apply `f` to the settings before any event is handled
    pub async fn with_settings(f: impl FnOnce(&mut Settings)) -> Self {
        let bot = Self::start().await;
        bot.ctx.settings().update(f).await.expect("settings update");
        bot
    }

    /// Start with the points tracker switched on
    pub async fn with_points_tracker() -> Self {
        Self::with_settings(|s| s.points_tracker.enabled = true).await
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// A second bot process over the same data directory and guild
    pub async fn restart(&self) -> BotContext {
        context(&self.client, self.dir.path()).await
    }

    /// Dispatch one event, waiting for any command it started
    pub async fn send(&self, event: InboundEvent) {
        if let Some(handle) = self.dispatcher.dispatch(event).await {
            handle.await.expect("command task panicked");
        }
    }

    pub async fn react(&self, channel_id: Snowflake, message_id: Snowflake, emoji: &str, user: Snowflake) {
        self.send(InboundEvent::ReactionAdded(ReactionEvent::new(
            channel_id, message_id, emoji, user,
        )))
        .await;
    }

    pub async fn unreact(&self, channel_id: Snowflake, message_id: Snowflake, emoji: &str, user: Snowflake) {
        self.send(InboundEvent::ReactionRemoved(ReactionEvent::new(
            channel_id, message_id, emoji, user,
        )))
        .await;
    }

    /// Post a message as `author` in `#general` and wait for its command
    pub async fn say(&self, author: Snowflake, content: &str) {
        self.say_in(self.general, author, content).await;
    }

    pub async fn say_in(&self, channel_id: Snowflake, author: Snowflake, content: &str) {
        let id = self.client.post_source(channel_id, author, content);
        self.send(InboundEvent::MessageCreated(InboundMessage::new(
            id, channel_id, author, content,
        )))
        .await;
    }

    /// Post a message with one attachment as `author` in `#general`
    pub async fn upload(&self, author: Snowflake, content: &str, url: &str) {
        let id = self.client.post_source(self.general, author, content);
        let mut message = InboundMessage::new(id, self.general, author, content);
        let filename = url.rsplit('/').next().unwrap_or(url);
        message.attachments.push(Attachment::new(filename, url));
        self.send(InboundEvent::MessageCreated(message)).await;
    }

    /// Replies the bot posted in `#general`
    pub fn replies(&self) -> Vec<String> {
        self.client.texts_in(self.general)
    }

    pub fn last_reply(&self) -> Option<String> {
        self.replies().pop()
    }
}

async fn context(client: &Arc<FakeChatClient>, dir: &Path) -> BotContext {
    let store = DocumentStore::open(dir).await.expect("open store");
    BotContextBuilder::new()
        .client(client.clone())
        .store(store)
        .points_policy(PointsPolicy::default())
        .command_prefix("&")
        .build()
        .await
        .expect("build context")
}
