//! Bot startup
//!
//! Opens the guild's store, connects to Discord, and starts the event loop
//! and the scoreboard poller before handing control to the gateway.

use std::sync::Arc;

use serenity::all::{GatewayIntents, GuildId};
use serenity::Client;
use starbot_common::{AppConfig, AppError, AppResult};
use starbot_core::Snowflake;
use starbot_gateway::{EventDispatcher, ScoreboardPoller};
use starbot_service::BotContext;
use starbot_store::DocumentStore;
use tracing::info;

use crate::client::DiscordClient;
use crate::handler::GatewayHandler;

/// Gateway intents the bot needs
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Run the bot until the gateway connection ends
pub async fn run(config: AppConfig) -> AppResult<()> {
    let guild = config.bot.guild_id;
    let guild_id = GuildId::new(guild.as_u64());

    let data_dir = config.storage.guild_dir(guild);
    info!(path = %data_dir.display(), "Opening store");
    let store = DocumentStore::open(data_dir).await.map_err(AppError::store)?;

    let (sender, receiver) = EventDispatcher::channel();
    let mut client = Client::builder(&config.bot.token, intents())
        .event_handler(GatewayHandler::new(sender, guild_id))
        .await
        .map_err(AppError::client)?;

    let me = client
        .http
        .get_current_user()
        .await
        .map_err(AppError::client)?;
    info!(user = %me.name, "Authenticated");

    let discord = DiscordClient::new(
        client.http.clone(),
        client.cache.clone(),
        guild_id,
        Snowflake::from(me.id.get()),
    );

    let ctx = BotContext::load(
        Arc::new(discord),
        store,
        config.points,
        &config.bot.command_prefix,
    )
    .await
    .map_err(AppError::from)?;

    let dispatcher = Arc::new(EventDispatcher::new(ctx.clone()));
    dispatcher.start(receiver);
    ScoreboardPoller::new(ctx).start();

    info!(guild_id = %guild, "Connecting to the gateway");
    client.start().await.map_err(AppError::client)?;

    Ok(())
}
