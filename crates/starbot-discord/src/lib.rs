//! # starbot-discord
//!
//! Discord transport built on serenity: the `ChatClient` implementation,
//! the gateway event handler, and the startup sequence wiring them to the
//! event loop and the scoreboard poller.

pub mod bot;
pub mod client;
pub mod handler;

pub use bot::{intents, run};
pub use client::DiscordClient;
pub use handler::GatewayHandler;
