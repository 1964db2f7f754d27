//! starbot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p starbot-discord --bin starbot
//! ```
//!
//! Configuration is read from environment variables or a `.env` file.

use starbot_common::{try_init_tracing_with_config, AppConfig, AppResult, TracingConfig};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, code = e.error_code(), "Bot stopped");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.env,
        guild_id = %config.bot.guild_id,
        prefix = %config.bot.command_prefix,
        "Configuration loaded"
    );

    starbot_discord::run(config).await
}
