//! Scoreboard poller
//!
//! Drives the scoreboard service on a fixed interval. Runs as its own task so
//! a slow tick never holds up event handling.

use std::time::Duration;

use starbot_service::{BotContext, ScoreboardService};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Periodic scoreboard task
pub struct ScoreboardPoller {
    ctx: BotContext,
    interval: Duration,
}

impl ScoreboardPoller {
    pub fn new(ctx: BotContext) -> Self {
        let interval = ctx.points_policy().interval();
        Self { ctx, interval }
    }

    /// Override the tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the poll loop
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(interval_secs = self.interval.as_secs(), "Scoreboard poller started");
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }

    /// Run a single tick, logging the outcome
    pub async fn poll_once(&self) {
        match ScoreboardService::new(&self.ctx).tick().await {
            Ok(outcome) => tracing::debug!(?outcome, "Scoreboard tick"),
            Err(e) => tracing::error!(error = %e, "Scoreboard tick failed"),
        }
    }
}

impl std::fmt::Debug for ScoreboardPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreboardPoller")
            .field("interval", &self.interval)
            .finish()
    }
}
