//! Scoreboard service
//!
//! Awards a point to everyone in voice on every tick and keeps one rolling
//! summary message in the points channel. The summary is edited in place
//! while the channel is quiet and reposted once enough unrelated messages
//! have buried it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use starbot_core::{InboundMessage, Member, OutgoingMessage, Snowflake};
use tracing::{debug, info, instrument, warn};

use super::context::BotContext;
use super::error::ServiceResult;

/// Notice posted once when the last member leaves voice
pub const EVERYONE_LEFT_NOTICE: &str = "Everyone left voice chat. I'll stop updating the scoreboard.";

const NAME_COLUMN_WIDTH: usize = 40;

/// In-memory poller state; only the summary id is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardState {
    /// Unrelated messages seen in the output channel since the last (re)post
    pub bury_count: u32,
    pub hibernating: bool,
}

impl ScoreboardState {
    /// Fresh state; the poller starts out hibernating
    pub fn new() -> Self {
        Self {
            bury_count: 0,
            hibernating: true,
        }
    }
}

impl Default for ScoreboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to the summary message on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryAction {
    Edited(Snowflake),
    Posted(Snowflake),
    /// Output channel could not be resolved
    Skipped,
}

/// Result of one poller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Points tracking is switched off
    Disabled,
    /// Nobody in voice and already hibernating
    Hibernating,
    /// Nobody in voice any more; notice posted and hibernation entered
    WentQuiet,
    Scored { members: usize, summary: SummaryAction },
}

/// One line of the summary table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub name: String,
    pub score: u64,
    pub present: bool,
}

/// Render the summary message
pub fn render_summary(rows: &[SummaryRow]) -> String {
    let mut out = String::from("Points have been awarded to those in the voice chat!\n```\n");
    out.push_str(&format!("{:>width$} | Score\n", "User", width = NAME_COLUMN_WIDTH));
    out.push_str(&format!(
        "{:>width$}---{}\n",
        "-".repeat("User".len()),
        "-".repeat("Score".len()),
        width = NAME_COLUMN_WIDTH
    ));

    for row in rows {
        out.push_str(&format!(
            "{:>width$} | {}",
            row.name,
            row.score,
            width = NAME_COLUMN_WIDTH
        ));
        if row.present {
            out.push_str(" (+)");
        }
        out.push('\n');
    }

    out.push_str("```");
    out
}

/// Scoreboard service
pub struct ScoreboardService<'a> {
    ctx: &'a BotContext,
}

impl<'a> ScoreboardService<'a> {
    /// Create a new ScoreboardService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Count a newly posted message towards burying the summary
    ///
    /// The output channel is resolved by its configured name for every
    /// message, so counting works before the first tick and right after the
    /// channel setting changes.
    pub async fn observe_message(&self, message: &InboundMessage) {
        let client = self.ctx.client();
        if message.author_id == client.bot_user_id() {
            return;
        }

        let name = self.ctx.settings().snapshot().await.points_tracker.channel;
        let output = match client.find_channel_by_name(&name).await {
            Ok(found) => found.map(|c| c.id),
            Err(e) => {
                debug!(channel = %name, error = %e, "Could not resolve output channel");
                None
            }
        };

        if output == Some(message.channel_id) {
            let mut state = self.ctx.scoreboard().lock();
            state.bury_count += 1;
            debug!(bury_count = state.bury_count, "Scoreboard buried a bit more");
        }
    }

    /// Run one tick at the current time
    pub async fn tick(&self) -> ServiceResult<TickOutcome> {
        self.tick_at(Utc::now()).await
    }

    /// Run one tick as if the clock read `now`
    #[instrument(skip(self))]
    pub async fn tick_at(&self, now: DateTime<Utc>) -> ServiceResult<TickOutcome> {
        let settings = self.ctx.settings().snapshot().await.points_tracker;
        if !settings.enabled {
            return Ok(TickOutcome::Disabled);
        }

        let client = self.ctx.client();
        info!("Checking for voice members to give points to");
        let present = client.voice_members().await?;

        if present.is_empty() {
            let was_hibernating = std::mem::replace(&mut self.ctx.scoreboard().lock().hibernating, true);
            if was_hibernating {
                return Ok(TickOutcome::Hibernating);
            }

            if let Some(channel) = self.output_channel(&settings.channel).await? {
                client
                    .send(channel, &OutgoingMessage::text(EVERYONE_LEFT_NOTICE))
                    .await?;
            }
            info!("Voice emptied, scoreboard hibernating");
            return Ok(TickOutcome::WentQuiet);
        }

        self.ctx.scoreboard().lock().hibernating = false;

        // Scoring is persisted before any posting is attempted
        self.ctx
            .points()
            .update(|ledger| {
                for member in &present {
                    ledger.award(member.id, now);
                }
            })
            .await?;

        let Some(channel) = self.output_channel(&settings.channel).await? else {
            return Ok(TickOutcome::Scored {
                members: present.len(),
                summary: SummaryAction::Skipped,
            });
        };

        let content = self.summary(now, &present).await?;
        let summary = self.publish(channel, &OutgoingMessage::text(content)).await?;

        Ok(TickOutcome::Scored {
            members: present.len(),
            summary,
        })
    }

    async fn output_channel(&self, name: &str) -> ServiceResult<Option<Snowflake>> {
        let found = self.ctx.client().find_channel_by_name(name).await?;

        match found {
            Some(channel) => Ok(Some(channel.id)),
            None => {
                warn!(channel = %name, "Unable to find output channel for points message");
                Ok(None)
            }
        }
    }

    /// Rows for every recent record, in ledger order
    async fn summary(&self, now: DateTime<Utc>, present: &[Member]) -> ServiceResult<String> {
        let ledger = self.ctx.points().snapshot().await;
        let recency = self.ctx.points_policy().recency_secs;
        let present: HashMap<Snowflake, &str> = present
            .iter()
            .map(|m| (m.id, m.display_name.as_str()))
            .collect();

        let mut rows = Vec::new();
        for record in ledger.recent(now, recency) {
            let name = match present.get(&record.member_id) {
                Some(name) => Some((*name).to_string()),
                None => self.ctx.client().display_name(record.member_id).await?,
            };

            let Some(name) = name else {
                warn!(member_id = %record.member_id, "Member not found, leaving them off the scoreboard");
                continue;
            };

            rows.push(SummaryRow {
                name,
                score: record.score,
                present: present.contains_key(&record.member_id),
            });
        }

        Ok(render_summary(&rows))
    }

    /// Edit the standing summary, or repost it if it is missing or buried
    async fn publish(
        &self,
        channel: Snowflake,
        payload: &OutgoingMessage,
    ) -> ServiceResult<SummaryAction> {
        let client = self.ctx.client();
        let threshold = self.ctx.points_policy().bury_threshold;
        let bury_count = self.ctx.scoreboard().lock().bury_count;

        let mut ledger = self.ctx.points().begin().await;

        if let Some(previous) = ledger.scoreboard_message_id {
            if bury_count < threshold {
                match client.edit(channel, previous, payload).await {
                    Ok(()) => {
                        debug!(message_id = %previous, "Scoreboard edited in place");
                        return Ok(SummaryAction::Edited(previous));
                    }
                    Err(e) if e.is_not_found() => {
                        info!(message_id = %previous, "Scoreboard message was gone, posting a new one");
                    }
                    Err(e) => return Err(e.into()),
                }
            } else {
                match client.delete(channel, previous).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {
                        debug!(message_id = %previous, "Old scoreboard already gone");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let posted = client.send(channel, payload).await?;
        ledger.scoreboard_message_id = Some(posted);
        ledger.commit().await?;
        self.ctx.scoreboard().lock().bury_count = 0;

        info!(message_id = %posted, bury_count, "Scoreboard posted");
        Ok(SummaryAction::Posted(posted))
    }
}
