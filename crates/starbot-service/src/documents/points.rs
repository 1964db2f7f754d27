//! `cog__PointsTracker` namespace - voice points ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use starbot_core::Snowflake;
use starbot_store::Document;

/// Points of every member ever seen in voice, plus the standing summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsLedger {
    /// Records in the order members were first seen
    pub members: Vec<ScoreRecord>,
    pub scoreboard_message_id: Option<Snowflake>,
}

impl Document for PointsLedger {
    const NAME: &'static str = "cog__PointsTracker";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub member_id: Snowflake,
    pub score: u64,
    pub last_gained: DateTime<Utc>,
}

impl PointsLedger {
    /// Give a member one point at `now`, creating their record on first sight
    pub fn award(&mut self, member_id: Snowflake, now: DateTime<Utc>) -> u64 {
        let idx = match self.members.iter().position(|r| r.member_id == member_id) {
            Some(idx) => idx,
            None => {
                tracing::info!(member_id = %member_id, "Adding member to scoreboard");
                self.members.push(ScoreRecord {
                    member_id,
                    score: 0,
                    last_gained: now,
                });
                self.members.len() - 1
            }
        };

        let record = &mut self.members[idx];
        record.score += 1;
        record.last_gained = now;
        record.score
    }

    pub fn record(&self, member_id: Snowflake) -> Option<&ScoreRecord> {
        self.members.iter().find(|r| r.member_id == member_id)
    }

    /// Records that gained a point at most `window_secs` before `now`
    pub fn recent(
        &self,
        now: DateTime<Utc>,
        window_secs: u64,
    ) -> impl Iterator<Item = &ScoreRecord> + '_ {
        let window = i64::try_from(window_secs).unwrap_or(i64::MAX);
        self.members
            .iter()
            .filter(move |r| (now - r.last_gained).num_seconds() <= window)
    }
}
