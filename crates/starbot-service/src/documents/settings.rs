//! `settings` namespace - runtime-editable bot settings

use serde::{Deserialize, Serialize};
use starbot_store::Document;

/// Runtime settings, editable live with the `setting` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub starboard: StarboardSettings,
    pub points_tracker: PointsTrackerSettings,
}

impl Document for Settings {
    const NAME: &'static str = "settings";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarboardSettings {
    /// Emoji that nominates a message for the board
    pub emoji: String,
    /// Name of the board channel
    pub channel: String,
    /// Reactions needed before a message is reflected
    pub threshold: i64,
}

impl Default for StarboardSettings {
    fn default() -> Self {
        Self {
            emoji: "⭐".to_string(),
            channel: "starboard".to_string(),
            threshold: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsTrackerSettings {
    pub enabled: bool,
    /// Name of the channel the scoreboard is posted to
    pub channel: String,
}

impl Default for PointsTrackerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            channel: "points".to_string(),
        }
    }
}
