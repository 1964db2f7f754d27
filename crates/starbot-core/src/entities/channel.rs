//! Channel entity - the parts of a guild channel the bot needs

use crate::value_objects::Snowflake;

/// A guild text channel resolved by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: Snowflake,
    pub name: String,
}

impl ChannelInfo {
    /// Create a new ChannelInfo
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
