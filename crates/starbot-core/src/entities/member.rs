//! Member entity - a guild member as seen in a voice session

use crate::value_objects::Snowflake;

/// Guild member with the name other members see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Snowflake,
    pub display_name: String,
}

impl Member {
    /// Create a new Member
    pub fn new(id: Snowflake, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
