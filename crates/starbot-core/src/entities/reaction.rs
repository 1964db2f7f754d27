//! Reaction counts - aggregated emoji reactions on a message

/// Aggregated reaction count for one emoji
///
/// `emoji` is the platform's textual form: the character itself for unicode
/// emoji, `<:name:id>` for custom ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u64,
}

impl ReactionCount {
    /// Create a new ReactionCount
    pub fn new(emoji: impl Into<String>, count: u64) -> Self {
        Self {
            emoji: emoji.into(),
            count,
        }
    }

    /// Check if this count is for a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji: &str) -> bool {
        self.emoji == emoji
    }
}
