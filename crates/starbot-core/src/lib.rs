//! # starbot-core
//!
//! Domain layer containing ids, entities, outbound payloads, inbound events,
//! and the `ChatClient` port. This crate has no dependency on the chat
//! platform SDK or on the persistence layer.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, ChannelInfo, Embed, EmbedAuthor, InboundMessage, Member, OutgoingMessage,
    ReactionCount, SourceMessage,
};
pub use error::DomainError;
pub use events::{InboundEvent, ReactionEvent};
pub use traits::{ChatClient, ClientResult};
pub use value_objects::{Snowflake, SnowflakeParseError};
