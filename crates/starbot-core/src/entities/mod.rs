//! Domain entities

mod channel;
mod member;
mod message;
mod payload;
mod reaction;

pub use channel::ChannelInfo;
pub use member::Member;
pub use message::{Attachment, InboundMessage, SourceMessage};
pub use payload::{Embed, EmbedAuthor, OutgoingMessage};
pub use reaction::ReactionCount;
