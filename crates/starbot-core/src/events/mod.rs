//! Inbound chat events consumed by the bot

mod inbound;

pub use inbound::{InboundEvent, ReactionEvent};
