//! # starbot-gateway
//!
//! The bot's event loop. Platform events arrive on an mpsc channel and are
//! handled one at a time in arrival order:
//!
//! - reaction events go to pending confirmation prompts first, then to the
//!   starboard
//! - new messages count towards burying the scoreboard and may carry a
//!   command, which runs as its own task so a command waiting on a prompt
//!   never blocks the loop
//!
//! The scoreboard poller runs beside the loop on its own interval.

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod poller;

pub use commands::{Command, CommandHandler};
pub use dispatcher::EventDispatcher;
pub use error::{HandlerError, HandlerResult};
pub use poller::ScoreboardPoller;
