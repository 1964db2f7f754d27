//! Business logic services
//!
//! Each service borrows the shared `BotContext` and implements one group of
//! use cases on top of the chat client and the namespaces.

pub mod context;
pub mod error;
pub mod images;
pub mod opinions;
pub mod prompt;
pub mod scoreboard;
pub mod settings;
pub mod starboard;

// Re-export all services for convenience
pub use context::{BotContext, BotContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use images::{ImagePick, ImageService, LockOutcome};
pub use opinions::OpinionService;
pub use prompt::{ChoiceMap, PromptOutcome, PromptRegistry, PromptService};
pub use scoreboard::{
    ScoreboardService, ScoreboardState, SummaryAction, SummaryRow, TickOutcome, EVERYONE_LEFT_NOTICE,
};
pub use settings::SettingsService;
pub use starboard::{StarboardService, Transition};
