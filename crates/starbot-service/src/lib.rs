//! # starbot-service
//!
//! Application layer: the namespace documents the bot persists and the
//! services that act on them (starboard, scoreboard, confirmation prompts,
//! image collections, opinions and settings).

pub mod documents;
pub mod services;

pub use documents::{
    Opinions, PointsLedger, PointsTrackerSettings, QuickImages, ReflectionMap, ScoreRecord,
    Settings, StarboardSettings,
};
pub use services::{
    BotContext, BotContextBuilder, ChoiceMap, ImagePick, ImageService, LockOutcome,
    OpinionService, PromptOutcome, PromptRegistry, PromptService, ScoreboardService,
    ScoreboardState, ServiceError, ServiceResult, SettingsService, StarboardService,
    SummaryAction, TickOutcome, Transition, EVERYONE_LEFT_NOTICE,
};
