//! Event dispatcher
//!
//! Receives platform events from the transport and dispatches them to the
//! services. Failures are logged and contained here: one bad event never
//! stops the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use starbot_core::{DomainError, InboundEvent, InboundMessage, ReactionEvent, Snowflake};
use starbot_service::{
    BotContext, PromptOutcome, PromptService, ScoreboardService, ServiceError, StarboardService,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::commands::{Command, CommandHandler};

/// Capacity of the inbound event channel
pub const EVENT_BUFFER: usize = 256;

/// Event dispatcher that routes inbound events to the services
pub struct EventDispatcher {
    ctx: BotContext,
    /// Whether the dispatcher is running
    running: Arc<AtomicBool>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new(ctx: BotContext) -> Self {
        Self {
            ctx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Channel pair the transport sends events into
    pub fn channel() -> (mpsc::Sender<InboundEvent>, mpsc::Receiver<InboundEvent>) {
        mpsc::channel(EVENT_BUFFER)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the event loop
    ///
    /// This spawns a background task that consumes `receiver` until every
    /// sender is dropped.
    pub fn start(self: Arc<Self>, receiver: mpsc::Receiver<InboundEvent>) -> Option<JoinHandle<()>> {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return None;
        }

        let dispatcher = self.clone();
        let handle = tokio::spawn(async move {
            dispatcher.run(receiver).await;
        });

        tracing::info!("Event dispatcher started");
        Some(handle)
    }

    /// Run the event loop
    async fn run(&self, mut receiver: mpsc::Receiver<InboundEvent>) {
        while let Some(event) = receiver.recv().await {
            self.dispatch(event).await;
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher loop ended");
    }

    /// Handle one event
    ///
    /// Reaction events are handled before this returns. A command is spawned
    /// as its own task, whose handle is returned.
    pub async fn dispatch(&self, event: InboundEvent) -> Option<JoinHandle<()>> {
        tracing::trace!(event = event.name(), "Dispatching event");

        match event {
            InboundEvent::ReactionAdded(reaction) => {
                self.handle_reaction_added(&reaction).await;
                None
            }
            InboundEvent::ReactionRemoved(reaction) => {
                self.sync_starboard(reaction.channel_id, reaction.message_id)
                    .await;
                None
            }
            InboundEvent::ReactionsCleared {
                channel_id,
                message_id,
            } => {
                self.sync_starboard(channel_id, message_id).await;
                None
            }
            InboundEvent::MessageCreated(message) => self.handle_message(message).await,
        }
    }

    async fn handle_reaction_added(&self, reaction: &ReactionEvent) {
        match PromptService::new(&self.ctx).on_reaction(reaction).await {
            Ok(PromptOutcome::NotAPrompt) => {
                self.sync_starboard(reaction.channel_id, reaction.message_id)
                    .await;
            }
            Ok(outcome) => {
                tracing::debug!(
                    message_id = %reaction.message_id,
                    ?outcome,
                    "Reaction consumed by prompt"
                );
            }
            Err(e) => {
                tracing::warn!(
                    message_id = %reaction.message_id,
                    error = %e,
                    "Prompt reaction handling failed"
                );
            }
        }
    }

    async fn sync_starboard(&self, channel_id: Snowflake, message_id: Snowflake) {
        if self.ctx.prompts().is_pending(message_id) {
            return;
        }

        if let Err(e) = StarboardService::new(&self.ctx)
            .sync(channel_id, message_id)
            .await
        {
            match e {
                ServiceError::Domain(
                    DomainError::MessageNotFound(_) | DomainError::ConfigurationMissing(_),
                ) => {
                    tracing::warn!(message_id = %message_id, error = %e, "Starboard sync skipped");
                }
                _ => {
                    tracing::error!(message_id = %message_id, error = %e, "Starboard sync failed");
                }
            }
        }
    }

    async fn handle_message(&self, message: InboundMessage) -> Option<JoinHandle<()>> {
        ScoreboardService::new(&self.ctx)
            .observe_message(&message)
            .await;

        if message.author_is_bot {
            return None;
        }

        let parsed = Command::parse(self.ctx.command_prefix(), &message.content)?;

        let ctx = self.ctx.clone();
        Some(tokio::spawn(async move {
            CommandHandler::new(&ctx, &message).handle(parsed).await;
        }))
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("running", &self.is_running())
            .finish()
    }
}
