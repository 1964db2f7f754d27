//! Confirmation prompt
//!
//! Asks one user a multiple-choice question through reactions on an anchor
//! message and suspends until they answer. A prompt is a single-shot
//! subscription in the `PromptRegistry`: the first qualifying reaction
//! removes it from the registry and completes the waiting `ask` through a
//! oneshot channel, so no later event can resolve it again.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use starbot_core::{ReactionEvent, Snowflake};
use tokio::sync::oneshot;
use tracing::{debug, info, instrument};

use super::context::BotContext;
use super::error::{ServiceError, ServiceResult};

// ============================================================================
// Choices
// ============================================================================

/// Ordered emoji to label pairs offered as answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMap {
    choices: Vec<(String, String)>,
}

impl ChoiceMap {
    /// Build a choice map
    ///
    /// # Errors
    /// Returns a validation error if no choices are given or an emoji repeats
    pub fn new<I, E, L>(pairs: I) -> ServiceResult<Self>
    where
        I: IntoIterator<Item = (E, L)>,
        E: Into<String>,
        L: Into<String>,
    {
        let mut choices: Vec<(String, String)> = Vec::new();
        for (emoji, label) in pairs {
            let emoji = emoji.into();
            if choices.iter().any(|(e, _)| *e == emoji) {
                return Err(ServiceError::validation(format!(
                    "Duplicate prompt choice {emoji}"
                )));
            }
            choices.push((emoji, label.into()));
        }

        if choices.is_empty() {
            return Err(ServiceError::validation("A prompt needs at least one choice"));
        }

        Ok(Self { choices })
    }

    /// 👍 for "yes", 👎 for "no"
    pub fn yes_no() -> Self {
        Self {
            choices: vec![
                ("\u{1F44D}".to_string(), "yes".to_string()),
                ("\u{1F44E}".to_string(), "no".to_string()),
            ],
        }
    }

    pub fn label_for(&self, emoji: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|(e, _)| e == emoji)
            .map(|(_, label)| label.as_str())
    }

    /// Emojis in the order they are offered
    pub fn emojis(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|(e, _)| e.as_str())
    }
}

// ============================================================================
// Registry
// ============================================================================

struct Subscription {
    token: u64,
    target_user: Snowflake,
    choices: ChoiceMap,
    responder: oneshot::Sender<String>,
}

/// What a reaction means to the pending prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The reaction is not on a prompt anchor
    NotAPrompt,
    /// The bot's own choice marker, or a prompt that was already answered
    Ignored,
    /// Wrong user or unlisted emoji; the reaction was taken back
    Retracted,
    /// The prompt was answered with this label
    Resolved(String),
}

enum Verdict {
    NotAPrompt,
    Ignore,
    Retract,
    Accept,
}

/// Pending prompts keyed by anchor message id
pub struct PromptRegistry {
    sessions: DashMap<Snowflake, Subscription>,
    next_token: AtomicU64,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_token: AtomicU64::new(1),
        }
    }

    /// Number of prompts waiting for an answer
    pub fn pending(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_pending(&self, anchor: Snowflake) -> bool {
        self.sessions.contains_key(&anchor)
    }

    fn register(
        &self,
        anchor: Snowflake,
        target_user: Snowflake,
        choices: ChoiceMap,
    ) -> (u64, oneshot::Receiver<String>) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (responder, receiver) = oneshot::channel();

        // A previous prompt on the same anchor is superseded; its sender is dropped
        self.sessions.insert(
            anchor,
            Subscription {
                token,
                target_user,
                choices,
                responder,
            },
        );

        (token, receiver)
    }

    /// Remove a subscription if it is still the one identified by `token`
    fn deregister(&self, anchor: Snowflake, token: u64) -> bool {
        self.sessions
            .remove_if(&anchor, |_, s| s.token == token)
            .is_some()
    }

    fn inspect(&self, event: &ReactionEvent, bot_user: Snowflake) -> Verdict {
        let Some(session) = self.sessions.get(&event.message_id) else {
            return Verdict::NotAPrompt;
        };

        if event.user_id == bot_user {
            Verdict::Ignore
        } else if event.user_id == session.target_user
            && session.choices.label_for(&event.emoji).is_some()
        {
            Verdict::Accept
        } else {
            Verdict::Retract
        }
    }

    /// Resolve the prompt on `anchor` if `user_id` may answer it with `emoji`
    ///
    /// Removal and the answer happen together, so of two racing reactions
    /// only the first one resolves the prompt.
    fn resolve(&self, anchor: Snowflake, user_id: Snowflake, emoji: &str) -> Option<String> {
        let (_, session) = self.sessions.remove_if(&anchor, |_, s| {
            s.target_user == user_id && s.choices.label_for(emoji).is_some()
        })?;

        let label = session.choices.label_for(emoji)?.to_string();
        // The asker may have given up already; nothing to do then
        let _ = session.responder.send(label.clone());
        Some(label)
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Deregisters a subscription when `ask` returns or is dropped
struct PendingGuard<'a> {
    registry: &'a PromptRegistry,
    anchor: Snowflake,
    token: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.registry.deregister(self.anchor, self.token) {
            debug!(anchor = %self.anchor, "Prompt abandoned");
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// Confirmation prompt service
pub struct PromptService<'a> {
    ctx: &'a BotContext,
}

impl<'a> PromptService<'a> {
    /// Create a new PromptService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Ask `target_user` to pick one of `choices` by reacting to `anchor`
    ///
    /// Never times out on its own; wrap it in a timeout to bound the wait.
    /// Dropping the returned future withdraws the prompt.
    #[instrument(skip(self, choices))]
    pub async fn ask(
        &self,
        target_user: Snowflake,
        channel_id: Snowflake,
        anchor: Snowflake,
        choices: ChoiceMap,
    ) -> ServiceResult<String> {
        let registry = self.ctx.prompts();
        let client = self.ctx.client();

        let (token, receiver) = registry.register(anchor, target_user, choices.clone());
        let _guard = PendingGuard {
            registry,
            anchor,
            token,
        };

        for emoji in choices.emojis() {
            client.add_reaction(channel_id, anchor, emoji).await?;
        }

        let label = receiver
            .await
            .map_err(|_| ServiceError::internal("prompt was superseded by another prompt"))?;

        client.delete(channel_id, anchor).await?;

        info!(anchor = %anchor, user_id = %target_user, answer = %label, "Prompt answered");

        Ok(label)
    }

    /// Feed a reaction-added event to the pending prompts
    pub async fn on_reaction(&self, event: &ReactionEvent) -> ServiceResult<PromptOutcome> {
        let registry = self.ctx.prompts();
        let client = self.ctx.client();

        match registry.inspect(event, client.bot_user_id()) {
            Verdict::NotAPrompt => Ok(PromptOutcome::NotAPrompt),
            Verdict::Ignore => Ok(PromptOutcome::Ignored),
            Verdict::Retract => {
                debug!(
                    anchor = %event.message_id,
                    user_id = %event.user_id,
                    emoji = %event.emoji,
                    "Retracting reaction on prompt"
                );
                client
                    .remove_reaction(event.channel_id, event.message_id, &event.emoji, event.user_id)
                    .await?;
                Ok(PromptOutcome::Retracted)
            }
            Verdict::Accept => {
                match registry.resolve(event.message_id, event.user_id, &event.emoji) {
                    Some(label) => Ok(PromptOutcome::Resolved(label)),
                    None => Ok(PromptOutcome::Ignored),
                }
            }
        }
    }
}
