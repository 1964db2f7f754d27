//! Bot context - dependency container for services
//!
//! Built once at startup and shared (cheaply cloned) with every handler and
//! the scoreboard task. Nothing in the bot reaches for global state.

use std::sync::Arc;

use parking_lot::Mutex;
use starbot_common::PointsPolicy;
use starbot_core::ChatClient;
use starbot_store::{DocumentStore, Namespace};

use super::error::{ServiceError, ServiceResult};
use super::prompt::PromptRegistry;
use super::scoreboard::ScoreboardState;
use crate::documents::{Opinions, PointsLedger, QuickImages, ReflectionMap, Settings};

/// Bot context containing all dependencies
///
/// Provides access to:
/// - The chat platform client
/// - One loaded handle per namespace
/// - The confirmation prompt registry
/// - In-memory scoreboard state
#[derive(Clone)]
pub struct BotContext {
    // Chat platform
    client: Arc<dyn ChatClient>,

    // Namespaces
    store: Arc<DocumentStore>,
    settings: Arc<Namespace<Settings>>,
    reflections: Arc<Namespace<ReflectionMap>>,
    points: Arc<Namespace<PointsLedger>>,
    images: Arc<Namespace<QuickImages>>,
    opinions: Arc<Namespace<Opinions>>,

    // In-memory state
    prompts: Arc<PromptRegistry>,
    scoreboard: Arc<Mutex<ScoreboardState>>,

    // Bootstrap options
    points_policy: PointsPolicy,
    command_prefix: Arc<str>,
}

impl BotContext {
    /// Load every namespace from `store` and assemble the context
    pub async fn load(
        client: Arc<dyn ChatClient>,
        store: Arc<DocumentStore>,
        points_policy: PointsPolicy,
        command_prefix: &str,
    ) -> ServiceResult<Self> {
        let settings: Namespace<Settings> = Namespace::load(store.clone()).await?;
        let reflections: Namespace<ReflectionMap> = Namespace::load(store.clone()).await?;
        let points: Namespace<PointsLedger> = Namespace::load(store.clone()).await?;
        let images: Namespace<QuickImages> = Namespace::load(store.clone()).await?;
        let opinions: Namespace<Opinions> = Namespace::load(store.clone()).await?;

        tracing::info!(root = %store.root().display(), "Namespaces loaded");

        Ok(Self {
            client,
            store,
            settings: Arc::new(settings),
            reflections: Arc::new(reflections),
            points: Arc::new(points),
            images: Arc::new(images),
            opinions: Arc::new(opinions),
            prompts: Arc::new(PromptRegistry::new()),
            scoreboard: Arc::new(Mutex::new(ScoreboardState::new())),
            points_policy,
            command_prefix: Arc::from(command_prefix),
        })
    }

    // === Chat Platform ===

    /// Get the chat platform client
    pub fn client(&self) -> &dyn ChatClient {
        self.client.as_ref()
    }

    // === Namespaces ===

    /// Get the document store backing all namespaces
    pub fn store(&self) -> &DocumentStore {
        self.store.as_ref()
    }

    pub fn settings(&self) -> &Namespace<Settings> {
        self.settings.as_ref()
    }

    /// Get the starboard reflection map
    pub fn reflections(&self) -> &Namespace<ReflectionMap> {
        self.reflections.as_ref()
    }

    /// Get the voice points ledger
    pub fn points(&self) -> &Namespace<PointsLedger> {
        self.points.as_ref()
    }

    pub fn images(&self) -> &Namespace<QuickImages> {
        self.images.as_ref()
    }

    pub fn opinions(&self) -> &Namespace<Opinions> {
        self.opinions.as_ref()
    }

    // === In-memory State ===

    /// Get the confirmation prompt registry
    pub fn prompts(&self) -> &PromptRegistry {
        self.prompts.as_ref()
    }

    /// Get the scoreboard state; never hold the lock across an await
    pub fn scoreboard(&self) -> &Mutex<ScoreboardState> {
        self.scoreboard.as_ref()
    }

    // === Options ===

    pub fn points_policy(&self) -> PointsPolicy {
        self.points_policy
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("client", &"dyn ChatClient")
            .field("store", &self.store)
            .field("pending_prompts", &self.prompts.pending())
            .field("points_policy", &self.points_policy)
            .field("command_prefix", &self.command_prefix)
            .finish()
    }
}

/// Builder for creating a BotContext with custom configuration
pub struct BotContextBuilder {
    client: Option<Arc<dyn ChatClient>>,
    store: Option<Arc<DocumentStore>>,
    points_policy: PointsPolicy,
    command_prefix: String,
}

impl BotContextBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            store: None,
            points_policy: PointsPolicy::default(),
            command_prefix: "&".to_string(),
        }
    }

    pub fn client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn store(mut self, store: Arc<DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn points_policy(mut self, policy: PointsPolicy) -> Self {
        self.points_policy = policy;
        self
    }

    pub fn command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Build the BotContext, loading every namespace
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub async fn build(self) -> ServiceResult<BotContext> {
        let client = self
            .client
            .ok_or_else(|| ServiceError::validation("client is required"))?;
        let store = self
            .store
            .ok_or_else(|| ServiceError::validation("store is required"))?;

        BotContext::load(client, store, self.points_policy, &self.command_prefix).await
    }
}

impl Default for BotContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
