//! Opinion service

use tracing::{debug, instrument};

use super::context::BotContext;
use super::error::{ServiceError, ServiceResult};

/// Opinion service
pub struct OpinionService<'a> {
    ctx: &'a BotContext,
}

impl<'a> OpinionService<'a> {
    /// Create a new OpinionService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Current opinion of `name`
    pub async fn get(&self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        self.ctx.opinions().snapshot().await.0.get(&name).cloned()
    }

    /// Replace the opinion of `name` with `words` joined by spaces
    #[instrument(skip(self, words))]
    pub async fn set(&self, name: &str, words: &[&str]) -> ServiceResult<String> {
        let opinion = words.join(" ").trim().to_string();
        if opinion.is_empty() {
            return Err(ServiceError::validation("You did not provide an opinion."));
        }

        let name = name.to_lowercase();
        self.ctx
            .opinions()
            .update(|opinions| opinions.0.insert(name.clone(), opinion.clone()))
            .await?;

        debug!(name = %name, "Opinion set");
        Ok(opinion)
    }
}
