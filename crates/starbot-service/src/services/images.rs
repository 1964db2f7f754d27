//! Image collection service
//!
//! Users collect image links under names. A user may lock one name at a
//! time; only the lock holder may add images to or remove images from a
//! locked name. Names are case-insensitive and stored lower-cased.

use rand::Rng;
use starbot_core::{Attachment, DomainError, OutgoingMessage, Snowflake};
use tracing::{info, instrument};

use super::context::BotContext;
use super::error::{ServiceError, ServiceResult};
use super::prompt::{ChoiceMap, PromptService};

/// Messages are cut below the platform's 2000 character limit
const MESSAGE_LIMIT: usize = 2000;

/// Result of a name lock request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    Locked {
        name: String,
        previous: Option<String>,
    },
    /// The user already holds this name
    AlreadyYours(String),
    /// The user declined to give up their current name
    Kept(String),
}

/// A randomly picked image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePick {
    pub name: String,
    /// 1-based position in the collection
    pub index: usize,
    pub total: usize,
    pub url: String,
}

impl ImagePick {
    /// Text to post; spoilered uploads stay hidden
    pub fn render(&self) -> String {
        format!("[{}/{}] {}", self.index, self.total, spoilered(&self.url))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn spoilered(url: &str) -> String {
    let basename = url.rsplit('/').next().unwrap_or(url);
    if basename.starts_with("SPOILER_") {
        format!("|| {url} ||")
    } else {
        url.to_string()
    }
}

/// Longest single listing line; longer URLs are clipped
const MAX_LINE: usize = 1900;

/// Cut `text` to at most `max` bytes on a char boundary, marking the cut
fn clip(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max.saturating_sub("…".len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

/// Split a collection listing into messages under the length limit
pub fn dump_chunks(name: &str, urls: &[String]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut text = format!("```\nName: {}\n=====================\n", clip(name, 100));

    for (i, url) in urls.iter().enumerate() {
        let line = clip(&format!(" {:>3} {url}", i + 1), MAX_LINE) + "\n";
        if text.len() + line.len() + "```".len() >= MESSAGE_LIMIT {
            text.push_str("```");
            chunks.push(std::mem::replace(&mut text, String::from("```\n")));
        }
        text.push_str(&line);
    }

    text.push_str("```");
    chunks.push(text);
    chunks
}

/// Image collection service
pub struct ImageService<'a> {
    ctx: &'a BotContext,
}

impl<'a> ImageService<'a> {
    /// Create a new ImageService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    fn name_lock_help(&self) -> ServiceError {
        ServiceError::validation(format!(
            "Please register your name with `{}image_name_lock` first.",
            self.ctx.command_prefix()
        ))
    }

    /// Given name, or the caller's locked name
    async fn resolve_name(&self, user_id: Snowflake, name: Option<&str>) -> ServiceResult<String> {
        if let Some(name) = name {
            return Ok(normalize(name));
        }

        self.ctx
            .images()
            .snapshot()
            .await
            .locked_name(user_id)
            .map(str::to_string)
            .ok_or_else(|| self.name_lock_help())
    }

    /// Lock `name` for `user_id`
    ///
    /// Changing an existing lock asks the user for confirmation in
    /// `channel_id` first.
    #[instrument(skip(self))]
    pub async fn lock_name(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        name: &str,
    ) -> ServiceResult<LockOutcome> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(ServiceError::validation("Give me a name to lock."));
        }

        let current = {
            let images = self.ctx.images().snapshot().await;
            if images.owner_of(&name).is_some_and(|owner| owner != user_id) {
                return Err(DomainError::NameAlreadyLocked(name).into());
            }
            images.locked_name(user_id).map(str::to_string)
        };

        if let Some(current) = current {
            if current == name {
                return Ok(LockOutcome::AlreadyYours(name));
            }

            let question = self
                .ctx
                .client()
                .send(
                    channel_id,
                    &OutgoingMessage::text(format!(
                        "You have already locked the name \"{current}\". Would you like to change your locked name?"
                    )),
                )
                .await?;

            let answer = PromptService::new(self.ctx)
                .ask(user_id, channel_id, question, ChoiceMap::yes_no())
                .await?;

            if answer != "yes" {
                return Ok(LockOutcome::Kept(current));
            }
        }

        // The name may have been taken while the user was answering
        let mut images = self.ctx.images().begin().await;
        if images.owner_of(&name).is_some_and(|owner| owner != user_id) {
            return Err(DomainError::NameAlreadyLocked(name).into());
        }
        let previous = images.lock(user_id, &name);
        images.commit().await?;

        info!(name = %name, previous = ?previous, "Name locked");
        Ok(LockOutcome::Locked { name, previous })
    }

    /// Add the first attachment to a collection, returning its new size
    #[instrument(skip(self, attachments))]
    pub async fn add(
        &self,
        user_id: Snowflake,
        name: Option<&str>,
        attachments: &[Attachment],
    ) -> ServiceResult<(String, usize)> {
        let name = self.resolve_name(user_id, name).await?;
        let attachment = attachments
            .first()
            .ok_or_else(|| ServiceError::validation("Attach an image for me to save it."))?;

        let mut images = self.ctx.images().begin().await;
        if !images.may_edit(user_id, &name) {
            return Err(DomainError::NotNameOwner(name).into());
        }
        let collection = images.collections.entry(name.clone()).or_default();
        collection.push(attachment.url.clone());
        let total = collection.len();
        images.commit().await?;

        info!(name = %name, total, "Image added");
        Ok((name, total))
    }

    /// Pick a random image of a collection
    pub async fn random(&self, user_id: Snowflake, name: Option<&str>) -> ServiceResult<ImagePick> {
        let name = self.resolve_name(user_id, name).await?;
        let images = self.ctx.images().snapshot().await;
        let urls = images.images(&name);

        if urls.is_empty() {
            return Err(ServiceError::validation(format!(
                "I have no images for {name}. Please register some with `{}ia`",
                self.ctx.command_prefix()
            )));
        }

        let idx = rand::thread_rng().gen_range(0..urls.len());
        Ok(ImagePick {
            url: urls[idx].clone(),
            index: idx + 1,
            total: urls.len(),
            name,
        })
    }

    /// Remove the image at a 1-based index, returning the remaining count
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        user_id: Snowflake,
        name: &str,
        index: &str,
    ) -> ServiceResult<(String, usize)> {
        let name = normalize(name);

        let mut images = self.ctx.images().begin().await;
        if images.images(&name).is_empty() {
            return Err(ServiceError::validation("There are no images to remove."));
        }
        if !images.may_edit(user_id, &name) {
            return Err(DomainError::NotNameOwner(name).into());
        }

        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| ServiceError::validation("Please enter an integer index."))?;

        let collection = images.collections.entry(name.clone()).or_default();
        if index == 0 || index > collection.len() {
            return Err(ServiceError::validation("Invalid index."));
        }
        collection.remove(index - 1);
        let remaining = collection.len();
        images.commit().await?;

        info!(name = %name, remaining, "Image removed");
        Ok((name, remaining))
    }

    /// Listing of a collection, split into postable chunks
    pub async fn dump(&self, user_id: Snowflake, name: Option<&str>) -> ServiceResult<Vec<String>> {
        let name = self.resolve_name(user_id, name).await?;
        let images = self.ctx.images().snapshot().await;
        let urls = images.images(&name);

        if urls.is_empty() {
            return Err(ServiceError::validation("There are no images to dump."));
        }

        Ok(dump_chunks(&name, urls))
    }

    /// Every collection name with its image count
    pub async fn list_names(&self) -> Vec<(String, usize)> {
        self.ctx
            .images()
            .snapshot()
            .await
            .collections
            .iter()
            .map(|(name, urls)| (name.clone(), urls.len()))
            .collect()
    }
}
