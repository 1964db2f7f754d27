//! Command execution
//!
//! Runs a parsed command against the services and posts the reply in the
//! channel the command came from. A failed command gets exactly one reply
//! explaining the failure.

use starbot_core::{InboundMessage, OutgoingMessage, Snowflake};
use starbot_service::{
    BotContext, ImageService, LockOutcome, OpinionService, SettingsService, StarboardService,
};
use tracing::{error, info};

use super::Command;
use crate::error::HandlerResult;

/// Executes commands on behalf of the message author
pub struct CommandHandler<'a> {
    ctx: &'a BotContext,
    message: &'a InboundMessage,
}

impl<'a> CommandHandler<'a> {
    /// Create a handler for commands found in `message`
    pub fn new(ctx: &'a BotContext, message: &'a InboundMessage) -> Self {
        Self { ctx, message }
    }

    /// Run a parse result to completion, replying to the author either way
    pub async fn handle(&self, parsed: HandlerResult<Command>) {
        let (name, result) = match parsed {
            Ok(command) => (command.name(), self.execute(command).await),
            Err(e) => ("<unparsed>", Err(e)),
        };

        let Err(err) = result else {
            return;
        };

        if err.is_rejection() {
            info!(command = name, author_id = %self.message.author_id, error = %err, "Command rejected");
        } else {
            error!(command = name, author_id = %self.message.author_id, error = %err, "Command failed");
        }

        if let Err(e) = self.reply(err.user_message()).await {
            error!(command = name, error = %e, "Could not reply to failed command");
        }
    }

    async fn reply(&self, text: impl Into<String>) -> HandlerResult<Snowflake> {
        let id = self
            .ctx
            .client()
            .send(self.message.channel_id, &OutgoingMessage::text(text))
            .await?;
        Ok(id)
    }

    /// Execute one command
    pub async fn execute(&self, command: Command) -> HandlerResult<()> {
        let author = self.message.author_id;

        match command {
            Command::DeleteStarred { reflection_id } => {
                let pruned = StarboardService::new(self.ctx)
                    .delete_starred(reflection_id)
                    .await?;
                info!(reflection_id = %reflection_id, pruned, "delete_starred done");
            }
            Command::ShowSettings => {
                let json = SettingsService::new(self.ctx).describe().await?;
                self.reply(format!("My current settings are:\n```json\n{json}\n```"))
                    .await?;
            }
            Command::SetSetting { key, value } => {
                SettingsService::new(self.ctx).set(&key, &value).await?;
                self.reply(format!("Done! `{key}` has been set to `{value}`."))
                    .await?;
            }
            Command::LockName { name } => {
                let outcome = ImageService::new(self.ctx)
                    .lock_name(author, self.message.channel_id, &name)
                    .await?;
                let text = match outcome {
                    LockOutcome::Locked { name, .. } => {
                        format!("You have locked the name \"{name}\".")
                    }
                    LockOutcome::AlreadyYours(name) => {
                        format!("You have already locked \"{name}\".")
                    }
                    LockOutcome::Kept(name) => format!("Okay, you keep \"{name}\"."),
                };
                self.reply(text).await?;
            }
            Command::AddImage { name } => {
                let (name, total) = ImageService::new(self.ctx)
                    .add(author, name.as_deref(), &self.message.attachments)
                    .await?;
                self.reply(format!("Added. {name} now has {total} images."))
                    .await?;
            }
            Command::GetImage { name } => {
                let pick = ImageService::new(self.ctx)
                    .random(author, name.as_deref())
                    .await?;
                self.reply(pick.render()).await?;
            }
            Command::RemoveImage { name, index } => {
                let (name, remaining) = ImageService::new(self.ctx)
                    .remove(author, &name, &index)
                    .await?;
                self.reply(format!("Deleted. {name} now has {remaining} images."))
                    .await?;
            }
            Command::DumpImages { name } => {
                let chunks = ImageService::new(self.ctx)
                    .dump(author, name.as_deref())
                    .await?;
                for chunk in chunks {
                    self.reply(chunk).await?;
                }
            }
            Command::ListNames => {
                let names = ImageService::new(self.ctx).list_names().await;
                if names.is_empty() {
                    self.reply("Nobody has saved any images yet.").await?;
                } else {
                    let mut text = String::from("```\n");
                    for (name, count) in names {
                        text.push_str(&format!("{name} | {count}\n"));
                    }
                    text.push_str("```");
                    self.reply(text).await?;
                }
            }
            Command::GetOpinion { name } => {
                let text = match OpinionService::new(self.ctx).get(&name).await {
                    Some(opinion) => opinion,
                    None => format!("I have no thoughts on {}", name.to_lowercase()),
                };
                self.reply(text).await?;
            }
            Command::SetOpinion { name, words } => {
                let words: Vec<&str> = words.iter().map(String::as_str).collect();
                let opinion = OpinionService::new(self.ctx).set(&name, &words).await?;
                self.reply(format!(
                    "Gotcha, my new opinion of {} is \"{opinion}\".",
                    name.to_lowercase()
                ))
                .await?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for CommandHandler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("message_id", &self.message.id)
            .finish()
    }
}
