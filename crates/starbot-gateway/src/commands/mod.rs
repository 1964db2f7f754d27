//! Prefixed text commands
//!
//! A message starting with the configured prefix is split on whitespace;
//! the first word names the command, the rest are its arguments. Unknown
//! command names are not an error: the message is simply not a command.

mod handler;

pub use handler::CommandHandler;

use starbot_core::Snowflake;

use crate::error::{HandlerError, HandlerResult};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Force-delete a starboard reflection by its own id
    DeleteStarred { reflection_id: Snowflake },
    ShowSettings,
    SetSetting { key: String, value: String },
    LockName { name: String },
    AddImage { name: Option<String> },
    GetImage { name: Option<String> },
    RemoveImage { name: String, index: String },
    DumpImages { name: Option<String> },
    ListNames,
    GetOpinion { name: String },
    SetOpinion { name: String, words: Vec<String> },
}

impl Command {
    /// Parse message content
    ///
    /// Returns `None` if the content is not a known command, and a usage
    /// error if it is one but the arguments do not fit.
    pub fn parse(prefix: &str, content: &str) -> Option<HandlerResult<Self>> {
        let body = content.trim_start().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let name = words.next()?;
        let args: Vec<&str> = words.collect();

        let usage = |form: &str| HandlerError::usage(format!("Usage: `{prefix}{form}`"));

        let parsed = match name {
            "delete_starred" => match args.as_slice() {
                [id] => Snowflake::parse(id)
                    .map(|reflection_id| Self::DeleteStarred { reflection_id })
                    .map_err(|_| HandlerError::usage(format!("\"{id}\" is not a message id."))),
                _ => Err(usage("delete_starred <message id>")),
            },
            "setting" | "s" => match args.as_slice() {
                [] => Ok(Self::ShowSettings),
                [key, value] => Ok(Self::SetSetting {
                    key: (*key).to_string(),
                    value: (*value).to_string(),
                }),
                _ => Err(HandlerError::usage(format!(
                    "This takes two arguments; you gave me {}.",
                    args.len()
                ))),
            },
            "image_name_lock" | "ilock" => match args.as_slice() {
                [name] => Ok(Self::LockName {
                    name: (*name).to_string(),
                }),
                _ => Err(usage("image_name_lock <name>")),
            },
            "image_add" | "ia" => Ok(Self::AddImage {
                name: args.first().map(|s| (*s).to_string()),
            }),
            "image_get" | "ig" | "i" => match args.as_slice() {
                [] | [_] => Ok(Self::GetImage {
                    name: args.first().map(|s| (*s).to_string()),
                }),
                _ => Err(HandlerError::usage("Too many arguments!")),
            },
            "image_remove" | "ir" => match args.as_slice() {
                [name, index] => Ok(Self::RemoveImage {
                    name: (*name).to_string(),
                    index: (*index).to_string(),
                }),
                _ => Err(usage("image_remove <name> <index>")),
            },
            "image_dump" | "id" => Ok(Self::DumpImages {
                name: args.first().map(|s| (*s).to_string()),
            }),
            "image_list_names" | "inames" => Ok(Self::ListNames),
            "opinion" | "o" => match args.split_first() {
                Some((name, words)) => match name.strip_prefix('!') {
                    Some("") => Err(usage("opinion !<name> <opinion>")),
                    Some(name) => Ok(Self::SetOpinion {
                        name: name.to_string(),
                        words: words.iter().map(|w| (*w).to_string()).collect(),
                    }),
                    None => Ok(Self::GetOpinion {
                        name: (*name).to_string(),
                    }),
                },
                None => Err(usage("opinion <name>")),
            },
            _ => return None,
        };

        Some(parsed)
    }

    /// Command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeleteStarred { .. } => "delete_starred",
            Self::ShowSettings | Self::SetSetting { .. } => "setting",
            Self::LockName { .. } => "image_name_lock",
            Self::AddImage { .. } => "image_add",
            Self::GetImage { .. } => "image_get",
            Self::RemoveImage { .. } => "image_remove",
            Self::DumpImages { .. } => "image_dump",
            Self::ListNames => "image_list_names",
            Self::GetOpinion { .. } | Self::SetOpinion { .. } => "opinion",
        }
    }
}
