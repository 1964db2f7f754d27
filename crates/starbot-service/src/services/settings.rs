//! Settings service
//!
//! Reads and edits the `settings` namespace by dotted key. A new value is
//! converted to the JSON kind of the value it replaces, and the edited
//! document must still describe valid settings before it is committed.

use serde_json::{Number, Value};
use tracing::{info, instrument};

use super::context::BotContext;
use super::error::{ServiceError, ServiceResult};
use crate::documents::Settings;

/// Convert `raw` to the JSON kind of `current`
fn coerce(current: &Value, raw: &str) -> Option<Value> {
    match current {
        Value::Bool(_) => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) if n.is_f64() => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        Value::Number(_) => raw.trim().parse::<i64>().ok().map(Value::from),
        Value::String(_) => Some(Value::String(raw.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Settings service
pub struct SettingsService<'a> {
    ctx: &'a BotContext,
}

impl<'a> SettingsService<'a> {
    /// Create a new SettingsService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Current settings as indented JSON
    pub async fn describe(&self) -> ServiceResult<String> {
        let settings = self.ctx.settings().snapshot().await;
        serde_json::to_string_pretty(&settings).map_err(|e| ServiceError::internal(e.to_string()))
    }

    /// Set the setting at dotted `key` to `raw`
    #[instrument(skip(self))]
    pub async fn set(&self, key: &str, raw: &str) -> ServiceResult<()> {
        let unknown = || ServiceError::validation(format!("I do not have a setting called \"{key}\"."));
        let unconvertible =
            || ServiceError::validation(format!("I was unable to convert \"{raw}\" to the right type."));

        let mut tx = self.ctx.settings().begin().await;
        let mut doc =
            serde_json::to_value(&*tx).map_err(|e| ServiceError::internal(e.to_string()))?;

        let slot = key
            .split('.')
            .try_fold(&mut doc, |node, part| node.as_object_mut()?.get_mut(part))
            .ok_or_else(unknown)?;

        *slot = coerce(slot, raw).ok_or_else(unconvertible)?;

        *tx = serde_json::from_value::<Settings>(doc).map_err(|_| unconvertible())?;
        tx.commit().await?;

        info!(key = %key, value = %raw, "Setting changed");
        Ok(())
    }
}
