//! `message_map` namespace - source message id to starboard reflection id

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starbot_core::Snowflake;
use starbot_store::Document;

/// Live reflections on the board, keyed by source message id
///
/// An entry exists exactly while its source is reflected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionMap(BTreeMap<String, Snowflake>);

impl Document for ReflectionMap {
    const NAME: &'static str = "message_map";
}

impl ReflectionMap {
    /// Reflection currently posted for a source message
    pub fn get(&self, source_id: Snowflake) -> Option<Snowflake> {
        self.0.get(&source_id.to_string()).copied()
    }

    /// Record the reflection of a source, returning the one it replaces
    pub fn insert(&mut self, source_id: Snowflake, reflection_id: Snowflake) -> Option<Snowflake> {
        self.0.insert(source_id.to_string(), reflection_id)
    }

    pub fn remove(&mut self, source_id: Snowflake) -> Option<Snowflake> {
        self.0.remove(&source_id.to_string())
    }

    /// Drop every entry pointing at `reflection_id`, returning how many went
    pub fn prune_reflection(&mut self, reflection_id: Snowflake) -> usize {
        let before = self.0.len();
        self.0.retain(|_, v| *v != reflection_id);
        before - self.0.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
