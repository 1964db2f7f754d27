//! `cog__QuickImages` namespace - image collections and name locks

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starbot_core::Snowflake;
use starbot_store::Document;

/// Image collections by name, and the one name each user has locked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickImages {
    pub collections: BTreeMap<String, Vec<String>>,
    /// User id to locked name
    pub name_locks: BTreeMap<String, String>,
}

impl Document for QuickImages {
    const NAME: &'static str = "cog__QuickImages";
}

impl QuickImages {
    /// Name locked by a user
    pub fn locked_name(&self, user_id: Snowflake) -> Option<&str> {
        self.name_locks.get(&user_id.to_string()).map(String::as_str)
    }

    /// User holding the lock on a name
    pub fn owner_of(&self, name: &str) -> Option<Snowflake> {
        self.name_locks
            .iter()
            .find(|(_, locked)| locked.as_str() == name)
            .and_then(|(user, _)| Snowflake::parse(user).ok())
    }

    /// Whether `user_id` may change the images of `name`
    ///
    /// Unlocked names are open to everyone.
    pub fn may_edit(&self, user_id: Snowflake, name: &str) -> bool {
        self.owner_of(name).map_or(true, |owner| owner == user_id)
    }

    /// Lock `name` for a user, returning the name they held before
    pub fn lock(&mut self, user_id: Snowflake, name: &str) -> Option<String> {
        self.name_locks.insert(user_id.to_string(), name.to_string())
    }

    pub fn images(&self, name: &str) -> &[String] {
        self.collections.get(name).map_or(&[], Vec::as_slice)
    }
}
