//! `opinions` namespace

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starbot_store::Document;

/// Free-text opinions keyed by lower-cased name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opinions(pub BTreeMap<String, String>);

impl Document for Opinions {
    const NAME: &'static str = "opinions";
}
