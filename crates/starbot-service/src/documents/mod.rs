//! Namespace documents
//!
//! One type per persisted namespace. Each type's `Default` is its declared
//! default shape, used by the store to heal drifted documents on load.

mod images;
mod opinions;
mod points;
mod reflections;
mod settings;

pub use images::QuickImages;
pub use opinions::Opinions;
pub use points::{PointsLedger, ScoreRecord};
pub use reflections::ReflectionMap;
pub use settings::{PointsTrackerSettings, Settings, StarboardSettings};
