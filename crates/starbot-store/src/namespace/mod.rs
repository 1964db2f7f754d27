//! Typed namespaces over the document store

mod handle;
mod reconcile;

pub use handle::{Document, Namespace, Transaction};
pub use reconcile::reconcile;
