//! Raw namespace documents on disk

mod file_store;

pub use file_store::DocumentStore;
