//! # starbot-store
//!
//! Persisted key-value store. Each logical dataset is a *namespace*: one
//! JSON document on disk, loaded once at startup and rewritten wholesale on
//! every mutation.
//!
//! ## Features
//!
//! - **Document store**: raw load/save of namespace documents, write-then-rename
//! - **Typed namespaces**: each namespace declares a default shape; schema drift
//!   is healed on load and eagerly re-saved
//! - **Transactions**: scoped load-mutate-save units that hold the namespace
//!   lock across suspension points
//!
//! ## Example
//!
//! ```ignore
//! use starbot_store::{Document, DocumentStore, Namespace};
//!
//! let store = DocumentStore::open("./local/1234").await?;
//! let opinions = Namespace::<Opinions>::load(store.clone()).await?;
//!
//! let mut tx = opinions.begin().await;
//! tx.entries.insert("rust".into(), "pretty good".into());
//! tx.commit().await?;
//! ```

pub mod document;
pub mod error;
pub mod namespace;

pub use document::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use namespace::{reconcile, Document, Namespace, Transaction};
