//! Namespace handle and transactions
//!
//! A `Namespace<T>` owns the committed in-memory copy of one document. All
//! mutations go through a `Transaction`, which holds the namespace lock from
//! `begin()` until it is committed or dropped. A transaction may await other
//! work (platform calls) while holding the lock; a second transaction on the
//! same namespace waits until the first one finishes.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use super::reconcile::reconcile;
use crate::document::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// A typed namespace document
///
/// `Default` is the namespace's default shape: it is written for a missing
/// file and used to heal keys that are missing or of the wrong JSON kind.
pub trait Document: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    /// Namespace name, also the file stem on disk
    const NAME: &'static str;
}

/// Loaded namespace with serialized read-modify-write access
pub struct Namespace<T: Document> {
    store: Arc<DocumentStore>,
    committed: Mutex<T>,
}

impl<T: Document> Namespace<T> {
    /// Load the namespace, healing it against the default shape
    ///
    /// If any value had to be healed, the healed document is saved once
    /// before this returns.
    pub async fn load(store: Arc<DocumentStore>) -> StoreResult<Self> {
        let mut raw = store.load_raw(T::NAME).await?;

        let defaults = serde_json::to_value(T::default())
            .map_err(|e| StoreError::serialization(T::NAME, e))?;

        if let Value::Object(defaults) = defaults {
            let healed = reconcile(&mut raw, &defaults);
            if !healed.is_empty() {
                for key in &healed {
                    tracing::info!(namespace = T::NAME, key = %key, "Resetting key to default value");
                }
                store.save_raw(T::NAME, &raw).await?;
            }
        }

        let document: T = serde_json::from_value(Value::Object(raw))
            .map_err(|e| StoreError::serialization(T::NAME, e))?;

        tracing::debug!(namespace = T::NAME, "Namespace loaded");

        Ok(Self {
            store,
            committed: Mutex::new(document),
        })
    }

    /// Namespace name
    pub fn name(&self) -> &'static str {
        T::NAME
    }

    /// Copy of the committed document
    ///
    /// Waits for any open transaction, so a snapshot never shows
    /// uncommitted changes.
    pub async fn snapshot(&self) -> T {
        self.committed.lock().await.clone()
    }

    /// Open a transaction on this namespace
    pub async fn begin(&self) -> Transaction<'_, T> {
        let guard = self.committed.lock().await;
        let draft = guard.clone();
        Transaction {
            store: &self.store,
            guard,
            draft,
        }
    }

    /// Apply `f` to the document and commit the result
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> StoreResult<R> {
        let mut tx = self.begin().await;
        let out = f(&mut tx);
        tx.commit().await?;
        Ok(out)
    }
}

impl<T: Document> std::fmt::Debug for Namespace<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace").field("name", &T::NAME).finish()
    }
}

/// Exclusive, scoped mutation of a namespace
///
/// Dereferences to the working copy. `commit()` persists it and makes it
/// visible; dropping the transaction without committing discards it.
pub struct Transaction<'a, T: Document> {
    store: &'a DocumentStore,
    guard: MutexGuard<'a, T>,
    draft: T,
}

impl<T: Document> Transaction<'_, T> {
    /// Persist the working copy and publish it
    ///
    /// On a write failure the committed document is left unchanged.
    pub async fn commit(self) -> StoreResult<()> {
        let Transaction {
            store,
            mut guard,
            draft,
        } = self;

        store.save(T::NAME, &draft).await?;
        *guard = draft;
        Ok(())
    }

    /// Document as it was when the transaction began
    pub fn committed(&self) -> &T {
        &self.guard
    }
}

impl<T: Document> Deref for Transaction<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.draft
    }
}

impl<T: Document> DerefMut for Transaction<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.draft
    }
}
