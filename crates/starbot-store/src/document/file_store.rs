//! File-backed document store
//!
//! One JSON file per namespace under the store root:
//! `<root>/<namespace>.json`. Writes go to a sibling temporary file that is
//! renamed over the target, so a reader never observes a half-written
//! document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};

/// Root directory of all namespace documents of one guild
pub struct DocumentStore {
    root: PathBuf,
    // Serializes the tmp-write + rename pair across namespaces sharing the root
    write_lock: Mutex<()>,
    writes: AtomicU64,
}

impl DocumentStore {
    /// Open (and create if needed) a store rooted at `root`
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Arc<Self>> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io("<root>", e))?;

        tracing::info!(root = %root.display(), "Document store opened");

        Ok(Arc::new(Self {
            root,
            write_lock: Mutex::new(()),
            writes: AtomicU64::new(0),
        }))
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing a namespace
    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.root.join(format!("{namespace}.json"))
    }

    /// Number of documents written since the store was opened
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Load a namespace document
    ///
    /// A missing file yields an empty mapping.
    pub async fn load_raw(&self, namespace: &str) -> StoreResult<Map<String, Value>> {
        let path = self.path_for(namespace);

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(namespace, "No document on disk, starting empty");
                return Ok(Map::new());
            }
            Err(e) => return Err(StoreError::io(namespace, e)),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::NotAnObject(namespace.to_string())),
            Err(e) => Err(StoreError::serialization(namespace, e)),
        }
    }

    /// Replace a namespace document with `doc`
    pub async fn save_raw(&self, namespace: &str, doc: &Map<String, Value>) -> StoreResult<()> {
        self.save(namespace, doc).await
    }

    /// Serialize `doc` and replace the namespace document with it
    pub async fn save<T>(&self, namespace: &str, doc: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes =
            serde_json::to_vec(doc).map_err(|e| StoreError::serialization(namespace, e))?;

        let path = self.path_for(namespace);
        let tmp = self.root.join(format!("{namespace}.json.tmp"));

        let _guard = self.write_lock.lock().await;

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::io(namespace, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(namespace, e))?;

        self.writes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(namespace, bytes = bytes.len(), "Document written");

        Ok(())
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("root", &self.root)
            .field("writes", &self.write_count())
            .finish()
    }
}
