//! Store error types

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on namespace \"{namespace}\": {source}")]
    Io {
        namespace: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error on namespace \"{namespace}\": {source}")]
    Serialization {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Namespace \"{0}\" is not a JSON object")]
    NotAnObject(String),
}

impl StoreError {
    pub(crate) fn io(namespace: &str, source: std::io::Error) -> Self {
        Self::Io {
            namespace: namespace.to_string(),
            source,
        }
    }

    pub(crate) fn serialization(namespace: &str, source: serde_json::Error) -> Self {
        Self::Serialization {
            namespace: namespace.to_string(),
            source,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
