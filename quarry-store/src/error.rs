//! Error types for the index and retrieval path

use std::path::PathBuf;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// All failure kinds surfaced to callers of the retrieval pipeline.
///
/// Nothing here is retried internally and no failure falls back to a silent
/// default; the only documented reconciliation is the query-vector
/// dimension shim in the vector store module, which warns rather than
/// erroring.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Bad chunk parameters (overlap >= size, zero size).
    #[error(transparent)]
    InvalidConfiguration(#[from] quarry_context::SplitError),

    /// The corpus produced no embeddable chunks.
    #[error("no embeddable chunks in the corpus")]
    EmptyCorpus,

    /// The persisted store does not exist; the index was never built.
    #[error("vector store not found at {path}")]
    StoreNotFound { path: PathBuf },

    /// The persisted store exists but holds zero records.
    #[error("vector store at {path} contains no records")]
    StoreEmpty { path: PathBuf },

    /// The persisted store exists but its serialized form does not parse.
    #[error("vector store at {path} is corrupt")]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A document was read but its text could not be extracted.
    #[error("failed to extract text from {path}: {message}")]
    DocumentParse { path: PathBuf, message: String },

    /// Opaque passthrough from the embedding provider.
    #[error(transparent)]
    Embedding(#[from] quarry_embed::EmbedError),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
