//! Error types for the embedding boundary

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Errors surfaced by embedding providers.
///
/// Provider failures are opaque to the rest of the pipeline: the core
/// propagates them without retrying, since retry policy belongs to the
/// provider (or whoever configured it), not to the retrieval path.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The provider configuration is unusable before any request is made.
    #[error("invalid embedder configuration: {message}")]
    InvalidConfig { message: String },

    /// The provider request itself failed (network, auth, server error).
    #[error("embedding provider error: {source}")]
    Provider {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The provider answered, but the payload was not usable.
    #[error("unusable embedding response: {message}")]
    MalformedResponse { message: String },
}

impl EmbedError {
    /// Wrap any provider-side error into the opaque passthrough variant.
    pub fn provider<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider {
            source: Box::new(source),
        }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn malformed_response<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}
