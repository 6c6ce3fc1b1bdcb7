//! Configuration for embedding providers

use crate::error::{EmbedError, Result};

/// Default endpoint base for OpenAI-compatible embedding APIs.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default embedding model name.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Configuration for an HTTP embedding provider.
///
/// Targets any OpenAI-compatible `/embeddings` endpoint. The base URL and
/// model are caller configuration, never hard-coded identity of the data the
/// embeddings end up in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmbedConfig {
    /// Base URL of the embeddings API, without the `/embeddings` suffix.
    pub base_url: String,
    /// Bearer token for the API.
    pub api_key: String,
    /// Model name sent with every request.
    pub model: String,
    /// Maximum number of texts per embedding request.
    pub batch_size: usize,
}

impl EmbedConfig {
    /// Create a configuration with the default endpoint, model and batch size.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            batch_size: 32,
        }
    }

    /// Set the endpoint base URL (builder style).
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Set the model name (builder style).
    pub fn with_model(self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self
        }
    }

    /// Set the request batch size (builder style).
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    /// Full URL of the embeddings endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    /// Validate that the configuration can make requests at all.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(EmbedError::invalid_config("api key is empty"));
        }
        if self.model.is_empty() {
            return Err(EmbedError::invalid_config("model name is empty"));
        }
        if self.batch_size == 0 {
            return Err(EmbedError::invalid_config("batch size must be positive"));
        }
        Ok(())
    }
}
