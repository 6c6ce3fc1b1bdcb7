//! Embedding provider trait and HTTP implementation

use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for services that map text to fixed-length float vectors.
///
/// The retrieval pipeline depends only on the output shape of these calls;
/// which model produces the vectors, and any retry or timeout policy, is the
/// provider's concern. Implementations must not be partially usable: either a
/// call yields vectors for every input or it fails.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name/identifier of this provider, for logs.
    fn provider_name(&self) -> &str;
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

/// Reorder response rows by their stated index and check the count.
///
/// OpenAI-compatible servers are allowed to return rows out of order; the
/// index field is authoritative.
fn collect_rows(rows: Vec<EmbeddingRow>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if rows.len() != expected {
        return Err(EmbedError::malformed_response(format!(
            "expected {expected} embeddings, got {}",
            rows.len()
        )));
    }
    let mut ordered: Vec<Option<Vec<f32>>> = vec![None; expected];
    for row in rows {
        let slot = ordered.get_mut(row.index).ok_or_else(|| {
            EmbedError::malformed_response(format!("embedding index {} out of range", row.index))
        })?;
        if slot.replace(row.embedding).is_some() {
            return Err(EmbedError::malformed_response(format!(
                "duplicate embedding index {}",
                row.index
            )));
        }
    }
    ordered
        .into_iter()
        .map(|slot| slot.ok_or_else(|| EmbedError::malformed_response("missing embedding row")))
        .collect()
}

/// Embedding provider backed by an OpenAI-compatible HTTP endpoint.
///
/// Sends `{model, input}` to `{base_url}/embeddings` with bearer auth. Large
/// batches are split according to [`EmbedConfig::batch_size`]. Requests are
/// never retried here; transient failures surface as
/// [`EmbedError::Provider`].
#[derive(Debug, Clone)]
pub struct HttpEmbedProvider {
    config: EmbedConfig,
    client: reqwest::Client,
}

impl HttpEmbedProvider {
    pub fn new(config: EmbedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    async fn request_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tracing::debug!(count = texts.len(), "requesting embeddings");

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingsRequest {
                model: &self.config.model,
                input: texts,
            })
            .send()
            .await
            .map_err(EmbedError::provider)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::malformed_response(format!(
                "embedding endpoint returned {status}: {body}"
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(EmbedError::provider)?;
        collect_rows(parsed.data, texts.len())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedProvider {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let texts = vec![text.to_string()];
        let mut vectors = self.request_batch(&texts).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbedError::malformed_response("no embedding generated for query"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.batch_size) {
            let vectors = self.request_batch(batch).await?;
            all_vectors.extend(vectors);
        }

        tracing::debug!(count = all_vectors.len(), "generated embeddings");
        Ok(all_vectors)
    }

    fn provider_name(&self) -> &str {
        "openai-http"
    }
}
