//! The caller-facing pipeline boundary: build an index, retrieve context.
//!
//! Both operations work against an explicit [`PipelineConfig`] handle: the
//! store path is configuration the caller owns, and there is no ambient
//! "is the store set up" flag to get out of sync between calls. A
//! `retrieve` before any successful `build_index` simply fails with
//! [`StoreError::StoreNotFound`].
//!
//! ```text
//! files → loader → splitter → embedder → index builder → persisted store
//!                                                             ↓
//!                 assembled context ← assembler ← query ← vector store
//! ```
//!
//! Loading and embedding are async and cancellable at their suspension
//! points; once index construction starts it runs to completion or fails
//! without leaving a partial store behind.

use crate::assembler::{RetrievedContext, assemble};
use crate::error::{Result, StoreError};
use crate::index::{EmbeddedChunk, IndexBuilder};
use crate::loader::load_documents;
use crate::vector_store::{VectorStore, reconcile_dimension};
use quarry_context::ChunkSplitter;
use quarry_embed::{EmbedError, EmbeddingProvider};
use std::path::PathBuf;
use tracing::info;

/// Configuration handle for the build and retrieve operations.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Where the persisted store lives.
    pub store_path: PathBuf,
    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("vectors.json"),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl PipelineConfig {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Self::default()
        }
    }

    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        Self { chunk_size, ..self }
    }

    pub fn with_chunk_overlap(self, chunk_overlap: usize) -> Self {
        Self {
            chunk_overlap,
            ..self
        }
    }
}

/// Build and persist a similarity index over the given files.
///
/// Loads every supported file, splits into overlapping chunks, embeds the
/// batch through `provider`, and persists the resulting store atomically at
/// the configured path. Returns the number of records written. An empty file
/// list, or one that yields no embeddable chunks, fails with
/// [`StoreError::EmptyCorpus`].
pub async fn build_index(
    paths: &[PathBuf],
    provider: &dyn EmbeddingProvider,
    config: &PipelineConfig,
) -> Result<usize> {
    let documents = load_documents(paths).await?;
    let splitter = ChunkSplitter::new(config.chunk_size, config.chunk_overlap)?;
    let chunks = splitter.split(&documents);
    if chunks.is_empty() {
        return Err(StoreError::EmptyCorpus);
    }

    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        provider = provider.provider_name(),
        "embedding corpus"
    );

    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
    let vectors = provider.embed_batch(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(StoreError::Embedding(EmbedError::malformed_response(
            format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            ),
        )));
    }

    let embedded: Vec<EmbeddedChunk> = vectors
        .into_iter()
        .zip(chunks)
        .map(|(vector, chunk)| EmbeddedChunk {
            vector,
            description: chunk.text,
            provenance: chunk.provenance,
        })
        .collect();

    let store = IndexBuilder::build(embedded)?;
    store.persist(&config.store_path)?;
    Ok(store.len())
}

/// Retrieve the top-k chunks for a query and assemble them into context.
///
/// Loads the persisted store, embeds the query, reconciles the query
/// vector against the stored dimension (truncate or zero-pad, with a
/// warning when it actually resizes), ranks by distance and assembles the
/// hits. The result is what a conversational responder consumes; this crate
/// hands it over unmodified.
pub async fn retrieve(
    query: &str,
    k: usize,
    provider: &dyn EmbeddingProvider,
    config: &PipelineConfig,
) -> Result<RetrievedContext> {
    let store = VectorStore::load(&config.store_path)?;

    let query_vector = provider.embed_query(query).await?;
    let query_vector = reconcile_dimension(query_vector, store.dimension());

    let hits = store.query(&query_vector, k)?;
    info!(
        hits = hits.len(),
        k,
        store = %config.store_path.display(),
        "retrieved context"
    );
    Ok(assemble(&hits))
}
