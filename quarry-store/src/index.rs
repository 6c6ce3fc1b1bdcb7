//! Index construction and durable persistence.
//!
//! An [`IndexStore`] is an ordered sequence of embedded chunks. A record's
//! position 0..n-1 is its identity (there is no separate persisted ID), so
//! everything downstream depends on the order being preserved exactly
//! through persist and load.
//!
//! The on-disk form is a pretty-printed JSON array of records, each with a
//! `vector`, a `description` (the chunk text) and a `provenance` object.
//! Persistence writes to a temp file in the destination directory and
//! renames it into place, so callers either see the previous store or the
//! complete new one, never a partial write.

use crate::error::{Result, StoreError};
use quarry_context::Provenance;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// One embedded chunk: the vector, the chunk text it represents, and where
/// the text came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub vector: Vec<f32>,
    pub description: String,
    pub provenance: Provenance,
}

/// Builds an [`IndexStore`] from a batch of embedded chunks.
pub struct IndexBuilder;

impl IndexBuilder {
    /// Fix the embedding dimension from the first record and take ownership
    /// of the batch.
    ///
    /// The dimension is derived once and never re-validated against later
    /// records; an empty batch fails with [`StoreError::EmptyCorpus`].
    pub fn build(embedded: Vec<EmbeddedChunk>) -> Result<IndexStore> {
        if embedded.is_empty() {
            return Err(StoreError::EmptyCorpus);
        }
        let dimension = embedded[0].vector.len();
        tracing::debug!(
            records = embedded.len(),
            dimension,
            "built in-memory index store"
        );
        Ok(IndexStore {
            records: embedded,
            dimension,
        })
    }
}

/// An ordered, positionally-identified set of embedded chunks ready to
/// persist.
#[derive(Debug, Clone)]
pub struct IndexStore {
    records: Vec<EmbeddedChunk>,
    dimension: usize,
}

impl IndexStore {
    /// Embedding dimension fixed at build time from the first record.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EmbeddedChunk] {
        &self.records
    }

    /// Write the full record list to `path`, atomically.
    ///
    /// Serializes to a temp file in the same directory and renames it over
    /// the destination, so a failure part-way through never leaves a
    /// truncated store visible.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_vec_pretty(&self.records).map_err(std::io::Error::from)?;

        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(&json)?;
        staged
            .persist(path)
            .map_err(|e| StoreError::Io { source: e.error })?;

        tracing::info!(
            records = self.records.len(),
            dimension = self.dimension,
            path = %path.display(),
            "persisted vector store"
        );
        Ok(())
    }
}
