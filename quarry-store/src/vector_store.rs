//! Loading a persisted index and answering nearest-neighbor queries.
//!
//! The store is flat and exhaustive: every query computes the squared
//! Euclidean distance to every stored vector. No tree, no quantization:
//! correctness over asymptotic speed, which is the right trade at the
//! hundreds-to-low-thousands of chunks a support corpus actually has. If the
//! corpus outgrows that, an approximate index can replace [`FlatIndex`]
//! behind the same `query(vector, k)` contract without touching callers.
//!
//! A loaded [`VectorStore`] is immutable, so concurrent queries need no
//! synchronization. Load either fully succeeds or yields no instance at all.

use crate::error::{Result, StoreError};
use crate::index::EmbeddedChunk;
use quarry_context::Provenance;
use std::path::Path;

/// One ranked retrieval result. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchHit {
    /// The stored chunk text.
    pub content: String,
    /// Provenance of the source document.
    pub provenance: Provenance,
    /// 0-based rank position within this query's results.
    pub rank: usize,
}

/// Exhaustive squared-L2 scan structure over the stored vectors.
///
/// Position i here corresponds exactly to position i in the store's record
/// list. That alignment is the load-bearing invariant of the whole retrieval
/// path: vectors are only ever appended in record order.
#[derive(Debug, Clone)]
struct FlatIndex {
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    fn new() -> Self {
        Self {
            vectors: Vec::new(),
        }
    }

    fn add(&mut self, vector: Vec<f32>) {
        self.vectors.push(vector);
    }

    /// Positions of the k nearest vectors, ascending by distance, ties
    /// broken by ascending position.
    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut ranked: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, stored)| (position, squared_l2(query, stored)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

/// A persisted index loaded into memory and ready to query.
pub struct VectorStore {
    records: Vec<EmbeddedChunk>,
    index: FlatIndex,
    dimension: usize,
}

impl VectorStore {
    /// Load the store at `path` and build the flat index over it.
    ///
    /// Fails with [`StoreError::StoreNotFound`] if the file is absent,
    /// [`StoreError::StoreEmpty`] if it exists but holds zero records (an
    /// empty or `[]` file means the index was built empty, which is treated
    /// as "not set up"), and [`StoreError::StoreCorrupt`] if the JSON does
    /// not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::StoreNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Err(StoreError::StoreEmpty {
                path: path.to_path_buf(),
            });
        }

        let records: Vec<EmbeddedChunk> =
            serde_json::from_str(&raw).map_err(|source| StoreError::StoreCorrupt {
                path: path.to_path_buf(),
                source,
            })?;

        if records.is_empty() {
            return Err(StoreError::StoreEmpty {
                path: path.to_path_buf(),
            });
        }

        // Dimension is authoritative from the first record; later records
        // are assumed to match (invariant assumed, not enforced).
        let dimension = records[0].vector.len();
        let mut index = FlatIndex::new();
        for record in &records {
            index.add(record.vector.clone());
        }

        tracing::debug!(
            records = records.len(),
            dimension,
            path = %path.display(),
            "loaded vector store"
        );
        Ok(Self {
            records,
            index,
            dimension,
        })
    }

    /// Embedding dimension of the stored vectors, for caller-side query
    /// reconciliation.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top-k nearest stored records to `vector`, closest first.
    ///
    /// Returns at most `k` hits; if `k` exceeds the corpus size every record
    /// comes back ranked. `k == 0` fails with
    /// [`StoreError::InvalidArgument`]. Ordering is fully deterministic:
    /// ascending distance, ties broken by stored position.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Err(StoreError::InvalidArgument(
                "k must be positive".to_string(),
            ));
        }

        let hits = self
            .index
            .search(vector, k)
            .into_iter()
            .enumerate()
            .map(|(rank, (position, _distance))| {
                let record = &self.records[position];
                SearchHit {
                    content: record.description.clone(),
                    provenance: record.provenance.clone(),
                    rank,
                }
            })
            .collect();
        Ok(hits)
    }
}

/// Resize a query vector to the store's dimension.
///
/// Longer vectors are truncated, shorter ones right-padded with zeros. This
/// is the documented best-effort shim for embedding models that changed
/// width between index build and query time; it silently degrades ranking
/// quality when dimensions diverge, so any actual resize is logged.
pub fn reconcile_dimension(mut vector: Vec<f32>, dimension: usize) -> Vec<f32> {
    use std::cmp::Ordering;
    match vector.len().cmp(&dimension) {
        Ordering::Greater => {
            tracing::warn!(
                got = vector.len(),
                expected = dimension,
                "truncating query vector to stored dimension"
            );
            vector.truncate(dimension);
        }
        Ordering::Less => {
            tracing::warn!(
                got = vector.len(),
                expected = dimension,
                "zero-padding query vector to stored dimension"
            );
            vector.resize(dimension, 0.0);
        }
        Ordering::Equal => {}
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use std::path::PathBuf;

    fn record(vector: Vec<f32>, description: &str, filename: &str) -> EmbeddedChunk {
        EmbeddedChunk {
            vector,
            description: description.to_string(),
            provenance: Provenance::new(filename),
        }
    }

    fn store_with(records: Vec<EmbeddedChunk>) -> Result<(tempfile::TempDir, VectorStore)> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vectors.json");
        IndexBuilder::build(records)?.persist(&path)?;
        let store = VectorStore::load(&path)?;
        Ok((dir, store))
    }

    #[test]
    fn test_load_missing_store() {
        let result = VectorStore::load(&PathBuf::from("/nope/vectors.json"));
        assert!(matches!(result, Err(StoreError::StoreNotFound { .. })));
    }

    #[test]
    fn test_load_empty_records_store() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vectors.json");
        std::fs::write(&path, "[]")?;
        assert!(matches!(
            VectorStore::load(&path),
            Err(StoreError::StoreEmpty { .. })
        ));

        // A zero-byte file also counts as never having been set up.
        std::fs::write(&path, "")?;
        assert!(matches!(
            VectorStore::load(&path),
            Err(StoreError::StoreEmpty { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load_corrupt_store() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("vectors.json");
        std::fs::write(&path, "{ this is not json []")?;
        assert!(matches!(
            VectorStore::load(&path),
            Err(StoreError::StoreCorrupt { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_round_trip_preserves_records_and_order() -> Result<()> {
        let records = vec![
            record(vec![0.0, 0.0], "origin", "a.txt"),
            record(vec![10.0, 10.0], "far corner", "b.txt"),
            record(vec![5.0, 5.0], "middle", "c.txt"),
        ];
        let (_dir, store) = store_with(records.clone())?;

        assert_eq!(store.len(), 3);
        assert_eq!(store.dimension(), 2);
        let all = store.query(&[0.0, 0.0], 3)?;
        // Ranked by distance from origin: a, c, b. Contents survive the
        // round trip byte-for-byte.
        assert_eq!(all[0].content, "origin");
        assert_eq!(all[1].content, "middle");
        assert_eq!(all[2].content, "far corner");
        Ok(())
    }

    #[test]
    fn test_query_nearest_of_two() -> Result<()> {
        let (_dir, store) = store_with(vec![
            record(vec![0.0, 0.0], "near", "near.txt"),
            record(vec![10.0, 10.0], "far", "far.txt"),
        ])?;

        // distance([1,1],[0,0]) = 2, distance([1,1],[10,10]) = 162
        let hits = store.query(&[1.0, 1.0], 1)?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "near");
        assert_eq!(hits[0].rank, 0);
        Ok(())
    }

    #[test]
    fn test_query_distances_non_decreasing_and_capped_at_k() -> Result<()> {
        let records: Vec<EmbeddedChunk> = (0..8)
            .map(|i| record(vec![i as f32, 0.0], &format!("chunk {i}"), "doc.txt"))
            .collect();
        let (_dir, store) = store_with(records)?;

        let hits = store.query(&[3.2, 0.0], 4)?;
        assert_eq!(hits.len(), 4);
        // Nearest to 3.2 on the line: 3, 4, 2, 5.
        let contents: Vec<&str> = hits.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, vec!["chunk 3", "chunk 4", "chunk 2", "chunk 5"]);
        assert_eq!(
            hits.iter().map(|h| h.rank).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        Ok(())
    }

    #[test]
    fn test_query_k_larger_than_corpus_returns_all() -> Result<()> {
        let (_dir, store) = store_with(vec![
            record(vec![0.0], "a", "a.txt"),
            record(vec![1.0], "b", "b.txt"),
        ])?;
        let hits = store.query(&[0.0], 50)?;
        assert_eq!(hits.len(), 2);
        Ok(())
    }

    #[test]
    fn test_query_zero_k_is_invalid() -> Result<()> {
        let (_dir, store) = store_with(vec![record(vec![0.0], "a", "a.txt")])?;
        assert!(matches!(
            store.query(&[0.0], 0),
            Err(StoreError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn test_query_ties_break_by_stored_position() -> Result<()> {
        let (_dir, store) = store_with(vec![
            record(vec![1.0, 0.0], "east", "a.txt"),
            record(vec![-1.0, 0.0], "west", "a.txt"),
            record(vec![0.0, 1.0], "north", "a.txt"),
        ])?;

        // All three are equidistant from the origin.
        let hits = store.query(&[0.0, 0.0], 3)?;
        let contents: Vec<&str> = hits.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, vec!["east", "west", "north"]);
        Ok(())
    }

    #[test]
    fn test_reconcile_truncates_longer_vectors() {
        let reconciled = reconcile_dimension(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 4);
        assert_eq!(reconciled, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_reconcile_zero_pads_shorter_vectors() {
        let reconciled = reconcile_dimension(vec![1.0, 2.0], 4);
        assert_eq!(reconciled, vec![1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reconcile_leaves_matching_vectors_alone() {
        let reconciled = reconcile_dimension(vec![1.0, 2.0, 3.0], 3);
        assert_eq!(reconciled, vec![1.0, 2.0, 3.0]);
    }
}
