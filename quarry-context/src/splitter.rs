//! Fixed-window document chunking for a RAG (Retrieval Augmented Generation)
//! pipeline.
//!
//! The splitter turns whole documents into overlapping, bounded-length chunks
//! that can be embedded independently and later retrieved by similarity. Each
//! chunk carries the provenance of the document it came from, so retrieval
//! results can always be traced back to a source file.
//!
//! The module defines:
//! - [`Provenance`]: free-form key/value metadata identifying a source document.
//! - [`DocumentRecord`]: a loaded document plus its provenance.
//! - [`Chunk`]: one window of a document's text plus the inherited provenance.
//! - [`ChunkSplitter`]: the sliding-window splitter itself.
//!
//! Splitting is a pure function of `(text, chunk_size, chunk_overlap)`: the
//! same input always produces the same ordered chunk sequence. Windows are
//! measured in characters, not bytes, so multi-byte UTF-8 input never splits
//! mid-codepoint. Boundaries are not word-aware and no overlap trimming is
//! performed.
//!
//! # Usage
//!
//! ```
//! use quarry_context::{ChunkSplitter, DocumentRecord, Provenance};
//!
//! let splitter = ChunkSplitter::new(10, 3).unwrap();
//! let documents = vec![DocumentRecord::new(
//!     "the quick brown fox jumps over the lazy dog",
//!     Provenance::new("fox.txt"),
//! )];
//!
//! let chunks = splitter.split(&documents);
//! assert!(!chunks.is_empty());
//! assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
//! assert!(chunks.iter().all(|c| c.provenance.filename == "fox.txt"));
//! ```
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata identifying the originating document of a chunk.
///
/// Minimally a filename, plus an optional free-form key/value map. Fields are
/// kept in a `BTreeMap` so two provenance values with the same entries always
/// compare and serialize identically, regardless of insertion order. That
/// canonical structural equality is what retrieval-side de-duplication relies
/// on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// Name of the source file (basename, not the full path).
    pub filename: String,
    /// Additional provenance entries, flattened into the serialized object.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Provenance {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra provenance entry (builder style).
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A loaded document: its full text and where it came from.
///
/// Created once per input file by the document loader and immutable after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub text: String,
    pub provenance: Provenance,
}

impl DocumentRecord {
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }
}

/// One bounded-length window of a document's text.
///
/// Inherits the provenance of the document it was cut from. Chunks are
/// consumed once by the embedder and not persisted in this form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub provenance: Provenance,
}

/// Errors from splitter construction.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// The chunk parameters would produce a zero or negative window advance.
    #[error("invalid chunk configuration: size {chunk_size}, overlap {chunk_overlap}")]
    InvalidConfiguration {
        chunk_size: usize,
        chunk_overlap: usize,
    },
}

/// Sliding-window splitter with fixed chunk size and overlap.
///
/// For each document the window starts at offset 0 and advances by
/// `chunk_size - chunk_overlap` characters per step, emitting the substring
/// `[offset, offset + chunk_size)` clipped at the end of the text. A document
/// shorter than `chunk_size` yields exactly one chunk equal to the whole
/// text.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChunkSplitter {
    /// Create a splitter, rejecting parameters that cannot advance.
    ///
    /// `chunk_overlap >= chunk_size` would make the window stride zero or
    /// negative, so it fails with [`SplitError::InvalidConfiguration`], as
    /// does `chunk_size == 0`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, SplitError> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(SplitError::InvalidConfiguration {
                chunk_size,
                chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split every document into overlapping chunks, in document order.
    ///
    /// Chunks inherit the provenance of their source document. Empty
    /// documents yield no chunks. The window stops once it has reached the
    /// end of the text, so the final chunk may be shorter than `chunk_size`
    /// but the union of all windows covers the whole document with no gaps.
    pub fn split(&self, documents: &[DocumentRecord]) -> Vec<Chunk> {
        let stride = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();

        for document in documents {
            // Byte offset of every character, so windows slice on char
            // boundaries.
            let boundaries: Vec<usize> = document.text.char_indices().map(|(i, _)| i).collect();
            let total = boundaries.len();

            let mut start = 0;
            while start < total {
                let end = start + self.chunk_size;
                let byte_start = boundaries[start];
                let byte_end = if end >= total {
                    document.text.len()
                } else {
                    boundaries[end]
                };
                chunks.push(Chunk {
                    text: document.text[byte_start..byte_end].to_string(),
                    provenance: document.provenance.clone(),
                });
                if end >= total {
                    break;
                }
                start += stride;
            }
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<DocumentRecord> {
        vec![DocumentRecord::new(text, Provenance::new("doc.txt"))]
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(matches!(
            ChunkSplitter::new(100, 100),
            Err(SplitError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            ChunkSplitter::new(100, 250),
            Err(SplitError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            ChunkSplitter::new(0, 0),
            Err(SplitError::InvalidConfiguration { .. })
        ));
        assert!(ChunkSplitter::new(100, 99).is_ok());
    }

    #[test]
    fn test_short_document_yields_single_whole_chunk() {
        let splitter = ChunkSplitter::new(1000, 200).unwrap();
        let chunks = splitter.split(&doc("a short document"));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a short document");
        assert_eq!(chunks[0].provenance.filename, "doc.txt");
    }

    #[test]
    fn test_windows_cover_text_with_no_gaps() {
        let text: String = (0..137).map(|i| ((b'a' + (i % 26) as u8) as char)).collect();
        let (size, overlap) = (40, 15);
        let splitter = ChunkSplitter::new(size, overlap).unwrap();
        let chunks = splitter.split(&doc(&text));

        assert!(chunks.len() > 1);
        // Each window starts `size - overlap` after the previous one, so
        // consecutive chunks overlap and the union covers [0, len).
        let stride = size - overlap;
        let mut covered_to = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * stride;
            assert!(start <= covered_to, "gap before chunk {i}");
            assert_eq!(&text[start..start + chunk.text.len()], chunk.text);
            covered_to = start + chunk.text.len();
        }
        assert_eq!(covered_to, text.len());
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let text: String = (0..50).map(|_| "some repeated sentence. ").collect();
        let splitter = ChunkSplitter::new(100, 20).unwrap();

        let first = splitter.split(&doc(&text));
        let second = splitter.split(&doc(&text));
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_input_splits_on_char_boundaries() {
        let text: String = "héllo wörld ünïcode ".repeat(20);
        let splitter = ChunkSplitter::new(16, 4).unwrap();
        let chunks = splitter.split(&doc(&text));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 16);
        }
        // The clipped final window still ends exactly at the end of the text.
        assert!(text.ends_with(chunks.last().unwrap().text.as_str()));
    }

    #[test]
    fn test_empty_document_yields_no_chunks() {
        let splitter = ChunkSplitter::new(100, 20).unwrap();
        assert!(splitter.split(&doc("")).is_empty());
    }

    #[test]
    fn test_multiple_documents_keep_order_and_provenance() {
        let splitter = ChunkSplitter::new(1000, 200).unwrap();
        let documents = vec![
            DocumentRecord::new("first document", Provenance::new("a.txt")),
            DocumentRecord::new("second document", Provenance::new("b.txt")),
        ];

        let chunks = splitter.split(&documents);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].provenance.filename, "a.txt");
        assert_eq!(chunks[1].provenance.filename, "b.txt");
    }

    #[test]
    fn test_provenance_structural_equality_ignores_insertion_order() {
        let a = Provenance::new("a.txt")
            .with_entry("section", "intro")
            .with_entry("author", "me");
        let b = Provenance::new("a.txt")
            .with_entry("author", "me")
            .with_entry("section", "intro");
        assert_eq!(a, b);
    }
}
