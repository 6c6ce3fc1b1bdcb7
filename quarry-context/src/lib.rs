pub mod splitter;

// Re-export the chunking types for external use
pub use splitter::{Chunk, ChunkSplitter, DocumentRecord, Provenance, SplitError};
