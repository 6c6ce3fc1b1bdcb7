//! quarry-store: vector store and retrieval pipeline
//!
//! This crate is the core of the quarry RAG system: it builds a flat
//! nearest-neighbor index from embedded document chunks, persists it as an
//! ordered JSON record set, loads it back on demand, reconciles query-vector
//! dimensionality against the stored dimension, and assembles ranked hits
//! into a single context string with de-duplicated provenance.
//!
//! ## Key Modules
//!
//! - **[`loader`]**: reads `.txt` and `.docx` files into tagged text records
//! - **[`index`]**: builds and atomically persists the ordered record set
//! - **[`vector_store`]**: loads the store and answers top-k queries
//! - **[`assembler`]**: merges ranked hits into prompt-ready context
//! - **[`pipeline`]**: the `build_index` / `retrieve` caller boundary
//! - **[`error`]**: typed failures for every operation
//!
//! Chunking lives in `quarry-context`; the embedder boundary lives in
//! `quarry-embed`. Calling a chat model over the assembled context is
//! deliberately outside this workspace.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quarry_embed::{EmbedConfig, HttpEmbedProvider};
//! use quarry_store::pipeline::{self, PipelineConfig};
//! use std::path::PathBuf;
//!
//! # async fn example() -> quarry_store::error::Result<()> {
//! let provider = HttpEmbedProvider::new(EmbedConfig::new("sk-..."))?;
//! let config = PipelineConfig::new("vectors.json");
//!
//! pipeline::build_index(&[PathBuf::from("faq.txt")], &provider, &config).await?;
//! let retrieved = pipeline::retrieve("how do refunds work?", 3, &provider, &config).await?;
//! println!("{}", retrieved.context);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod error;
pub mod index;
pub mod loader;
pub mod pipeline;
pub mod vector_store;

pub use assembler::{RetrievedContext, assemble};
pub use error::{Result, StoreError};
pub use index::{EmbeddedChunk, IndexBuilder, IndexStore};
pub use pipeline::{PipelineConfig, build_index, retrieve};
pub use vector_store::{SearchHit, VectorStore, reconcile_dimension};
