//! # quarry-embed
//!
//! The external embedder boundary for the quarry retrieval pipeline. The
//! core pipeline only depends on the shape of an embedding (a fixed-length
//! `Vec<f32>`); everything about how the vectors are produced lives behind
//! the [`EmbeddingProvider`] trait defined here.
//!
//! ## Design
//!
//! - **Opaque failures**: provider errors pass through as
//!   [`EmbedError::Provider`] with no retry logic of their own; retries and
//!   timeouts are the provider's concern.
//! - **Async-first**: both the single-query and batch calls are async so
//!   callers can cancel at the network suspension points.
//! - **One concrete provider**: [`HttpEmbedProvider`] speaks the
//!   OpenAI-compatible `/embeddings` wire format over `reqwest`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quarry_embed::{EmbedConfig, EmbeddingProvider, HttpEmbedProvider};
//!
//! # async fn example() -> quarry_embed::Result<()> {
//! let provider = HttpEmbedProvider::new(EmbedConfig::new("sk-..."))?;
//! let vector = provider.embed_query("how do I reset my password?").await?;
//! println!("query embedded into {} dimensions", vector.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;

// Re-export main types for easy access
pub use config::EmbedConfig;
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, HttpEmbedProvider};
