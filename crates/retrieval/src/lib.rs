//! # Convo Retrieval
//!
//! Indexes loaded transcripts and answers "top-k relevant transcript ids"
//! for a query. Keyword scoring with fixed domain boosts is the default
//! strategy; an optional [`Embedder`] adds cosine-similarity ranking with
//! silent fallback to keywords when the semantic path fails.

mod embedding;
mod error;
mod retriever;

pub use embedding::{cosine_similarity, Embedder, HashingEmbedder};
pub use error::{Result, RetrievalError};
pub use retriever::Retriever;
