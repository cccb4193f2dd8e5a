//! # Convo Analysis
//!
//! The causal-analysis rule engine: consumes a query plus a set of
//! retrieved transcripts and produces a [`CausalExplanation`] with a
//! primary cause, supporting factors, evidence quotes, and a heuristic
//! confidence score.

mod analyzer;
mod explanation;

pub use analyzer::CausalAnalyzer;
pub use explanation::{CausalExplanation, EvidenceSpan, HistoryRecord};
