//! # Convo Patterns
//!
//! Regex rule tables for conversation analysis: outcome classification,
//! causal-factor extraction, and entity extraction. The tables are static
//! configuration compiled once; a [`PatternLibrary`] never mutates after
//! construction and a process-wide instance is available via
//! [`PatternLibrary::shared`].

mod error;
mod library;

pub use error::{PatternError, Result};
pub use library::{CausalKind, EntityKind, OutcomeKind, PatternLibrary, PatternStats};
