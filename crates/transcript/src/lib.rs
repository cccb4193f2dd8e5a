//! # Convo Transcript
//!
//! Conversation data model and JSON corpus ingestion.
//!
//! A corpus file can be a bare array of conversation records, an object
//! wrapping the array under `transcripts` or `conversations`, or a single
//! record. [`load_into`] accepts any of those shapes, parses each record
//! permissively (missing fields get defaults), skips records it cannot make
//! sense of, and fills a [`TranscriptStore`] that preserves file order.

mod error;
mod loader;
mod store;
mod types;

pub use error::{Result, TranscriptError};
pub use loader::{extract_records, load_into, outcome_from_intent, parse_record};
pub use store::TranscriptStore;
pub use types::{ConversationTranscript, ConversationTurn, TranscriptMetadata};
