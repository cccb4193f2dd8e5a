use crate::types::ConversationTranscript;
use std::collections::HashMap;

/// In-memory transcript store keyed by `transcript_id`, preserving load order.
///
/// Inserting an id that already exists replaces the stored transcript but
/// keeps the original position, so iteration order stays stable across
/// reloads and duplicate records are last-write-wins on content.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    order: Vec<String>,
    by_id: HashMap<String, ConversationTranscript>,
}

impl TranscriptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, transcript: ConversationTranscript) {
        let id = transcript.transcript_id.clone();
        if self.by_id.insert(id.clone(), transcript).is_none() {
            self.order.push(id);
        }
    }

    #[must_use]
    pub fn get(&self, transcript_id: &str) -> Option<&ConversationTranscript> {
        self.by_id.get(transcript_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Transcript ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Transcripts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ConversationTranscript> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TranscriptMetadata;

    fn transcript(id: &str, domain: &str) -> ConversationTranscript {
        ConversationTranscript {
            transcript_id: id.to_string(),
            domain: domain.to_string(),
            outcome: "general_inquiry".to_string(),
            turns: Vec::new(),
            metadata: TranscriptMetadata::default(),
        }
    }

    #[test]
    fn insert_preserves_order() {
        let mut store = TranscriptStore::new();
        store.insert(transcript("b", "Banking"));
        store.insert(transcript("a", "Retail"));
        store.insert(transcript("c", "Healthcare"));

        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn duplicate_id_replaces_content_keeps_position() {
        let mut store = TranscriptStore::new();
        store.insert(transcript("a", "Retail"));
        store.insert(transcript("b", "Banking"));
        store.insert(transcript("a", "Healthcare"));

        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").map(|t| t.domain.as_str()), Some("Healthcare"));
    }

    #[test]
    fn clear_empties_store() {
        let mut store = TranscriptStore::new();
        store.insert(transcript("a", "Retail"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.ids().count(), 0);
    }
}
