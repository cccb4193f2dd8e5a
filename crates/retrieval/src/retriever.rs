use crate::embedding::{cosine_similarity, Embedder, HashingEmbedder};
use crate::error::{Result, RetrievalError};
use convo_transcript::{load_into, ConversationTranscript, TranscriptStore};
use serde_json::Value;
use std::collections::HashMap;
use std::env;

/// Environment variable selecting the embedding backend: `off` (default)
/// keeps retrieval keyword-only, `hash` enables the deterministic
/// [`HashingEmbedder`].
pub const EMBEDDING_MODE_ENV: &str = "CONVO_EMBEDDING_MODE";

/// Owns the transcript store and answers top-k retrieval queries.
pub struct Retriever {
    store: TranscriptStore,
    embeddings: HashMap<String, Vec<f32>>,
    embedder: Option<Box<dyn Embedder>>,
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new()
    }
}

impl Retriever {
    /// Keyword-only retriever.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: TranscriptStore::new(),
            embeddings: HashMap::new(),
            embedder: None,
        }
    }

    #[must_use]
    pub fn with_embedder(embedder: Box<dyn Embedder>) -> Self {
        Self {
            store: TranscriptStore::new(),
            embeddings: HashMap::new(),
            embedder: Some(embedder),
        }
    }

    /// Backend selection from [`EMBEDDING_MODE_ENV`]. Unrecognized values
    /// log a warning and fall back to keyword-only retrieval.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = env::var(EMBEDDING_MODE_ENV)
            .unwrap_or_else(|_| "off".to_string())
            .to_ascii_lowercase();
        match raw.as_str() {
            "off" => Self::new(),
            "hash" => Self::with_embedder(Box::new(HashingEmbedder::default())),
            other => {
                log::warn!(
                    "Unsupported {EMBEDDING_MODE_ENV} '{other}' (expected 'off' or 'hash'); \
                     using keyword retrieval"
                );
                Self::new()
            }
        }
    }

    /// Load a raw JSON corpus into the store. When an embedder is active,
    /// every stored transcript is re-embedded from its current full text,
    /// so a reload that replaces a duplicate id's content also replaces its
    /// vector. Individual embedding failures leave that transcript without
    /// a vector.
    pub fn load(&mut self, data: &Value) -> usize {
        let count = load_into(&mut self.store, data);
        if let Some(embedder) = &self.embedder {
            for transcript in self.store.iter() {
                let id = transcript.transcript_id.as_str();
                match embedder.embed(&transcript.full_text()) {
                    Ok(vector) => {
                        self.embeddings.insert(id.to_string(), vector);
                    }
                    Err(e) => log::debug!("Could not embed transcript {id}: {e}"),
                }
            }
        }
        count
    }

    /// Top-k transcript ids for the query, best first. Semantic ranking is
    /// used when any embeddings exist; any failure there falls back to
    /// keyword scoring. Never empty while the store is non-empty.
    #[must_use]
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<String> {
        if !self.embeddings.is_empty() {
            match self.retrieve_semantic(query, top_k) {
                Ok(ids) => return ids,
                Err(e) => {
                    log::warn!("Semantic retrieval failed, falling back to keyword scoring: {e}");
                }
            }
        }
        self.retrieve_keyword(query, top_k)
    }

    fn retrieve_semantic(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        let embedder = self.embedder.as_ref().ok_or(RetrievalError::NoEmbedder)?;
        let query_vector = embedder.embed(query)?;

        let mut scored: Vec<(&str, f32)> = self
            .store
            .iter()
            .filter_map(|transcript| {
                let id = transcript.transcript_id.as_str();
                self.embeddings
                    .get(id)
                    .map(|vector| (id, cosine_similarity(&query_vector, vector)))
            })
            .collect();

        // Stable sort keeps store order for equal similarities.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(id, _)| id.to_string())
            .collect())
    }

    fn retrieve_keyword(&self, query: &str, top_k: usize) -> Vec<String> {
        let query_lower = query.to_lowercase();
        let tokens: Vec<&str> = query_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .collect();

        let mut scored: Vec<(&str, f64)> = Vec::with_capacity(self.store.len());
        for transcript in self.store.iter() {
            let mut content = transcript.full_text().to_lowercase();
            content.push(' ');
            content.push_str(&transcript.metadata.reason_for_call.to_lowercase());

            let mut score = if tokens.is_empty() {
                0.0
            } else {
                let matches = tokens.iter().filter(|w| content.contains(*w)).count();
                (matches as f64 / tokens.len() as f64) * 100.0
            };

            // Fixed domain boosts, additive and independent of the base score.
            if query_lower.contains("escalat")
                && (content.contains("escalat") || content.contains("supervisor"))
            {
                score += 50.0;
            }
            if query_lower.contains("fraud") && content.contains("fraud") {
                score += 50.0;
            }
            if query_lower.contains("delivery") && content.contains("delivery") {
                score += 50.0;
            }
            if query_lower.contains("error") && content.contains("error") {
                score += 30.0;
            }

            scored.push((transcript.transcript_id.as_str(), score));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let result: Vec<String> = scored
            .iter()
            .take(top_k)
            .filter(|(_, score)| *score > 0.0)
            .map(|(id, _)| (*id).to_string())
            .collect();

        if result.is_empty() {
            // Nothing matched: fall back to the first top_k in store order.
            self.store.ids().take(top_k).map(ToString::to_string).collect()
        } else {
            result
        }
    }

    #[must_use]
    pub fn get_transcript(&self, transcript_id: &str) -> Option<&ConversationTranscript> {
        self.store.get(transcript_id)
    }

    /// All loaded transcripts, in store order.
    pub fn transcripts(&self) -> impl Iterator<Item = &ConversationTranscript> {
        self.store.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn has_embeddings(&self) -> bool {
        !self.embeddings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn corpus() -> Value {
        json!({"transcripts": [
            {
                "transcript_id": "FR-1",
                "domain": "Banking",
                "intent": "Fraud Alert Investigation",
                "reason_for_call": "Unauthorized charge detected",
                "conversation": [
                    {"speaker": "Customer", "text": "I got a fraud alert about a charge I didn't make."},
                    {"speaker": "Agent", "text": "I'm blocking your card now."}
                ]
            },
            {
                "transcript_id": "DL-2",
                "domain": "Retail",
                "intent": "Delivery Dispute",
                "reason_for_call": "Package marked delivered but missing",
                "conversation": [
                    {"speaker": "Customer", "text": "Tracking shows delivered but the package never arrived."}
                ]
            },
            {
                "transcript_id": "GEN-3",
                "domain": "Utilities",
                "intent": "",
                "reason_for_call": "",
                "conversation": [
                    {"speaker": "Customer", "text": "Just a question about my bill."}
                ]
            }
        ]})
    }

    #[test]
    fn keyword_retrieval_applies_fraud_boost() {
        let mut retriever = Retriever::new();
        assert_eq!(retriever.load(&corpus()), 3);

        let ids = retriever.retrieve("fraud", 3);
        // "fraud" is a base-score hit plus the +50 boost for FR-1 only.
        assert_eq!(ids[0], "FR-1");
        assert_eq!(ids.len(), 1, "zero-score transcripts are filtered out");
    }

    #[test]
    fn keyword_retrieval_respects_top_k() {
        let mut retriever = Retriever::new();
        retriever.load(&corpus());

        let ids = retriever.retrieve("package delivered question bill", 1);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn retrieval_matches_reason_for_call_text() {
        let mut retriever = Retriever::new();
        retriever.load(&corpus());

        let ids = retriever.retrieve("unauthorized", 3);
        assert_eq!(ids, vec!["FR-1".to_string()]);
    }

    #[test]
    fn no_match_falls_back_to_store_order() {
        let mut retriever = Retriever::new();
        retriever.load(&corpus());

        let ids = retriever.retrieve("zzz qqq xyzzy", 2);
        assert_eq!(ids, vec!["FR-1".to_string(), "DL-2".to_string()]);
    }

    #[test]
    fn short_tokens_are_ignored() {
        let mut retriever = Retriever::new();
        retriever.load(&corpus());

        // All tokens <= 2 chars: base score 0 everywhere, fallback applies.
        let ids = retriever.retrieve("a of to", 3);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], "FR-1");
    }

    #[test]
    fn semantic_retrieval_ranks_identical_text_first() {
        let mut retriever = Retriever::with_embedder(Box::new(HashingEmbedder::default()));
        retriever.load(&corpus());
        assert!(retriever.has_embeddings());

        // Query with the exact full text of DL-2: cosine similarity 1.0.
        let ids = retriever.retrieve(
            "Tracking shows delivered but the package never arrived.",
            2,
        );
        assert_eq!(ids[0], "DL-2");
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn reload_with_changed_text_replaces_the_vector() {
        let mut retriever = Retriever::with_embedder(Box::new(HashingEmbedder::default()));
        retriever.load(&json!([
            {
                "transcript_id": "a",
                "conversation": [{"speaker": "Customer", "text": "a question about gardening"}]
            }
        ]));

        // Same id, new content: the store is last-write-wins, and the
        // embedding must follow the new text.
        retriever.load(&json!([
            {
                "transcript_id": "a",
                "conversation": [{"speaker": "Customer", "text": "an unauthorized fraud charge on my card"}]
            },
            {
                "transcript_id": "b",
                "conversation": [{"speaker": "Customer", "text": "where is my package"}]
            }
        ]));

        // Query with a's exact new full text: cosine similarity 1.0 for a
        // only if its vector was recomputed.
        let ids = retriever.retrieve("an unauthorized fraud charge on my card", 2);
        assert_eq!(ids[0], "a");
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            Err(RetrievalError::Embedding("backend down".to_string()))
        }

        fn dimension(&self) -> usize {
            0
        }
    }

    #[test]
    fn semantic_failure_falls_back_to_keyword_scoring() {
        let mut retriever = Retriever::with_embedder(Box::new(HashingEmbedder::default()));
        retriever.load(&corpus());
        // Swap in a backend that fails at query time; loaded vectors remain.
        retriever.embedder = Some(Box::new(FailingEmbedder));

        let ids = retriever.retrieve("fraud", 3);
        assert_eq!(ids, vec!["FR-1".to_string()]);
    }

    #[test]
    fn empty_store_retrieves_nothing() {
        let retriever = Retriever::new();
        assert!(retriever.retrieve("anything", 3).is_empty());
    }
}
