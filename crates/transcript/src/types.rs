use serde::{Deserialize, Serialize};

/// A single utterance by one speaker within a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    /// 0-based position of the turn in the source conversation
    pub turn_id: usize,

    /// Who spoke (e.g. "Agent", "Customer")
    pub speaker: String,

    /// Utterance text, may be empty
    pub text: String,

    /// Optional timestamp string, passed through from the source
    pub timestamp: Option<String>,
}

impl ConversationTurn {
    #[must_use]
    pub const fn new(
        turn_id: usize,
        speaker: String,
        text: String,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            turn_id,
            speaker,
            text,
            timestamp,
        }
    }
}

/// Call metadata carried alongside the turns
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptMetadata {
    /// Raw intent string from the source record
    pub intent: String,

    /// Free-text reason the customer called
    pub reason_for_call: String,

    /// When the interaction happened, if recorded
    pub time_of_interaction: Option<String>,
}

/// One complete customer-service call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTranscript {
    /// Unique key within a store
    pub transcript_id: String,

    /// Business domain (e.g. "Banking")
    pub domain: String,

    /// Coarse outcome category derived from the intent
    pub outcome: String,

    /// Ordered turns
    pub turns: Vec<ConversationTurn>,

    pub metadata: TranscriptMetadata,
}

impl ConversationTranscript {
    /// Turn texts joined with single spaces, in turn order
    #[must_use]
    pub fn full_text(&self) -> String {
        self.turns
            .iter()
            .map(|turn| turn.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
