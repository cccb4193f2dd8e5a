use serde::{Deserialize, Serialize};

/// A verbatim (possibly truncated) quote from one turn, offered as support
/// for the explanation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceSpan {
    pub turn_id: usize,
    pub text: String,
}

/// The output contract of the analyzer. Serializes to the JSON shape any
/// CLI, API, or report generator built on top of the engine must honor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CausalExplanation {
    /// The query, verbatim
    pub query: String,

    pub primary_cause: String,

    /// At most 6 entries, in checklist order
    pub supporting_factors: Vec<String>,

    /// At most 4 entries, in transcript/turn order
    pub evidence_spans: Vec<EvidenceSpan>,

    /// In [0.6, 0.95], or exactly 0.3 when no transcripts were available
    pub confidence: f64,

    /// Ids of the transcripts the analysis ran over, in the given order
    pub relevant_transcript_ids: Vec<String>,

    /// RFC 3339 creation time
    pub timestamp: String,
}

/// One entry of the analyzer's append-only history log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub query: String,
    pub primary_cause: String,
    pub timestamp: String,
}
