use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const CORPUS_CANDIDATES: [&str; 2] = ["data/sample_conversations.json", "sample_conversations.json"];

pub fn load_corpus(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Corpus {} is not valid JSON", path.display()))
}

/// Resolve the corpus to analyze: the `--data` flag if given, else the
/// first conventional path that exists, else the built-in sample.
/// Returns the parsed corpus and a description of where it came from.
pub fn resolve_corpus(data_flag: Option<&Path>) -> Result<(Value, String)> {
    if let Some(path) = data_flag {
        return Ok((load_corpus(path)?, path.display().to_string()));
    }

    for candidate in CORPUS_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            return Ok((load_corpus(path)?, candidate.to_string()));
        }
    }

    log::info!("No corpus file found; using the built-in sample corpus");
    Ok((sample_corpus(), "built-in sample".to_string()))
}

/// Two-call demo corpus: a healthcare escalation and a banking fraud case.
#[must_use]
pub fn sample_corpus() -> Value {
    json!({
        "transcripts": [
            {
                "transcript_id": "HC-001",
                "domain": "Healthcare Services",
                "intent": "Escalation - Repeated Service Failures",
                "reason_for_call": "Customer experiencing login issues for three weeks",
                "conversation": [
                    {"speaker": "Agent", "text": "Thank you for calling. How can I help you?"},
                    {"speaker": "Customer", "text": "I've been trying to resolve a login issue for three weeks now and I'm not getting any real help."},
                    {"speaker": "Agent", "text": "I'm sorry to hear about your ongoing issue. Let me check your account."},
                    {"speaker": "Customer", "text": "I've explained this multiple times. Each time I'm told it's fixed, but it's not. I need to speak with a supervisor."},
                    {"speaker": "Agent", "text": "I understand your frustration. I see error code 3309 in your account."},
                    {"speaker": "Customer", "text": "Nobody can tell me what that means or how to fix it!"},
                    {"speaker": "Agent", "text": "I'll transfer you to my supervisor right away."}
                ]
            },
            {
                "transcript_id": "FR-002",
                "domain": "Banking",
                "intent": "Fraud Alert Investigation",
                "reason_for_call": "Unauthorized charge detected",
                "conversation": [
                    {"speaker": "Agent", "text": "Fraud Department, how can I help?"},
                    {"speaker": "Customer", "text": "I got a fraud alert about a charge I didn't make."},
                    {"speaker": "Agent", "text": "I see a charge for $356.82 in New York. Did you make this?"},
                    {"speaker": "Customer", "text": "No, I've never been to New York."},
                    {"speaker": "Agent", "text": "I'm blocking your card and reversing the charge. You'll get a new card in 2-3 days."}
                ]
            }
        ]
    })
}
