use crate::error::{Result, TranscriptError};
use crate::store::TranscriptStore;
use crate::types::{ConversationTranscript, ConversationTurn, TranscriptMetadata};
use serde_json::Value;

/// Resolve the record list from the supported corpus shapes, tried in order:
/// a bare array, an object wrapping an array under `transcripts` or
/// `conversations`, or a single record (detected by `conversation` /
/// `transcript_id`). Anything else yields an empty list, not an error.
#[must_use]
pub fn extract_records(data: &Value) -> Vec<&Value> {
    if let Some(list) = data.as_array() {
        return list.iter().collect();
    }
    if let Some(obj) = data.as_object() {
        for key in ["transcripts", "conversations"] {
            if let Some(list) = obj.get(key).and_then(Value::as_array) {
                return list.iter().collect();
            }
        }
        if obj.contains_key("conversation") || obj.contains_key("transcript_id") {
            return vec![data];
        }
    }
    Vec::new()
}

/// Map a raw `intent` string to an outcome category.
#[must_use]
pub fn outcome_from_intent(intent: &str) -> String {
    let lower = intent.to_lowercase();
    if lower.contains("escalation") {
        "escalation".to_string()
    } else if lower.contains("fraud") {
        "fraud_resolved".to_string()
    } else if lower.contains("delivery") {
        "delivery_investigation".to_string()
    } else if lower.contains("resolved") || lower.contains("compensation") {
        "resolved_with_compensation".to_string()
    } else if intent.is_empty() {
        "general_inquiry".to_string()
    } else {
        intent.to_string()
    }
}

/// Parse one raw record into a transcript. Missing fields get defaults;
/// `idx` feeds the positional fallbacks (`conv_{idx}`, alternating speakers).
pub fn parse_record(record: &Value, idx: usize) -> Result<ConversationTranscript> {
    let obj = record
        .as_object()
        .ok_or(TranscriptError::NotAnObject(idx))?;

    let raw_turns = match obj.get("conversation").or_else(|| obj.get("turns")) {
        None => &[] as &[Value],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => return Err(TranscriptError::TurnsNotArray(idx)),
    };

    let mut turns = Vec::with_capacity(raw_turns.len());
    for (i, raw_turn) in raw_turns.iter().enumerate() {
        // Turn ids keep the source position even when entries are skipped.
        match raw_turn {
            Value::Object(turn) => {
                let speaker = turn
                    .get("speaker")
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("Speaker{}", i % 2 + 1), ToString::to_string);
                let text = turn
                    .get("text")
                    .or_else(|| turn.get("utterance"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let timestamp = turn
                    .get("timestamp")
                    .and_then(Value::as_str)
                    .map(ToString::to_string);
                turns.push(ConversationTurn::new(i, speaker, text, timestamp));
            }
            Value::String(text) => {
                turns.push(ConversationTurn::new(
                    i,
                    format!("Speaker{}", i % 2 + 1),
                    text.clone(),
                    None,
                ));
            }
            _ => {}
        }
    }

    let intent = obj
        .get("intent")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let outcome = outcome_from_intent(&intent);

    let metadata = TranscriptMetadata {
        reason_for_call: obj
            .get("reason_for_call")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        time_of_interaction: obj
            .get("time_of_interaction")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        intent,
    };

    Ok(ConversationTranscript {
        transcript_id: obj
            .get("transcript_id")
            .and_then(Value::as_str)
            .map_or_else(|| format!("conv_{idx}"), ToString::to_string),
        domain: obj
            .get("domain")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        outcome,
        turns,
        metadata,
    })
}

/// Load every parseable record from `data` into `store`. Malformed records
/// are logged and skipped; loading never fails for a single bad entry.
/// Returns the store size afterwards.
pub fn load_into(store: &mut TranscriptStore, data: &Value) -> usize {
    let records = extract_records(data);
    for (idx, record) in records.iter().enumerate() {
        match parse_record(record, idx) {
            Ok(transcript) => store.insert(transcript),
            Err(e) => log::warn!("Skipping conversation record: {e}"),
        }
    }
    log::info!("Loaded {} transcripts", store.len());
    store.len()
}
