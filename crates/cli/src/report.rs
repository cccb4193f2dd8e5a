use convo_analysis::CausalExplanation;
use convo_transcript::ConversationTranscript;

const RULE: &str = "================================================================================";
const DASHES: &str = "------------------------------------------------------------";

pub fn format_explanation(explanation: &CausalExplanation) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "CAUSAL ANALYSIS RESULT".to_string(),
        RULE.to_string(),
        format!("\nQuery: {}\n", explanation.query),
        "PRIMARY CAUSE:".to_string(),
        format!("   {}\n", explanation.primary_cause),
    ];

    if !explanation.supporting_factors.is_empty() {
        lines.push("SUPPORTING FACTORS:".to_string());
        for (i, factor) in explanation.supporting_factors.iter().enumerate() {
            lines.push(format!("   {}. {factor}", i + 1));
        }
        lines.push(String::new());
    }

    if !explanation.evidence_spans.is_empty() {
        lines.push("EVIDENCE FROM CONVERSATION:".to_string());
        for span in &explanation.evidence_spans {
            lines.push(format!("   Turn {}: {}", span.turn_id, span.text));
        }
        lines.push(String::new());
    }

    lines.push(format!("CONFIDENCE: {:.0}%", explanation.confidence * 100.0));
    lines.push(format!(
        "   Relevant Transcripts: {}",
        explanation.relevant_transcript_ids.join(", ")
    ));
    lines.push(RULE.to_string());

    lines.join("\n")
}

pub fn format_transcript_summary(transcript: &ConversationTranscript) -> String {
    let mut lines = vec![
        format!("  ID: {}", transcript.transcript_id),
        format!("  Domain: {}", transcript.domain),
        format!("  Outcome: {}", transcript.outcome),
    ];
    if !transcript.metadata.reason_for_call.is_empty() {
        lines.push(format!("  Reason: {}", transcript.metadata.reason_for_call));
    }
    lines.push(DASHES.to_string());
    lines.join("\n")
}
