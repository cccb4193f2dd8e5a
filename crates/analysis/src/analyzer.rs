use crate::explanation::{CausalExplanation, EvidenceSpan, HistoryRecord};
use chrono::Utc;
use convo_patterns::{EntityKind, PatternLibrary};
use convo_transcript::ConversationTranscript;
use std::collections::HashSet;

/// Vocabulary that qualifies a turn as evidence regardless of the query.
const KEY_INDICATORS: [&str; 9] = [
    "escalate",
    "supervisor",
    "fraud",
    "unauthorized",
    "delivered",
    "error",
    "frustrated",
    "weeks",
    "multiple",
];

const MAX_FACTORS: usize = 6;
const MAX_EVIDENCE: usize = 4;
const EVIDENCE_DISPLAY_CHARS: usize = 120;

/// Rule-based causal analyzer. Each instance keeps its own append-only
/// history of successful analyses.
pub struct CausalAnalyzer {
    patterns: &'static PatternLibrary,
    history: Vec<HistoryRecord>,
}

impl Default for CausalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CausalAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: PatternLibrary::shared(),
            history: Vec::new(),
        }
    }

    /// Produce a causal explanation for the query over the given transcripts.
    ///
    /// An empty transcript set yields the sentinel explanation (confidence
    /// 0.3, no factors or evidence) and is not recorded in history. The
    /// outcome key comes from the first transcript only.
    pub fn analyze(
        &mut self,
        query: &str,
        transcripts: &[&ConversationTranscript],
    ) -> CausalExplanation {
        let Some(first) = transcripts.first() else {
            return Self::empty_explanation(query);
        };

        let text = transcripts
            .iter()
            .map(|t| t.full_text())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let primary_cause = self.primary_cause(&first.outcome, &text, first);
        let factors = supporting_factors(&text);
        let evidence = extract_evidence(query, transcripts);
        let confidence = calculate_confidence(transcripts.len(), factors.len(), first);

        let explanation = CausalExplanation {
            query: query.to_string(),
            primary_cause,
            supporting_factors: factors,
            evidence_spans: evidence,
            confidence,
            relevant_transcript_ids: transcripts
                .iter()
                .map(|t| t.transcript_id.clone())
                .collect(),
            timestamp: Utc::now().to_rfc3339(),
        };

        self.history.push(HistoryRecord {
            query: explanation.query.clone(),
            primary_cause: explanation.primary_cause.clone(),
            timestamp: explanation.timestamp.clone(),
        });
        log::debug!(
            "Analyzed query '{query}' over {} transcripts (confidence {confidence:.2})",
            transcripts.len()
        );

        explanation
    }

    fn empty_explanation(query: &str) -> CausalExplanation {
        CausalExplanation {
            query: query.to_string(),
            primary_cause: "No relevant conversations found for analysis".to_string(),
            supporting_factors: Vec::new(),
            evidence_spans: Vec::new(),
            confidence: 0.3,
            relevant_transcript_ids: Vec::new(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    fn primary_cause(
        &self,
        outcome: &str,
        text: &str,
        first: &ConversationTranscript,
    ) -> String {
        if outcome.contains("escalation") {
            let mut causes = Vec::new();
            if text.contains("three weeks") || text.contains("weeks") {
                causes.push("prolonged issue duration (multiple weeks)".to_string());
            }
            if text.contains("multiple") || text.contains("several") || text.contains("repeated") {
                causes.push("multiple failed resolution attempts".to_string());
            }
            if text.contains("frustrated") || text.contains("frustration") {
                causes.push("accumulated customer frustration".to_string());
            }
            if text.contains("nobody") || text.contains("no one") {
                causes.push("previous agents unable to resolve".to_string());
            }
            if let Some(code) = self.patterns.first_entity(EntityKind::ErrorCode, text) {
                causes.push(format!("unresolved error code {code}"));
            }
            return if causes.is_empty() {
                "Customer requested escalation to supervisor".to_string()
            } else {
                format!("Customer escalated due to: {}", causes.join("; "))
            };
        }

        if outcome.contains("fraud") {
            let mut causes = Vec::new();
            if let Some(amount) = self.patterns.first_entity(EntityKind::Amount, text) {
                causes.push(format!("unauthorized charge of {amount}"));
            }
            if text.contains("new york") {
                causes.push("transaction in New York (customer never visited)".to_string());
            } else if text.contains("different location") {
                causes.push("transaction from different location".to_string());
            }
            if text.contains("fraud alert") {
                causes.push("automatic fraud detection triggered".to_string());
            }
            if text.contains("block") {
                causes.push("card blocked for security".to_string());
            }
            return if causes.is_empty() {
                "Fraudulent transaction identified and addressed".to_string()
            } else {
                format!("Fraud detected: {}", causes.join("; "))
            };
        }

        if outcome.contains("delivery") {
            let mut causes = Vec::new();
            if text.contains("shows delivered") || text.contains("marked delivered") {
                causes.push("package marked delivered in tracking".to_string());
            }
            if text.contains("never received") || text.contains("not there") {
                causes.push("customer did not receive package".to_string());
            }
            if text.contains("camera") || text.contains("neighbor") {
                causes.push("customer verified non-delivery".to_string());
            }
            if text.contains("wrong address") {
                causes.push("possible wrong address delivery".to_string());
            }
            return if causes.is_empty() {
                "Package delivery discrepancy reported".to_string()
            } else {
                format!("Delivery issue: {}", causes.join("; "))
            };
        }

        let reason = &first.metadata.reason_for_call;
        if reason.is_empty() {
            format!("Issue type: {outcome}")
        } else {
            format!("Issue identified: {reason}")
        }
    }

    /// History of successful analyses, oldest first.
    #[must_use]
    pub fn get_history(&self) -> Vec<HistoryRecord> {
        self.history.clone()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Fixed checklist of text-contains tests, evaluated in order; the first
/// 6 satisfied tests become the supporting factors. This list is separate
/// from the pattern library's causal extractor on purpose.
fn supporting_factors(text: &str) -> Vec<String> {
    let checklist: [(&[&str], &str); 10] = [
        (
            &["three weeks", "weeks"],
            "Extended duration: issue persisted for weeks",
        ),
        (
            &["yesterday", "today"],
            "Recent occurrence: within last 24 hours",
        ),
        (
            &["multiple", "several"],
            "Multiple occurrences or attempts documented",
        ),
        (&["repeated", "again"], "Repeated failures noted"),
        (
            &["frustrated", "frustration"],
            "Customer expressed frustration",
        ),
        (&["upset", "angry"], "Customer emotional distress"),
        (
            &["checked", "verified"],
            "Customer performed verification steps",
        ),
        (
            &["supervisor", "manager"],
            "Escalation to supervisor requested",
        ),
        (
            &["expedited", "immediately"],
            "Agent provided swift response",
        ),
        (
            &["blocked", "reversed"],
            "Immediate security action taken",
        ),
    ];

    checklist
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| text.contains(n)))
        .map(|(_, factor)| (*factor).to_string())
        .take(MAX_FACTORS)
        .collect()
}

/// A turn qualifies as evidence when it contains any query token longer
/// than 3 characters or any key-indicator word. Collection stops at 4
/// spans across all transcripts.
fn extract_evidence(query: &str, transcripts: &[&ConversationTranscript]) -> Vec<EvidenceSpan> {
    let query_terms: HashSet<String> = query
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .map(str::to_lowercase)
        .collect();

    let mut evidence = Vec::new();
    for transcript in transcripts {
        for turn in &transcript.turns {
            if evidence.len() >= MAX_EVIDENCE {
                return evidence;
            }
            let lower = turn.text.to_lowercase();
            let query_hit = query_terms.iter().any(|t| lower.contains(t));
            let indicator_hit = KEY_INDICATORS.iter().any(|k| lower.contains(k));
            if query_hit || indicator_hit {
                evidence.push(EvidenceSpan {
                    turn_id: turn.turn_id,
                    text: format!("[{}] {}", turn.speaker, truncate_display(&turn.text)),
                });
            }
        }
    }
    evidence
}

fn truncate_display(text: &str) -> String {
    if text.chars().count() > EVIDENCE_DISPLAY_CHARS {
        let cut: String = text.chars().take(EVIDENCE_DISPLAY_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn calculate_confidence(
    transcript_count: usize,
    factor_count: usize,
    first: &ConversationTranscript,
) -> f64 {
    let mut confidence = 0.6;
    confidence += (transcript_count as f64 * 0.05).min(0.15);
    confidence += (factor_count as f64 * 0.03).min(0.15);
    if !first.metadata.reason_for_call.is_empty() {
        confidence += 0.1;
    }
    confidence.clamp(0.6, 0.95)
}
