use crate::error::{PatternError, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Outcome categories scored by [`PatternLibrary::classify_outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Escalation,
    Fraud,
    DeliveryIssue,
    Resolution,
}

impl OutcomeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Escalation => "escalation",
            Self::Fraud => "fraud",
            Self::DeliveryIssue => "delivery_issue",
            Self::Resolution => "resolution",
        }
    }
}

/// Causal-factor categories of [`PatternLibrary::extract_causal_factors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CausalKind {
    Temporal,
    Repetition,
    Emotional,
    Technical,
}

impl CausalKind {
    /// Title-case label used as the factor prefix
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Temporal => "Temporal",
            Self::Repetition => "Repetition",
            Self::Emotional => "Emotional",
            Self::Technical => "Technical",
        }
    }
}

/// Entity types extracted by [`PatternLibrary::extract_entities`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Amount,
    OrderNumber,
    AccountNumber,
    ErrorCode,
    Date,
    TimePeriod,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::OrderNumber => "order_number",
            Self::AccountNumber => "account_number",
            Self::ErrorCode => "error_code",
            Self::Date => "date",
            Self::TimePeriod => "time_period",
        }
    }
}

/// Total pattern counts per table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStats {
    pub outcome_patterns: usize,
    pub causal_patterns: usize,
    pub entity_patterns: usize,
}

const OUTCOME_TABLE: &[(OutcomeKind, &[&str])] = &[
    (
        OutcomeKind::Escalation,
        &[
            r"speak\s+(?:to|with)\s+(?:a\s+)?supervisor",
            r"escalat(?:e|ed|ing)",
            r"talk\s+to\s+(?:a\s+)?manager",
            r"file\s+(?:a\s+)?complaint",
            r"(?:been|calling)\s+for\s+(?:\d+\s+)?weeks?",
        ],
    ),
    (
        OutcomeKind::Fraud,
        &[
            r"fraud\s+alert",
            r"unauthorized\s+(?:charge|transaction|purchase)",
            r"didn'?t\s+make\s+(?:this|that)\s+purchase",
            r"never\s+been\s+to",
            r"block(?:ed|ing)?\s+(?:my\s+)?card",
        ],
    ),
    (
        OutcomeKind::DeliveryIssue,
        &[
            r"shows?\s+(?:as\s+)?delivered",
            r"never\s+received",
            r"package\s+(?:is\s+)?missing",
            r"not\s+(?:at\s+)?(?:my\s+)?door",
            r"wrong\s+address",
        ],
    ),
    (
        OutcomeKind::Resolution,
        &[
            r"send(?:ing)?\s+(?:a\s+)?replacement",
            r"(?:full\s+)?refund",
            r"expedited\s+(?:shipping|delivery)",
            r"no\s+(?:extra\s+)?charge",
            r"investigation\s+(?:started|initiated)",
        ],
    ),
];

const CAUSAL_TABLE: &[(CausalKind, &[(&str, &str)])] = &[
    (
        CausalKind::Temporal,
        &[
            (r"for\s+(\d+)\s+weeks?", "Duration: {} week(s)"),
            (r"for\s+(\d+)\s+days?", "Duration: {} day(s)"),
            (r"since\s+(\w+day)", "Since {}"),
            (r"yesterday", "Occurred yesterday"),
            (r"this\s+morning", "Occurred this morning"),
        ],
    ),
    (
        CausalKind::Repetition,
        &[
            (r"(\d+)\s+(?:times?|attempts?)", "{} previous attempts"),
            (r"multiple\s+(?:times?|calls?)", "Multiple occurrences"),
            (r"(?:keep|keeps)\s+(?:happening|failing)", "Recurring issue"),
            (r"again\s+and\s+again", "Repeated issue"),
        ],
    ),
    (
        CausalKind::Emotional,
        &[
            (r"(?:very\s+)?frustrated", "Customer frustration"),
            (r"(?:very\s+)?upset", "Customer upset"),
            (r"unacceptable", "Expressed unacceptability"),
            (r"wasted?\s+(?:my\s+)?time", "Perceived time waste"),
        ],
    ),
    (
        CausalKind::Technical,
        &[
            (r"error\s+(?:code\s+)?(\d+)", "Error code {}"),
            (r"(?:app|system)\s+(?:crash|fail)", "System failure"),
            (r"login\s+fail", "Authentication issue"),
            (r"can'?t\s+(?:access|log\s*in)", "Access problem"),
        ],
    ),
];

const ENTITY_TABLE: &[(EntityKind, &str)] = &[
    (EntityKind::Amount, r"\$[\d,]+\.?\d*"),
    (EntityKind::OrderNumber, r"(?:order\s*(?:#|number)?\s*)?(\d{7,})"),
    (
        EntityKind::AccountNumber,
        r"(?:account\s*(?:#|number)?\s*)?(\d{4}[-\s]?\d{4}[-\s]?\d{4})",
    ),
    (EntityKind::ErrorCode, r"error\s*(?:code\s*)?(\d+)"),
    (EntityKind::Date, r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}"),
    (EntityKind::TimePeriod, r"(\d+)\s*(days?|weeks?|months?)"),
];

/// Immutable regex rule tables for outcome classification, causal-factor
/// extraction, and entity extraction. Declaration order of the tables is
/// significant: it breaks classification ties and orders extracted factors.
pub struct PatternLibrary {
    outcome: Vec<(OutcomeKind, Vec<Regex>)>,
    causal: Vec<(CausalKind, Vec<(Regex, &'static str)>)>,
    entity: Vec<(EntityKind, Regex)>,
}

static SHARED: Lazy<PatternLibrary> =
    Lazy::new(|| PatternLibrary::new().expect("built-in pattern tables compile"));

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError::BadPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Fill `{}` placeholders with capture groups, in order.
fn fill_template(template: &str, caps: &regex::Captures<'_>) -> String {
    let mut out = template.to_string();
    for group in caps.iter().skip(1).flatten() {
        if let Some(pos) = out.find("{}") {
            out.replace_range(pos..pos + 2, group.as_str());
        }
    }
    out
}

impl PatternLibrary {
    pub fn new() -> Result<Self> {
        let mut outcome = Vec::with_capacity(OUTCOME_TABLE.len());
        for (kind, patterns) in OUTCOME_TABLE {
            let compiled = patterns.iter().map(|p| compile(p)).collect::<Result<_>>()?;
            outcome.push((*kind, compiled));
        }

        let mut causal = Vec::with_capacity(CAUSAL_TABLE.len());
        for (kind, patterns) in CAUSAL_TABLE {
            let compiled = patterns
                .iter()
                .map(|(p, template)| Ok((compile(p)?, *template)))
                .collect::<Result<_>>()?;
            causal.push((*kind, compiled));
        }

        let mut entity = Vec::with_capacity(ENTITY_TABLE.len());
        for (kind, pattern) in ENTITY_TABLE {
            entity.push((*kind, compile(pattern)?));
        }

        Ok(Self {
            outcome,
            causal,
            entity,
        })
    }

    /// Process-wide read-only instance
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Score each outcome category as `matches / patterns` and return the
    /// best one. Ties resolve to the earlier declared category.
    #[must_use]
    pub fn classify_outcome(&self, text: &str) -> (&'static str, f64) {
        let lower = text.to_lowercase();
        let mut best: Option<(&'static str, f64)> = None;
        for (kind, patterns) in &self.outcome {
            if patterns.is_empty() {
                continue;
            }
            let matches = patterns.iter().filter(|p| p.is_match(&lower)).count();
            let score = matches as f64 / patterns.len() as f64;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((kind.as_str(), score));
            }
        }
        best.unwrap_or(("unknown", 0.0))
    }

    /// Extract causal factors as `"<Category>: <filled template>"` strings.
    /// Every matching pattern contributes; there is no dedup or early exit.
    #[must_use]
    pub fn extract_causal_factors(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut factors = Vec::new();
        for (kind, patterns) in &self.causal {
            for (pattern, template) in patterns {
                if let Some(caps) = pattern.captures(&lower) {
                    factors.push(format!("{}: {}", kind.title(), fill_template(template, &caps)));
                }
            }
        }
        factors
    }

    /// All matches per entity kind, for kinds with at least one match.
    /// A pattern with a single capture group yields that group; otherwise
    /// the whole match.
    #[must_use]
    pub fn extract_entities(&self, text: &str) -> Vec<(EntityKind, Vec<String>)> {
        let mut entities = Vec::new();
        for (kind, pattern) in &self.entity {
            let matches: Vec<String> = pattern
                .captures_iter(text)
                .filter_map(|caps| {
                    let m = if pattern.captures_len() == 2 {
                        caps.get(1)
                    } else {
                        caps.get(0)
                    };
                    m.map(|m| m.as_str().to_string())
                })
                .collect();
            if !matches.is_empty() {
                entities.push((*kind, matches));
            }
        }
        entities
    }

    /// First match for one entity kind, resolved the same way as
    /// [`extract_entities`](Self::extract_entities).
    #[must_use]
    pub fn first_entity(&self, kind: EntityKind, text: &str) -> Option<String> {
        let (_, pattern) = self.entity.iter().find(|(k, _)| *k == kind)?;
        let caps = pattern.captures(text)?;
        let m = if pattern.captures_len() == 2 {
            caps.get(1)
        } else {
            caps.get(0)
        };
        m.map(|m| m.as_str().to_string())
    }

    #[must_use]
    pub fn stats(&self) -> PatternStats {
        PatternStats {
            outcome_patterns: self.outcome.iter().map(|(_, p)| p.len()).sum(),
            causal_patterns: self.causal.iter().map(|(_, p)| p.len()).sum(),
            entity_patterns: self.entity.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classify_outcome_picks_highest_ratio() {
        let lib = PatternLibrary::shared();
        let (outcome, score) = lib.classify_outcome(
            "I need to speak with a supervisor, I've been calling for weeks and want to escalate",
        );
        assert_eq!(outcome, "escalation");
        assert!((score - 0.6).abs() < 1e-9, "score {score}");
    }

    #[test]
    fn classify_outcome_breaks_ties_by_declaration_order() {
        let lib = PatternLibrary::shared();
        // No pattern matches: every category scores 0.0, escalation declared first.
        let (outcome, score) = lib.classify_outcome("nothing interesting here");
        assert_eq!(outcome, "escalation");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn classify_outcome_is_case_insensitive() {
        let lib = PatternLibrary::shared();
        let (outcome, _) = lib.classify_outcome("FRAUD ALERT on an UNAUTHORIZED CHARGE");
        assert_eq!(outcome, "fraud");
    }

    #[test]
    fn causal_factors_fill_templates_from_captures() {
        let lib = PatternLibrary::shared();
        let factors =
            lib.extract_causal_factors("this has been broken for 3 weeks and I am very frustrated");
        assert!(factors.contains(&"Temporal: Duration: 3 week(s)".to_string()));
        assert!(factors.contains(&"Emotional: Customer frustration".to_string()));
    }

    #[test]
    fn causal_factors_accumulate_across_patterns_in_a_category() {
        let lib = PatternLibrary::shared();
        // Two temporal patterns match; both contribute, no early exit.
        let factors = lib.extract_causal_factors("for 2 weeks now, and again for 5 days");
        let temporal: Vec<&String> = factors
            .iter()
            .filter(|f| f.starts_with("Temporal:"))
            .collect();
        assert_eq!(
            temporal,
            vec!["Temporal: Duration: 2 week(s)", "Temporal: Duration: 5 day(s)"]
        );
    }

    #[test]
    fn causal_factors_preserve_category_order() {
        let lib = PatternLibrary::shared();
        let factors = lib.extract_causal_factors("error code 3309 happened yesterday");
        assert_eq!(
            factors,
            vec![
                "Temporal: Occurred yesterday".to_string(),
                "Technical: Error code 3309".to_string()
            ]
        );
    }

    #[test]
    fn entities_capture_groups_or_whole_match() {
        let lib = PatternLibrary::shared();
        let entities =
            lib.extract_entities("A charge of $356.82 with error code 3309 on 12/03/2024");
        let get = |kind: EntityKind| {
            entities
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, m)| m.clone())
        };
        assert_eq!(get(EntityKind::Amount), Some(vec!["$356.82".to_string()]));
        assert_eq!(get(EntityKind::ErrorCode), Some(vec!["3309".to_string()]));
        assert_eq!(get(EntityKind::Date), Some(vec!["12/03/2024".to_string()]));
        assert_eq!(get(EntityKind::OrderNumber), None);
    }

    #[test]
    fn first_entity_returns_earliest_match() {
        let lib = PatternLibrary::shared();
        assert_eq!(
            lib.first_entity(EntityKind::Amount, "charges of $10.00 and $20.00"),
            Some("$10.00".to_string())
        );
        assert_eq!(lib.first_entity(EntityKind::Amount, "no money here"), None);
    }

    #[test]
    fn stats_count_all_tables() {
        let stats = PatternLibrary::shared().stats();
        assert_eq!(stats.outcome_patterns, 20);
        assert_eq!(stats.causal_patterns, 17);
        assert_eq!(stats.entity_patterns, 6);
    }
}
