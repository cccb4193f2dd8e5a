//! Evaluation harness: scores retrieval and causal analysis against a
//! labeled query dataset and combines them into a single weighted score.

use anyhow::{bail, Context, Result};
use convo_analysis::CausalAnalyzer;
use convo_retrieval::Retriever;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// A labeled query: what to ask, plus the domain and cause keywords a good
/// answer should land on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCase {
    pub query_id: String,
    pub query: String,
    #[serde(default)]
    pub expected_domain: String,
    #[serde(default)]
    pub expected_causes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDataset {
    pub queries: Vec<QueryCase>,
}

impl QueryDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read query dataset {}", path.display()))?;
        let dataset: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Query dataset {} is not valid JSON", path.display()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queries.is_empty() {
            bail!("Query dataset contains no queries");
        }
        for case in &self.queries {
            if case.query.trim().is_empty() {
                bail!("Query {} has an empty query string", case.query_id);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    pub total_queries: usize,
    pub successful_retrievals: usize,
    pub retrieval_rate: f64,
    pub domain_accuracy: f64,
    pub avg_retrieval_time_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub total_analyses: usize,
    pub avg_confidence: f64,
    pub avg_factors_found: f64,
    pub avg_evidence_spans: f64,
    pub cause_coverage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallMetrics {
    /// 0.3 retrieval rate + 0.2 domain accuracy + 0.3 avg confidence
    /// + 0.2 cause coverage
    pub combined_score: f64,
    pub total_transcripts: usize,
    pub total_queries_evaluated: usize,
}

/// Per-query line of the report, for drilling into regressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDetail {
    pub query_id: String,
    pub query: String,
    pub retrieved: Option<String>,
    pub expected_domain: String,
    pub actual_domain: Option<String>,
    pub time_ms: f64,
    pub primary_cause: String,
    pub confidence: f64,
    pub factors_count: usize,
    pub evidence_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub timestamp: String,
    pub retrieval: RetrievalMetrics,
    pub analysis: AnalysisMetrics,
    pub overall: OverallMetrics,
    pub details: Vec<QueryDetail>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Run every query in the dataset through retrieval and analysis, collecting
/// the metrics of both stages plus the weighted combined score.
pub fn evaluate(
    retriever: &Retriever,
    analyzer: &mut CausalAnalyzer,
    dataset: &QueryDataset,
    top_k: usize,
) -> EvalReport {
    let mut retrieval = RetrievalMetrics::default();
    let mut analysis = AnalysisMetrics::default();
    let mut details = Vec::with_capacity(dataset.queries.len());

    let mut total_time_ms = 0.0;
    let mut domain_correct = 0usize;
    let mut total_confidence = 0.0;
    let mut total_factors = 0usize;
    let mut total_evidence = 0usize;
    let mut cause_matches = 0.0;

    for case in &dataset.queries {
        let start = Instant::now();
        let retrieved_ids = retriever.retrieve(&case.query, top_k);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        total_time_ms += elapsed_ms;
        retrieval.total_queries += 1;

        let top_hit = retrieved_ids
            .first()
            .and_then(|id| retriever.get_transcript(id));
        if !retrieved_ids.is_empty() {
            retrieval.successful_retrievals += 1;
            if let Some(transcript) = top_hit {
                if !case.expected_domain.is_empty()
                    && transcript
                        .domain
                        .to_lowercase()
                        .contains(&case.expected_domain.to_lowercase())
                {
                    domain_correct += 1;
                }
            }
        }

        let transcripts: Vec<_> = retrieved_ids
            .iter()
            .filter_map(|id| retriever.get_transcript(id))
            .collect();
        let explanation = analyzer.analyze(&case.query, &transcripts);

        analysis.total_analyses += 1;
        total_confidence += explanation.confidence;
        total_factors += explanation.supporting_factors.len();
        total_evidence += explanation.evidence_spans.len();

        if !case.expected_causes.is_empty() {
            let primary_lower = explanation.primary_cause.to_lowercase();
            let matched = case
                .expected_causes
                .iter()
                .filter(|c| primary_lower.contains(&c.to_lowercase()))
                .count();
            cause_matches += matched as f64 / case.expected_causes.len() as f64;
        }

        details.push(QueryDetail {
            query_id: case.query_id.clone(),
            query: case.query.clone(),
            retrieved: retrieved_ids.first().cloned(),
            expected_domain: case.expected_domain.clone(),
            actual_domain: top_hit.map(|t| t.domain.clone()),
            time_ms: round_to(elapsed_ms, 2),
            primary_cause: explanation.primary_cause.clone(),
            confidence: explanation.confidence,
            factors_count: explanation.supporting_factors.len(),
            evidence_count: explanation.evidence_spans.len(),
        });
    }

    if retrieval.total_queries > 0 {
        let n = retrieval.total_queries as f64;
        retrieval.retrieval_rate = retrieval.successful_retrievals as f64 / n;
        retrieval.domain_accuracy = domain_correct as f64 / n;
        retrieval.avg_retrieval_time_ms = round_to(total_time_ms / n, 2);
    }
    if analysis.total_analyses > 0 {
        let n = analysis.total_analyses as f64;
        analysis.avg_confidence = round_to(total_confidence / n, 3);
        analysis.avg_factors_found = round_to(total_factors as f64 / n, 2);
        analysis.avg_evidence_spans = round_to(total_evidence as f64 / n, 2);
        analysis.cause_coverage = round_to(cause_matches / n, 3);
    }

    let overall = OverallMetrics {
        combined_score: round_to(
            retrieval.retrieval_rate * 0.3
                + retrieval.domain_accuracy * 0.2
                + analysis.avg_confidence * 0.3
                + analysis.cause_coverage * 0.2,
            3,
        ),
        total_transcripts: retriever.len(),
        total_queries_evaluated: retrieval.total_queries,
    };

    EvalReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        retrieval,
        analysis,
        overall,
        details,
    }
}
