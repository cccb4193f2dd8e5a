use crate::data;
use crate::eval::{evaluate, EvalReport, QueryDataset};
use anyhow::{bail, Context, Result};
use convo_analysis::CausalAnalyzer;
use convo_retrieval::Retriever;
use std::fs;
use std::path::Path;

pub fn run(
    data_flag: Option<&Path>,
    dataset_path: &Path,
    output: Option<&Path>,
    top_k: usize,
    json: bool,
) -> Result<()> {
    let (corpus, source) = data::resolve_corpus(data_flag)?;
    let mut retriever = Retriever::from_env();
    let loaded = retriever.load(&corpus);
    log::info!("Loaded {loaded} transcripts from {source}");
    if retriever.is_empty() {
        bail!("Corpus {source} contains no usable transcripts");
    }

    let dataset = QueryDataset::load(dataset_path)?;
    let mut analyzer = CausalAnalyzer::new();
    let report = evaluate(&retriever, &mut analyzer, &dataset, top_k);

    if let Some(path) = output {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &EvalReport) {
    println!("Retrieval");
    println!("  Total queries:        {}", report.retrieval.total_queries);
    println!(
        "  Successful:           {}",
        report.retrieval.successful_retrievals
    );
    println!(
        "  Retrieval rate:       {:.1}%",
        report.retrieval.retrieval_rate * 100.0
    );
    println!(
        "  Domain accuracy:      {:.1}%",
        report.retrieval.domain_accuracy * 100.0
    );
    println!(
        "  Avg retrieval time:   {:.2}ms",
        report.retrieval.avg_retrieval_time_ms
    );
    println!("Analysis");
    println!("  Total analyses:       {}", report.analysis.total_analyses);
    println!(
        "  Avg confidence:       {:.1}%",
        report.analysis.avg_confidence * 100.0
    );
    println!(
        "  Avg factors found:    {:.1}",
        report.analysis.avg_factors_found
    );
    println!(
        "  Avg evidence spans:   {:.1}",
        report.analysis.avg_evidence_spans
    );
    println!(
        "  Cause coverage:       {:.1}%",
        report.analysis.cause_coverage * 100.0
    );
    println!("Overall");
    println!(
        "  Combined score:       {:.1}%",
        report.overall.combined_score * 100.0
    );
    println!(
        "  Transcripts loaded:   {}",
        report.overall.total_transcripts
    );
    println!(
        "  Queries evaluated:    {}",
        report.overall.total_queries_evaluated
    );
}
