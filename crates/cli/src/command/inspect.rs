use crate::data;
use anyhow::{bail, Result};
use convo_patterns::PatternLibrary;
use convo_retrieval::Retriever;
use std::path::Path;

/// Show what the pattern library sees in one transcript: classified
/// outcome, causal factors, and extracted entities.
pub fn run(data_flag: Option<&Path>, transcript_id: &str) -> Result<()> {
    let (corpus, source) = data::resolve_corpus(data_flag)?;
    let mut retriever = Retriever::new();
    retriever.load(&corpus);

    let Some(transcript) = retriever.get_transcript(transcript_id) else {
        bail!("Transcript '{transcript_id}' not found in {source}");
    };

    let patterns = PatternLibrary::shared();
    let text = transcript.full_text();
    let (outcome, score) = patterns.classify_outcome(&text);
    let factors = patterns.extract_causal_factors(&text);
    let entities = patterns.extract_entities(&text);
    let stats = patterns.stats();

    println!("Transcript: {}", transcript.transcript_id);
    println!("Domain:     {}", transcript.domain);
    println!("Outcome:    {} (labeled)", transcript.outcome);
    println!("Classified: {outcome} (match ratio {score:.2})");
    println!("Turns:      {}", transcript.turns.len());

    if factors.is_empty() {
        println!("\nNo causal factors matched.");
    } else {
        println!("\nCausal factors:");
        for factor in &factors {
            println!("  - {factor}");
        }
    }

    if !entities.is_empty() {
        println!("\nEntities:");
        for (kind, values) in &entities {
            println!("  {}: {}", kind.as_str(), values.join(", "));
        }
    }

    println!(
        "\nPattern library: {} outcome, {} causal, {} entity patterns",
        stats.outcome_patterns, stats.causal_patterns, stats.entity_patterns
    );
    Ok(())
}
