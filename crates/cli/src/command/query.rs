use crate::{data, report};
use anyhow::{bail, Context, Result};
use convo_analysis::CausalAnalyzer;
use convo_retrieval::Retriever;
use std::path::Path;

pub fn run(data_flag: Option<&Path>, text: &str, top_k: usize, json: bool) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Query text is empty");
    }

    let (corpus, source) = data::resolve_corpus(data_flag)?;
    let mut retriever = Retriever::from_env();
    let loaded = retriever.load(&corpus);
    log::info!("Loaded {loaded} transcripts from {source}");
    if retriever.is_empty() {
        bail!("Corpus {source} contains no usable transcripts");
    }

    let retrieved_ids = retriever.retrieve(text, top_k);
    log::debug!("Retrieved: {retrieved_ids:?}");

    let transcripts: Vec<_> = retrieved_ids
        .iter()
        .filter_map(|id| retriever.get_transcript(id))
        .collect();
    let mut analyzer = CausalAnalyzer::new();
    let explanation = analyzer.analyze(text, &transcripts);

    if json {
        let rendered =
            serde_json::to_string_pretty(&explanation).context("Failed to serialize explanation")?;
        println!("{rendered}");
    } else {
        println!("{}", report::format_explanation(&explanation));
    }
    Ok(())
}
