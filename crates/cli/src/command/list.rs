use crate::{data, report};
use anyhow::Result;
use convo_retrieval::Retriever;
use std::path::Path;

pub fn run(data_flag: Option<&Path>) -> Result<()> {
    let (corpus, source) = data::resolve_corpus(data_flag)?;
    let mut retriever = Retriever::new();
    let loaded = retriever.load(&corpus);

    println!("{loaded} transcripts loaded from {source}\n");
    for transcript in retriever.transcripts() {
        println!("{}", report::format_transcript_summary(transcript));
    }
    Ok(())
}
