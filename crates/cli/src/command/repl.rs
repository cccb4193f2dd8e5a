use crate::{data, report};
use anyhow::{Context, Result};
use convo_analysis::CausalAnalyzer;
use convo_retrieval::Retriever;
use std::io::{self, BufRead, Write};
use std::path::Path;

const TOP_K: usize = 3;

/// Interactive loop: one retriever and one analyzer live for the whole
/// session, so analysis history accumulates across queries.
pub fn run(data_flag: Option<&Path>) -> Result<()> {
    let (corpus, source) = data::resolve_corpus(data_flag)?;
    let mut retriever = Retriever::from_env();
    let loaded = retriever.load(&corpus);
    log::info!("Loaded {loaded} transcripts from {source}");
    let mut analyzer = CausalAnalyzer::new();

    println!("Causal analysis console. Type a question, or 'help'.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("query> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("Commands:");
                println!("  <question>   analyze the question against the corpus");
                println!("  list         show loaded transcripts");
                println!("  quit, exit   leave the console");
                println!("Example questions:");
                println!("  Why did the conversation escalate to a supervisor?");
                println!("  What caused the fraud alert?");
                println!("  Why was the package not delivered?");
            }
            "list" => {
                for transcript in retriever.transcripts() {
                    println!("{}", report::format_transcript_summary(transcript));
                }
            }
            query => {
                let retrieved_ids = retriever.retrieve(query, TOP_K);
                let transcripts: Vec<_> = retrieved_ids
                    .iter()
                    .filter_map(|id| retriever.get_transcript(id))
                    .collect();
                let explanation = analyzer.analyze(query, &transcripts);
                println!("{}", report::format_explanation(&explanation));
            }
        }
    }

    println!("Bye.");
    Ok(())
}
