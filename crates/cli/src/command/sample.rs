use crate::data;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn run(output: &Path) -> Result<()> {
    let corpus = data::sample_corpus();
    let rendered =
        serde_json::to_string_pretty(&corpus).context("Failed to serialize sample corpus")?;
    fs::write(output, rendered)
        .with_context(|| format!("Failed to write sample corpus to {}", output.display()))?;
    println!("Sample corpus written to {}", output.display());
    Ok(())
}
