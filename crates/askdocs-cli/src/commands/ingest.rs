//! Ingest command - build the index from a documents directory.

use super::{build_client, load_config};
use anyhow::{Context, Result};
use askdocs_engine::IngestPipeline;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub fn run(path: &str, rebuild: bool) -> Result<()> {
    let (paths, config) = load_config()?;
    let client = build_client(&config)?;

    let docs_dir = Path::new(path);
    if !docs_dir.is_dir() {
        anyhow::bail!("Not a directory: {}", docs_dir.display());
    }

    if rebuild && paths.snapshot_file.exists() {
        std::fs::remove_file(&paths.snapshot_file)
            .context("Failed to remove existing index")?;
        println!("{} Removed existing index", "✓".green());
    }

    let rt = Runtime::new().context("Failed to create async runtime")?;

    rt.block_on(client.check_auth())
        .context("API credentials check failed")?;

    let pipeline = IngestPipeline::new(&config, Arc::new(client), paths.snapshot_file.clone())?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Ingesting {}", docs_dir.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let (index, report) = rt.block_on(pipeline.run(docs_dir))?;

    if report.reused_snapshot {
        pb.finish_with_message(format!(
            "{} Existing index reused ({} passages). Use {} to re-index.",
            "Note:".yellow().bold(),
            index.len(),
            "--rebuild".cyan()
        ));
        return Ok(());
    }

    pb.finish_with_message(format!(
        "{} {} passages from {} files",
        "Indexed:".green().bold(),
        report.passage_count,
        report.files_indexed
    ));

    if report.files_skipped > 0 {
        println!(
            "  {} {} of {} files skipped (see warnings above)",
            "!".yellow(),
            report.files_skipped,
            report.files_seen
        );
    }
    println!("  Index: {}", paths.snapshot_file.display());
    println!("  Embedding model: {}", index.embedding_identifier());

    Ok(())
}
