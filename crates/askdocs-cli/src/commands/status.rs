//! Status command - configuration and index overview.

use super::get_paths;
use anyhow::Result;
use askdocs_config::Config;
use askdocs_index::{snapshot_info, IndexError};
use colored::Colorize;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    println!("{}", "Askdocs Status".cyan().bold());
    println!("{}", "─".repeat(50));

    if !paths.is_initialized() {
        println!(
            "{} Not initialized. Run {} first.",
            "!".yellow(),
            "askdocs init".cyan()
        );
        return Ok(());
    }

    let config = Config::load_from(&paths.config_file)?;

    println!("Config: {}", paths.config_file.display());
    println!("  Chat model:      {}", config.openai.chat_model);
    println!("  Embedding model: {}", config.openai.embedding_model);
    println!(
        "  Chunking:        {} chars, {} overlap",
        config.chunking.chunk_size, config.chunking.chunk_overlap
    );
    println!(
        "  Retrieval:       k={} (fallback k={})",
        config.retrieval.k_primary, config.retrieval.k_fallback
    );
    println!();

    match snapshot_info(&paths.snapshot_file) {
        Ok(info) => {
            println!("Index: {}", paths.snapshot_file.display());
            println!("  Passages:        {}", info.record_count);
            println!("  Dimension:       {}", info.dimension);
            println!("  Embedding model: {}", info.embedding_id);
            println!("  Built:           {}", info.built_at.format("%Y-%m-%d %H:%M UTC"));

            if info.embedding_id != config.openai.embedding_model {
                println!(
                    "  {} Embedding model changed since the index was built; run {}",
                    "!".yellow(),
                    "askdocs ingest <path> --rebuild".cyan()
                );
            }
        }
        Err(IndexError::SnapshotMissing(_)) => {
            println!(
                "Index: {} (run {} to build one)",
                "none".dimmed(),
                "askdocs ingest <path>".cyan()
            );
        }
        Err(e) => {
            println!("Index: {} ({})", "unreadable".yellow(), e);
        }
    }

    Ok(())
}
