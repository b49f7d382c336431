//! Ask command - one-shot question answering.

use super::{build_client, load_config, load_engine};
use anyhow::{Context, Result};
use askdocs_core::QueryOutcome;
use colored::Colorize;
use std::path::Path;
use tokio::runtime::Runtime;

pub fn run(question: &str, show_sources: bool) -> Result<()> {
    let (paths, config) = load_config()?;
    let client = build_client(&config)?;
    let engine = load_engine(&paths, &config, client)?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!("{} {}", "Question:".cyan().bold(), question);
    println!("{}", "─".repeat(70));
    println!();

    let outcome = rt
        .block_on(engine.answer(question))
        .context("Failed to answer question")?;

    print_outcome(&outcome, show_sources);
    Ok(())
}

/// Print an answer with its sources. Shared with the shell.
pub fn print_outcome(outcome: &QueryOutcome, show_sources: bool) {
    println!("{}", "Answer:".green().bold());
    println!();
    println!("{}", outcome.answer);
    println!();

    if outcome.used_fallback {
        println!(
            "{}",
            "(answered with a shortened context after the full prompt was rejected)".dimmed()
        );
        println!();
    }

    if show_sources && !outcome.retrieved.is_empty() {
        println!("{}", "─".repeat(70));
        println!("{}", "Sources:".cyan().bold());
        for (i, scored) in outcome.retrieved.iter().enumerate() {
            let name = Path::new(&scored.passage.source_path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| scored.passage.source_path.clone());
            let location = match scored.passage.page_or_row {
                Some(n) => format!(" p.{}", n),
                None => String::new(),
            };
            println!(
                "  {}. {}{} (similarity: {:.0}%)",
                i + 1,
                name.white(),
                location.dimmed(),
                scored.score * 100.0
            );
            println!("     {}", preview(&scored.passage.text).dimmed());
        }
    }
}

/// First line of the passage, shortened for display.
fn preview(text: &str) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut shortened: String = line.chars().take(80).collect();
    if line.chars().count() > 80 {
        shortened.push('…');
    }
    shortened
}
