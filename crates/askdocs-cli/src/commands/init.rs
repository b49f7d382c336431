//! Initialize askdocs.

use super::get_paths;
use anyhow::{Context, Result};
use askdocs_config::Config;
use colored::Colorize;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} Askdocs is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Data: {}", paths.data_dir.display());
        return Ok(());
    }

    println!("{}", "Initializing askdocs...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    Config::create_default_file(&paths.config_file)
        .context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    println!();
    println!("{}", "Askdocs initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Export your API key: {}", "export OPENAI_API_KEY=sk-...".cyan());
    println!("  2. Ingest your documents: {}", "askdocs ingest ~/Documents/notes".cyan());
    println!("  3. Ask a question: {}", "askdocs ask \"what do my notes say about X?\"".cyan());

    Ok(())
}
