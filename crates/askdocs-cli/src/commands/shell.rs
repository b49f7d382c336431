//! Shell command - interactive question loop.

use super::{build_client, load_config, load_engine};
use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Runtime;

/// Run the interactive shell. The index and client are loaded once;
/// every non-command line is treated as a question.
pub fn run() -> Result<()> {
    let (paths, config) = load_config()?;
    let client = build_client(&config)?;
    let engine = load_engine(&paths, &config, client)?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    let mut rl = DefaultEditor::new()?;
    let history_path = paths.data_dir.join("shell_history");
    let _ = rl.load_history(&history_path);

    println!("{}", "Askdocs Interactive Shell".cyan().bold());
    println!("{}", "─".repeat(50));
    println!(
        "{} passages indexed. Type a question, {} for commands, {} to leave.",
        engine.index_len(),
        "help".cyan(),
        "exit".cyan()
    );
    println!();

    let mut show_sources = true;

    loop {
        let readline = rl.readline(&format!("{} ", "askdocs>".green().bold()));
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    "help" | "?" => print_help(),
                    "exit" | "quit" | "q" => break,
                    "sources on" => {
                        show_sources = true;
                        println!("Sources shown.");
                    }
                    "sources off" => {
                        show_sources = false;
                        println!("Sources hidden.");
                    }
                    question => match rt.block_on(engine.answer(question)) {
                        Ok(outcome) => {
                            println!();
                            super::ask::print_outcome(&outcome, show_sources);
                        }
                        Err(e) => eprintln!("{} {}", "Error:".red(), e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  {}         Show this help", "help".cyan());
    println!("  {}  Show source passages with answers", "sources on".cyan());
    println!("  {} Hide source passages", "sources off".cyan());
    println!("  {}         Leave the shell", "exit".cyan());
    println!();
    println!("Anything else is asked as a question.");
}
