//! Askdocs CLI - ask questions about your own documents.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Askdocs - ask questions about your own documents
#[derive(Parser)]
#[command(name = "askdocs")]
#[command(version)]
#[command(about = "Ask questions about your own documents", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize askdocs (create config and data directories)
    Init,

    /// Show configuration and index status
    Status,

    /// Ingest a directory of documents into the index
    Ingest {
        /// Directory containing the documents
        path: String,

        /// Discard any existing index and rebuild from scratch
        #[arg(long)]
        rebuild: bool,
    },

    /// Ask a question about the ingested documents
    Ask {
        /// Your question
        question: String,

        /// Show the source passages the answer was grounded on
        #[arg(short, long, default_value = "true")]
        sources: bool,
    },

    /// Start an interactive question shell
    Shell,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("askdocs=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("askdocs=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Status => commands::status::run(),
        Commands::Ingest { path, rebuild } => commands::ingest::run(&path, rebuild),
        Commands::Ask { question, sources } => commands::ask::run(&question, sources),
        Commands::Shell => commands::shell::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
