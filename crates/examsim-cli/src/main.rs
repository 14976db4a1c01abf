//! examsim CLI: take timed multiple-choice practice exams in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "examsim", version, about = "Timed multiple-choice exam simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam
    Take {
        /// Question bank: a JSON file path or an http(s) URL
        #[arg(long)]
        bank: Option<String>,

        /// Number of questions to draw
        #[arg(long)]
        count: Option<usize>,

        /// Time limit in seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Seed for reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all, none
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank for problems
    Validate {
        /// Path to the question bank JSON file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Print a saved exam summary
    Show {
        /// Summary JSON written by `take`
        #[arg(long)]
        summary: PathBuf,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter config and sample question bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("examsim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            count,
            duration,
            seed,
            output,
            format,
            config,
        } => {
            let overrides = commands::take::Overrides {
                bank,
                count,
                duration,
                seed,
                output,
            };
            commands::take::execute(overrides, format, config).await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Show { summary, format } => commands::show::execute(summary, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
