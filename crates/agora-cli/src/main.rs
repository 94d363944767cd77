//! Agora CLI - run moderated debates between language models
//!
//! # Usage
//!
//! ```bash
//! # Offline run with scripted replies
//! agora run --mock --topic "Remote work beats the office"
//!
//! # Live run against OpenRouter, saving the transcript
//! OPENROUTER_API_KEY=... agora run --topic "Nuclear power is green" --export debate.md
//!
//! # Preview a random model assignment
//! agora assign --seed 7
//!
//! # List the predefined debating styles
//! agora traits
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{assign, run, traits};

/// Agora - moderated debates between language models
///
/// Two teams argue a motion through opening statements, free debate and
/// closing statements; an independent judge panel scores the debate.
#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Agora - moderated multi-model debates",
    long_about = "Agora runs a formal debate between teams of language models.\n\n\
                  A moderator keeps order, debaters argue in a fixed schedule,\n\
                  and judges score the debate without seeing each other's verdicts."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate
    #[command(name = "run")]
    Run(run::RunArgs),

    /// Draw and show a random model assignment
    #[command(name = "assign")]
    Assign(assign::AssignArgs),

    /// List predefined debating styles
    #[command(name = "traits")]
    Traits(traits::TraitsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Assign(args) => assign::run(args),
        Commands::Traits(args) => traits::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
