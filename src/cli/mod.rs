//! CLI adapter for Quizmill
//!
//! Provides the command-line interface over the pipeline stages.
//! Each subcommand maps to one stage; `run` chains them all.
//!
//! # Architecture
//!
//! ```text
//!        +------------------+
//!        |     core/        |
//!        |  (domain logic)  |
//!        +--------+---------+
//!                 |
//!                 v
//!        +------------------+
//!        |      cli/        |
//!        |  (clap adapter)  |
//!        +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Quizmill - Quiz Data Correction Pipeline
///
/// Splits raw quiz text into chunks, corrects them through an LLM
/// service, merges the results, validates answers and removes
/// duplicate questions.
#[derive(Parser, Debug)]
#[command(name = "quizmill")]
#[command(version)]
#[command(about = "Quiz data correction pipeline", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output for scripting
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Human
    }
}

/// Available CLI commands, in pipeline order
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split raw quiz text into correction-sized chunks
    Split(commands::SplitArgs),

    /// Correct chunk files through the Gemini service
    Correct(commands::CorrectArgs),

    /// Merge corrected chunks into a single corpus
    Merge(commands::MergeArgs),

    /// Validate answers in a merged corpus
    Validate(commands::ValidateArgs),

    /// Find duplicate and near-duplicate questions
    #[command(name = "check-duplicates")]
    CheckDuplicates(commands::DedupArgs),

    /// Run the whole pipeline end to end
    Run(commands::RunArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  quizmill completions bash > ~/.local/share/bash-completion/completions/quizmill
    ///   zsh:   quizmill completions zsh > ~/.zfunc/_quizmill
    ///   fish:  quizmill completions fish > ~/.config/fish/completions/quizmill.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    // Handle completions early (doesn't need config)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Split(args) => commands::split::execute(args, &config, cli.format).await,
        Commands::Correct(args) => commands::correct::execute(args, &config, cli.format).await,
        Commands::Merge(args) => commands::merge::execute(args, &config, cli.format).await,
        Commands::Validate(args) => commands::validate::execute(args, &config, cli.format).await,
        Commands::CheckDuplicates(args) => {
            commands::dedup::execute(args, &config, cli.format).await
        }
        Commands::Run(args) => commands::run::execute(args, &config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
