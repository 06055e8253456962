//! Quizmill CLI - quiz data correction pipeline
//!
//! # Examples
//!
//! ```bash
//! # Split raw text into chunks
//! quizmill split raw_extracted_text.txt
//!
//! # Correct chunks through the Gemini service
//! quizmill correct
//!
//! # Merge, validate and deduplicate
//! quizmill merge
//! quizmill validate --fix
//! quizmill check-duplicates --clean
//!
//! # Or run everything at once
//! quizmill run raw_extracted_text.txt
//! ```

use clap::Parser;
use quizmill::cli::output::print_error;
use quizmill::cli::{run, Cli};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // Keep stdout for command output
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizmill=warn".into()),
        )
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
