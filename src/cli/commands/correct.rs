//! Correct command - run the chunk batch through the Gemini service

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::corrector::{self, CorrectionClient, GeminiCorrector, RetryPolicy};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Arguments for the correct command
#[derive(Args, Debug)]
pub struct CorrectArgs {
    /// Directory containing chunk files (default from config)
    #[arg(long, short = 'i')]
    pub chunks_dir: Option<PathBuf>,

    /// Directory for corrected artifacts (default from config)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Model identifier override
    #[arg(long, short = 'm')]
    pub model: Option<String>,
}

/// Correction batch response
#[derive(Debug, Serialize)]
pub struct CorrectResponse {
    pub chunks_dir: String,
    pub output_dir: String,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub failed_files: Vec<String>,
}

/// Execute the correct command
pub async fn execute(
    args: CorrectArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let chunks_dir = args
        .chunks_dir
        .unwrap_or_else(|| config.artifacts.chunks_dir.clone());
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.artifacts.corrected_dir.clone());

    if !chunks_dir.is_dir() {
        return Err(format!(
            "Chunks directory '{}' not found. Run `quizmill split` first.",
            chunks_dir.display()
        )
        .into());
    }

    let mut correction = config.correction.clone();
    if let Some(model) = args.model {
        correction.model = model;
    }

    let backend = GeminiCorrector::from_config(&correction)?;
    let manifest = corrector::load_manifest(&chunks_dir)?;

    let cancel = Arc::new(AtomicBool::new(false));
    spawn_ctrl_c_handler(Arc::clone(&cancel));

    let client = CorrectionClient::new(
        Box::new(backend),
        RetryPolicy::from(&correction),
        correction.pacing_delay(),
    )
    .with_cancel_flag(cancel);

    if format == OutputFormat::Human {
        eprintln!(
            "Correcting {} chunks from {} with {}...",
            colors::number(&manifest.chunks.len().to_string()),
            colors::file_path(&chunks_dir.display().to_string()),
            colors::label(&correction.model)
        );
    }

    let summary = client
        .process_manifest(&manifest, &chunks_dir, &output_dir)
        .await?;

    let response = CorrectResponse {
        chunks_dir: chunks_dir.display().to_string(),
        output_dir: output_dir.display().to_string(),
        processed: summary.processed,
        successful: summary.successful,
        failed: summary.failed,
        failed_files: summary.failed_files,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}/{} chunks corrected",
                colors::success("Done:"),
                colors::number(&response.successful.to_string()),
                colors::number(&response.processed.to_string())
            );
            if response.failed > 0 {
                println!(
                    "{} {} chunks failed: {}",
                    colors::warning("Warning:"),
                    colors::number(&response.failed.to_string()),
                    response.failed_files.join(", ")
                );
            }
        }
        OutputFormat::Json => {
            crate::cli::output::print_output(&response, format);
        }
    }

    Ok(())
}

/// Flip the cancellation flag on Ctrl-C so the batch stops between
/// chunks instead of mid-write.
fn spawn_ctrl_c_handler(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current chunk");
            cancel.store(true, Ordering::Relaxed);
        }
    });
}
