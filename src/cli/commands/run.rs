//! Run command - execute the full pipeline end to end

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::corrector::GeminiCorrector;
use crate::core::workflow::WorkflowOrchestrator;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Raw extracted text file to process
    pub input: PathBuf,

    /// Working directory for all pipeline artifacts
    #[arg(long, short = 'w', default_value = ".")]
    pub work_dir: PathBuf,
}

/// Full pipeline response
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub input: String,
    pub final_file: String,
    pub total_questions: usize,
    pub chunks_corrected: usize,
    pub chunks_failed: usize,
    pub validation_issues: usize,
    pub exact_duplicate_groups: usize,
    pub duration_secs: f64,
}

/// Execute the run command
pub async fn execute(
    args: RunArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.is_file() {
        return Err(format!(
            "Input file '{}' not found. Provide the raw extracted text file.",
            args.input.display()
        )
        .into());
    }

    let backend = GeminiCorrector::from_config(&config.correction)?;
    let orchestrator = WorkflowOrchestrator::new(config.clone(), &args.work_dir);

    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current chunk");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    if format == OutputFormat::Human {
        eprintln!(
            "{} {} (artifacts in {})",
            colors::stage("Processing"),
            colors::file_path(&args.input.display().to_string()),
            colors::file_path(&args.work_dir.display().to_string())
        );
    }

    let start = Instant::now();
    let outcome = orchestrator.run(&args.input, Box::new(backend)).await?;
    let duration_secs = start.elapsed().as_secs_f64();

    let response = RunResponse {
        input: args.input.display().to_string(),
        final_file: outcome.final_file.display().to_string(),
        total_questions: outcome.total_questions,
        chunks_corrected: outcome.correction.successful,
        chunks_failed: outcome.correction.failed,
        validation_issues: outcome.validation_issues,
        exact_duplicate_groups: outcome.exact_duplicate_groups,
        duration_secs,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} questions in {}",
                colors::success("Pipeline complete:"),
                colors::number(&response.total_questions.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            println!("Final file: {}", colors::file_path(&response.final_file));
            if response.chunks_failed > 0 {
                println!(
                    "{} {} chunks failed correction",
                    colors::warning("Warning:"),
                    colors::number(&response.chunks_failed.to_string())
                );
            }
            if response.validation_issues > 0 {
                println!(
                    "{} {} questions flagged during validation",
                    colors::warning("Warning:"),
                    colors::number(&response.validation_issues.to_string())
                );
            }
        }
        OutputFormat::Json => {
            crate::cli::output::print_output(&response, format);
        }
    }

    Ok(())
}
