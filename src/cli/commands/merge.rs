//! Merge command - combine corrected chunks into one corpus

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::merger::ChunkMerger;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory containing corrected chunks (default from config)
    #[arg(long, short = 'i')]
    pub corrected_dir: Option<PathBuf>,

    /// Merged output file (default from config)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Merge result response
#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub output: String,
    pub files_merged: Vec<String>,
    pub pair_count: usize,
    pub broadened_discovery: bool,
}

/// Execute the merge command
pub async fn execute(
    args: MergeArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let corrected_dir = args
        .corrected_dir
        .unwrap_or_else(|| config.artifacts.corrected_dir.clone());
    let output = args
        .output
        .unwrap_or_else(|| config.artifacts.merged_file.clone());

    let outcome = ChunkMerger::new().merge(&corrected_dir, &output)?;

    let response = MergeResponse {
        output: output.display().to_string(),
        files_merged: outcome.files_merged,
        pair_count: outcome.pair_count,
        broadened_discovery: outcome.broadened_discovery,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} files ({} QA pairs) into {}",
                colors::success("Merged"),
                colors::number(&response.files_merged.len().to_string()),
                colors::number(&response.pair_count.to_string()),
                colors::file_path(&response.output)
            );
            if response.broadened_discovery {
                crate::cli::output::print_warning(
                    "No files matched the standard naming convention; broadened discovery was used",
                );
            }
        }
        OutputFormat::Json => {
            crate::cli::output::print_output(&response, format);
        }
    }

    Ok(())
}
