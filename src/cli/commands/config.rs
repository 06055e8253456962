//! Show-config command - display the effective configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub chunking: &'a crate::core::config::ChunkingConfig,
    pub correction: &'a crate::core::config::CorrectionConfig,
    pub dedup: &'a crate::core::config::DedupConfig,
    pub artifacts: &'a crate::core::config::ArtifactsConfig,
}

/// Execute the show-config command
pub async fn execute(
    _args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        chunking: &config.chunking,
        correction: &config.correction,
        dedup: &config.dedup,
        artifacts: &config.artifacts,
    };

    match format {
        OutputFormat::Human => {
            crate::cli::output::print_header("Configuration:");
            println!("  chunking:");
            println!(
                "    questions_per_chunk: {}",
                config.chunking.questions_per_chunk
            );
            println!("  correction:");
            println!("    model: {}", config.correction.model);
            println!("    max_attempts: {}", config.correction.max_attempts);
            println!("    retry_delay_secs: {}", config.correction.retry_delay_secs);
            println!(
                "    pacing_delay_secs: {}",
                config.correction.pacing_delay_secs
            );
            println!("    api_key_env: {}", config.correction.api_key_env);
            println!("  dedup:");
            println!(
                "    similarity_threshold: {}",
                config.dedup.similarity_threshold
            );
            println!("  artifacts:");
            println!(
                "    chunks_dir: {}",
                config.artifacts.chunks_dir.display()
            );
            println!(
                "    corrected_dir: {}",
                config.artifacts.corrected_dir.display()
            );
            println!(
                "    merged_file: {}",
                config.artifacts.merged_file.display()
            );
        }
        OutputFormat::Json => {
            crate::cli::output::print_output(&response, format);
        }
    }

    Ok(())
}
