//! Split command - chunk raw quiz text for correction

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::splitter::ChunkSplitter;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Raw extracted text file to split
    pub input: PathBuf,

    /// Directory for chunk artifacts (default from config)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Target questions per chunk
    #[arg(long, short = 's')]
    pub questions_per_chunk: Option<usize>,
}

/// Split result response
#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub input: String,
    pub output_dir: String,
    pub chunks_created: usize,
    pub total_lines: usize,
    pub lines_per_question: usize,
    pub lines_per_chunk: usize,
}

/// Execute the split command
pub async fn execute(
    args: SplitArgs,
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

    let content = fs::read_to_string(&args.input)?;
    if content.trim().is_empty() {
        return Err(format!("Input file '{}' is empty.", args.input.display()).into());
    }

    let questions_per_chunk = args
        .questions_per_chunk
        .unwrap_or(config.chunking.questions_per_chunk);
    if questions_per_chunk == 0 {
        return Err("questions-per-chunk must be greater than zero.".into());
    }

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.artifacts.chunks_dir.clone());

    let source = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    let splitter = ChunkSplitter::new(questions_per_chunk);
    let manifest = splitter.write_chunks(&content, &source, &output_dir)?;

    let response = SplitResponse {
        input: args.input.display().to_string(),
        output_dir: output_dir.display().to_string(),
        chunks_created: manifest.chunks.len(),
        total_lines: manifest.total_lines,
        lines_per_question: manifest.lines_per_question,
        lines_per_chunk: manifest.lines_per_chunk,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} chunks into {}",
                colors::success("Split"),
                colors::number(&response.chunks_created.to_string()),
                colors::file_path(&response.output_dir)
            );
            println!(
                "{} lines total, {} lines per chunk (~{} per question)",
                colors::number(&response.total_lines.to_string()),
                colors::number(&response.lines_per_chunk.to_string()),
                colors::number(&response.lines_per_question.to_string())
            );
        }
        OutputFormat::Json => {
            crate::cli::output::print_output(&response, format);
        }
    }

    Ok(())
}
