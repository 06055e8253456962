//! Check-duplicates command - find duplicate and similar questions

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::dedup::DuplicateDetector;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the check-duplicates command
#[derive(Args, Debug)]
pub struct DedupArgs {
    /// Corpus file to check (default: configured merged file)
    pub file: Option<PathBuf>,

    /// Similarity threshold for near-duplicates (0.0-1.0, inclusive)
    #[arg(long, short = 't')]
    pub threshold: Option<f64>,

    /// Where to write the JSON report (default: duplicate_report_<stem>.json)
    #[arg(long, short = 'r')]
    pub report: Option<PathBuf>,

    /// Write a corpus without exact duplicates to cleaned_<file>
    #[arg(long, short = 'c')]
    pub clean: bool,
}

/// Duplicate check response
#[derive(Debug, Serialize)]
pub struct DedupResponse {
    pub file: String,
    pub report: String,
    pub total_questions: usize,
    pub similarity_threshold: f64,
    pub exact_duplicate_groups: usize,
    pub similar_question_groups: usize,
    pub answer_inconsistencies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_file: Option<String>,
}

/// Execute the check-duplicates command
pub async fn execute(
    args: DedupArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = args
        .file
        .unwrap_or_else(|| config.artifacts.merged_file.clone());

    if !file.is_file() {
        return Err(format!(
            "File '{}' not found. Run `quizmill merge` first or pass a corpus file.",
            file.display()
        )
        .into());
    }

    let threshold = args.threshold.unwrap_or(config.dedup.similarity_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(format!("Threshold {threshold} is out of range. Valid range is 0.0-1.0.").into());
    }

    let content = fs::read_to_string(&file)?;
    let base = base_name(&file);

    let detector = DuplicateDetector::new(threshold);
    let report = detector.generate_report(&content, &base);

    let report_path = args.report.unwrap_or_else(|| {
        let stem = Path::new(&base)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| base.clone());
        PathBuf::from(format!("duplicate_report_{stem}.json"))
    });
    detector.save_report(&report, &report_path)?;

    let cleaned_file = if args.clean && report.exact_duplicates.count > 0 {
        let outcome = detector.cleaned_corpus(&content);
        let cleaned_path = PathBuf::from(format!("cleaned_{base}"));
        fs::write(&cleaned_path, outcome.cleaned_content)?;
        Some(cleaned_path.display().to_string())
    } else {
        None
    };

    let response = DedupResponse {
        file: file.display().to_string(),
        report: report_path.display().to_string(),
        total_questions: report.total_questions,
        similarity_threshold: threshold,
        exact_duplicate_groups: report.exact_duplicates.count,
        similar_question_groups: report.similar_questions.count,
        answer_inconsistencies: report.answer_inconsistencies.count,
        cleaned_file,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} questions checked (threshold {})",
                colors::success("Done:"),
                colors::number(&response.total_questions.to_string()),
                colors::number(&threshold.to_string())
            );
            if response.exact_duplicate_groups > 0 {
                println!(
                    "{} {} exact duplicate groups",
                    colors::warning("Warning:"),
                    colors::number(&response.exact_duplicate_groups.to_string())
                );
            }
            if response.similar_question_groups > 0 {
                println!(
                    "{} {} similar question groups",
                    colors::warning("Warning:"),
                    colors::number(&response.similar_question_groups.to_string())
                );
            }
            if response.answer_inconsistencies > 0 {
                println!(
                    "{} {} groups disagree on the answer",
                    colors::warning("Warning:"),
                    colors::number(&response.answer_inconsistencies.to_string())
                );
            }
            if let Some(cleaned) = &response.cleaned_file {
                println!("Cleaned corpus written to {}", colors::file_path(cleaned));
            }
            println!("Full report: {}", colors::file_path(&response.report));
        }
        OutputFormat::Json => {
            crate::cli::output::print_output(&response, format);
        }
    }

    Ok(())
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
