//! Validate command - check answers in a merged corpus

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::validator::{AnswerValidator, IssueCategory};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Corpus file to validate (default: configured merged file)
    pub file: Option<PathBuf>,

    /// Where to write the JSON report (default: answer_check_report_<stem>.json)
    #[arg(long, short = 'r')]
    pub report: Option<PathBuf>,

    /// Repair placeholder options into fixed_placeholder_options_<file>
    #[arg(long, short = 'f')]
    pub fix: bool,

    /// Write records with missing answers to this file for manual review
    #[arg(long)]
    pub missing_answers: Option<PathBuf>,
}

/// Validation result response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub file: String,
    pub report: String,
    pub total_questions: usize,
    pub questions_without_issues: usize,
    pub questions_with_issues: usize,
    pub placeholder_options: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_answers_file: Option<String>,
}

/// Execute the validate command
pub async fn execute(
    args: ValidateArgs,
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

    let content = fs::read_to_string(&file)?;
    let base = base_name(&file);

    let validator = AnswerValidator::new();
    let report = validator.generate_report(&content, &base);

    let report_path = args.report.unwrap_or_else(|| {
        let stem = Path::new(&base)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| base.clone());
        PathBuf::from(format!("answer_check_report_{stem}.json"))
    });
    validator.save_report(&report, &report_path)?;

    let placeholder_options = report.category_count(IssueCategory::PlaceholderOption);

    let fixed_file = if args.fix && placeholder_options > 0 {
        let outcome = validator.fix_placeholder_options(&content);
        let fixed_path = PathBuf::from(format!("fixed_placeholder_options_{base}"));
        fs::write(&fixed_path, outcome.fixed_content)?;
        Some(fixed_path.display().to_string())
    } else {
        None
    };

    let missing_answers_file = match &args.missing_answers {
        Some(path) => match validator.missing_answers_text(&content) {
            Some(text) => {
                fs::write(path, text)?;
                Some(path.display().to_string())
            }
            None => None,
        },
        None => None,
    };

    let response = ValidateResponse {
        file: file.display().to_string(),
        report: report_path.display().to_string(),
        total_questions: report.total_questions,
        questions_without_issues: report.questions_without_issues,
        questions_with_issues: report.questions_with_issues,
        placeholder_options,
        fixed_file,
        missing_answers_file,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}/{} questions OK",
                colors::success("Validated:"),
                colors::number(&response.questions_without_issues.to_string()),
                colors::number(&response.total_questions.to_string())
            );
            if response.questions_with_issues > 0 {
                println!(
                    "{} {} questions with issues (details in {})",
                    colors::warning("Warning:"),
                    colors::number(&response.questions_with_issues.to_string()),
                    colors::file_path(&response.report)
                );
            } else {
                crate::cli::output::print_success("No issues found");
            }
            if let Some(fixed) = &response.fixed_file {
                println!(
                    "Repaired {} placeholder options into {}",
                    colors::number(&response.placeholder_options.to_string()),
                    colors::file_path(fixed)
                );
            }
            if let Some(missing) = &response.missing_answers_file {
                println!(
                    "Records missing answers written to {}",
                    colors::file_path(missing)
                );
            }
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
