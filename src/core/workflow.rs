//! End-to-end pipeline orchestration.
//!
//! Stages run in a fixed order and are success-gated: the first
//! failing stage aborts the run with its name in the error. Later
//! stages prefer the most-processed artifact available, so a run
//! without placeholder repairs or duplicate removal still finalizes
//! on the merged corpus.

use crate::core::config::Config;
use crate::core::corrector::{self, CorrectionClient, Corrector, RetryPolicy};
use crate::core::dedup::DuplicateDetector;
use crate::core::error::{QuizmillError, Result};
use crate::core::merger::ChunkMerger;
use crate::core::splitter::ChunkSplitter;
use crate::core::types::CorrectionSummary;
use crate::core::validator::{AnswerValidator, IssueCategory};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Split,
    Correct,
    Merge,
    Validate,
    Deduplicate,
    Finalize,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Split => "split",
            Stage::Correct => "correct",
            Stage::Merge => "merge",
            Stage::Validate => "validate",
            Stage::Deduplicate => "deduplicate",
            Stage::Finalize => "finalize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final result of a complete pipeline run
#[derive(Debug)]
pub struct WorkflowOutcome {
    /// The recommended output file (most-processed variant)
    pub final_file: PathBuf,

    /// Blank-line-separated pair count in the final file
    pub total_questions: usize,

    pub correction: CorrectionSummary,

    /// Questions flagged with at least one issue during validation
    pub validation_issues: usize,

    pub exact_duplicate_groups: usize,
}

/// Runs the pipeline stages against a working directory.
pub struct WorkflowOrchestrator {
    config: Config,
    work_dir: PathBuf,
    cancel: Arc<AtomicBool>,
}

impl WorkflowOrchestrator {
    pub fn new(config: Config, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            work_dir: work_dir.into(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked between corrected chunks; setting it stops the
    /// correction batch cleanly.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn chunks_dir(&self) -> PathBuf {
        self.work_dir.join(&self.config.artifacts.chunks_dir)
    }

    fn corrected_dir(&self) -> PathBuf {
        self.work_dir.join(&self.config.artifacts.corrected_dir)
    }

    fn merged_file(&self) -> PathBuf {
        self.work_dir.join(&self.config.artifacts.merged_file)
    }

    /// Run all stages against the raw extracted text in `input_file`.
    pub async fn run(
        &self,
        input_file: &Path,
        corrector: Box<dyn Corrector>,
    ) -> Result<WorkflowOutcome> {
        let content = self.extract(input_file).map_err(stage(Stage::Extract))?;

        let manifest_len = self.split(&content, input_file).map_err(stage(Stage::Split))?;
        tracing::info!(chunks = manifest_len, "Split stage complete");

        let correction = self
            .correct(corrector)
            .await
            .map_err(stage(Stage::Correct))?;

        self.merge().map_err(stage(Stage::Merge))?;

        let validation_issues = self.validate().map_err(stage(Stage::Validate))?;

        let exact_duplicate_groups = self.deduplicate().map_err(stage(Stage::Deduplicate))?;

        let (final_file, total_questions) = self.finalize().map_err(stage(Stage::Finalize))?;

        tracing::info!(
            final_file = %final_file.display(),
            total_questions,
            "Workflow complete"
        );

        Ok(WorkflowOutcome {
            final_file,
            total_questions,
            correction,
            validation_issues,
            exact_duplicate_groups,
        })
    }

    /// Load the raw line-oriented text produced by the external
    /// extraction tool.
    fn extract(&self, input_file: &Path) -> Result<String> {
        if !input_file.is_file() {
            return Err(QuizmillError::InvalidInput(format!(
                "Input file not found: {}",
                input_file.display()
            )));
        }
        let content = fs::read_to_string(input_file)?;
        if content.trim().is_empty() {
            return Err(QuizmillError::InvalidInput(format!(
                "Input file is empty: {}",
                input_file.display()
            )));
        }
        Ok(content)
    }

    fn split(&self, content: &str, input_file: &Path) -> Result<usize> {
        let splitter = ChunkSplitter::new(self.config.chunking.questions_per_chunk);
        let source = input_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_file.display().to_string());
        let manifest = splitter.write_chunks(content, &source, &self.chunks_dir())?;

        if manifest.chunks.is_empty() {
            return Err(QuizmillError::InvalidInput(
                "Input produced zero chunks".to_string(),
            ));
        }
        Ok(manifest.chunks.len())
    }

    async fn correct(&self, backend: Box<dyn Corrector>) -> Result<CorrectionSummary> {
        let manifest = corrector::load_manifest(&self.chunks_dir())?;
        let client = CorrectionClient::new(
            backend,
            RetryPolicy::from(&self.config.correction),
            self.config.correction.pacing_delay(),
        )
        .with_cancel_flag(Arc::clone(&self.cancel));

        client
            .process_manifest(&manifest, &self.chunks_dir(), &self.corrected_dir())
            .await
    }

    fn merge(&self) -> Result<()> {
        ChunkMerger::new().merge(&self.corrected_dir(), &self.merged_file())?;
        Ok(())
    }

    /// Validate the merged corpus, persisting the issue report and
    /// repairing placeholder options when any were found.
    fn validate(&self) -> Result<usize> {
        let merged = self.merged_file();
        let content = fs::read_to_string(&merged)?;
        let base = file_name(&merged);

        let validator = AnswerValidator::new();
        let report = validator.generate_report(&content, &base);
        validator.save_report(&report, &self.work_dir.join(report_name("answer_check_report", &base)))?;

        let placeholder_count = report.category_count(IssueCategory::PlaceholderOption);
        if placeholder_count > 0 {
            tracing::info!(placeholder_count, "Repairing placeholder options");
            let repaired = validator.fix_placeholder_options(&content);
            let fixed_path = self.work_dir.join(format!("fixed_placeholder_options_{base}"));
            fs::write(&fixed_path, repaired.fixed_content)?;
            tracing::info!(
                removed = repaired.removed_options,
                path = %fixed_path.display(),
                "Wrote repaired corpus"
            );
        }

        Ok(report.questions_with_issues)
    }

    /// Duplicate-check the most-processed corpus available: the
    /// repaired file when validation produced one, the merged base
    /// otherwise.
    fn deduplicate(&self) -> Result<usize> {
        let merged = self.merged_file();
        let base = file_name(&merged);
        let fixed_path = self.work_dir.join(format!("fixed_placeholder_options_{base}"));
        let input_path = if fixed_path.is_file() {
            fixed_path
        } else {
            merged
        };

        let content = fs::read_to_string(&input_path)?;
        let input_name = file_name(&input_path);

        let detector = DuplicateDetector::new(self.config.dedup.similarity_threshold);
        let report = detector.generate_report(&content, &input_name);
        detector.save_report(
            &report,
            &self.work_dir.join(report_name("duplicate_report", &input_name)),
        )?;

        if report.exact_duplicates.count > 0 {
            let outcome = detector.cleaned_corpus(&content);
            let cleaned_path = self.work_dir.join(format!("cleaned_{input_name}"));
            fs::write(&cleaned_path, outcome.cleaned_content)?;
            tracing::info!(
                removed = outcome.removed,
                path = %cleaned_path.display(),
                "Wrote deduplicated corpus"
            );
        }

        Ok(report.exact_duplicates.count)
    }

    /// Pick the most-processed artifact as the final output.
    fn finalize(&self) -> Result<(PathBuf, usize)> {
        let base = file_name(&self.merged_file());
        let candidates = [
            format!("cleaned_fixed_placeholder_options_{base}"),
            format!("cleaned_{base}"),
            format!("fixed_placeholder_options_{base}"),
            base,
        ];

        for candidate in &candidates {
            let path = self.work_dir.join(candidate);
            if path.is_file() {
                let content = fs::read_to_string(&path)?;
                let pairs = content
                    .split("\n\n")
                    .filter(|p| !p.trim().is_empty())
                    .count();
                return Ok((path, pairs));
            }
        }

        Err(QuizmillError::InvalidInput(
            "No output file produced by earlier stages".to_string(),
        ))
    }
}

fn stage(stage: Stage) -> impl FnOnce(QuizmillError) -> QuizmillError {
    move |e| match e {
        already @ QuizmillError::StageFailed { .. } => already,
        other => QuizmillError::StageFailed {
            stage: stage.name().to_string(),
            reason: other.to_string(),
        },
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<prefix>_<stem>.json`, matching artifacts like
/// `answer_check_report_final_corrected_quiz_data.json`
fn report_name(prefix: &str, base: &str) -> String {
    let stem = Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.to_string());
    format!("{prefix}_{stem}.json")
}
