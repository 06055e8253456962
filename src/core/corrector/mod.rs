//! Chunk correction stage: retrying client and sequential batch runner.
//!
//! The correction backend sits behind the [`Corrector`] trait so the
//! batch runner can be exercised with an in-process fake. Delays go
//! through the [`Sleep`] trait for the same reason. Chunks are
//! processed strictly sequentially; a chunk that still fails after
//! retries is recorded and the run continues.

pub mod gemini;

pub use gemini::GeminiCorrector;

use crate::core::config::CorrectionConfig;
use crate::core::error::{QuizmillError, Result};
use crate::core::types::{
    ChunkManifest, CorrectionOutcome, CorrectionStatus, CorrectionSummary, ManifestEntry,
    CORRECTED_PREFIX, QUIZ_CHUNK_PREFIX, RAW_CHUNK_PREFIX,
};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// File name of the persisted batch summary
pub const CORRECTION_SUMMARY_FILE: &str = "correction_summary.json";

/// A text-correction backend.
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Correct one chunk of quiz text, returning the corrected text.
    async fn correct(&self, chunk_text: &str) -> Result<String>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}

/// Async delay seam, so retry and pacing behavior is testable
/// without real waiting.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the Tokio timer
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// No-op sleeper for tests
pub struct NoopSleep;

#[async_trait]
impl Sleep for NoopSleep {
    async fn sleep(&self, _duration: Duration) {}
}

/// Retry behavior for a single chunk
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per chunk, including the first
    pub max_attempts: usize,

    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl From<&CorrectionConfig> for RetryPolicy {
    fn from(config: &CorrectionConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay(),
        }
    }
}

/// Drives the correction of a chunk batch through a [`Corrector`].
pub struct CorrectionClient {
    corrector: Box<dyn Corrector>,
    sleep: Box<dyn Sleep>,
    retry: RetryPolicy,
    pacing_delay: Duration,
    cancel: Arc<AtomicBool>,
}

impl CorrectionClient {
    pub fn new(corrector: Box<dyn Corrector>, retry: RetryPolicy, pacing_delay: Duration) -> Self {
        Self {
            corrector,
            sleep: Box::new(TokioSleep),
            retry,
            pacing_delay,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the sleeper (tests pass [`NoopSleep`]).
    pub fn with_sleep(mut self, sleep: Box<dyn Sleep>) -> Self {
        self.sleep = sleep;
        self
    }

    /// Share a cancellation flag; the batch loop checks it between
    /// chunks and stops cleanly when it is set.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Correct a single chunk, retrying per policy. The retry delay
    /// applies between attempts only.
    pub async fn correct_with_retry(&self, chunk_name: &str, chunk_text: &str) -> Result<String> {
        let mut last_reason = String::new();

        for attempt in 1..=self.retry.max_attempts {
            match self.corrector.correct(chunk_text).await {
                Ok(corrected) => {
                    tracing::debug!(chunk = chunk_name, attempt, "Chunk corrected");
                    return Ok(corrected);
                }
                Err(e) => {
                    last_reason = e.to_string();
                    tracing::warn!(
                        chunk = chunk_name,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %e,
                        "Correction attempt failed"
                    );
                    if attempt < self.retry.max_attempts {
                        self.sleep.sleep(self.retry.retry_delay).await;
                    }
                }
            }
        }

        Err(QuizmillError::CorrectionFailed {
            chunk: chunk_name.to_string(),
            reason: last_reason,
        })
    }

    /// Process every chunk named by the manifest, writing
    /// `corrected_<chunk>` artifacts into `output_dir` and a summary
    /// JSON alongside them.
    ///
    /// Empty chunk files are skipped with a warning. Failed chunks are
    /// recorded in the summary and processing continues. The pacing
    /// delay runs between chunks, never after the last one.
    pub async fn process_manifest(
        &self,
        manifest: &ChunkManifest,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<CorrectionSummary> {
        fs::create_dir_all(output_dir)?;

        let files = manifest.file_names();
        let total = files.len();
        let mut outcomes: Vec<CorrectionOutcome> = Vec::new();

        tracing::info!(
            chunks = total,
            backend = self.corrector.name(),
            "Starting correction batch"
        );

        for (i, chunk_file) in files.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::warn!(
                    completed = outcomes.len(),
                    remaining = total - i,
                    "Cancellation requested, stopping correction batch"
                );
                break;
            }

            let chunk_text = fs::read_to_string(input_dir.join(chunk_file))?;
            let chunk_text = chunk_text.trim();
            if chunk_text.is_empty() {
                tracing::warn!(chunk = %chunk_file, "Chunk file is empty, skipping");
                continue;
            }

            tracing::info!(chunk = %chunk_file, position = i + 1, total, "Correcting chunk");

            let outcome = match self.correct_with_retry(chunk_file, chunk_text).await {
                Ok(corrected) => {
                    let output_path = output_dir.join(format!("{CORRECTED_PREFIX}{chunk_file}"));
                    fs::write(&output_path, corrected)?;
                    CorrectionOutcome {
                        chunk: chunk_file.clone(),
                        status: CorrectionStatus::Success,
                        failure_reason: None,
                    }
                }
                Err(e) => {
                    tracing::error!(chunk = %chunk_file, error = %e, "Chunk failed after retries");
                    CorrectionOutcome {
                        chunk: chunk_file.clone(),
                        status: CorrectionStatus::Failed,
                        failure_reason: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);

            if i + 1 < total {
                self.sleep.sleep(self.pacing_delay).await;
            }
        }

        let summary = summarize(&outcomes);

        let summary_path = output_dir.join(CORRECTION_SUMMARY_FILE);
        fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

        tracing::info!(
            processed = summary.processed,
            successful = summary.successful,
            failed = summary.failed,
            "Correction batch complete"
        );

        Ok(summary)
    }
}

/// Fold per-chunk outcomes into the persisted batch summary.
fn summarize(outcomes: &[CorrectionOutcome]) -> CorrectionSummary {
    let mut summary = CorrectionSummary::default();
    for outcome in outcomes {
        summary.processed += 1;
        match outcome.status {
            CorrectionStatus::Success => summary.successful += 1,
            CorrectionStatus::Failed => {
                summary.failed += 1;
                summary.failed_files.push(outcome.chunk.clone());
            }
        }
    }
    summary
}

/// Load the chunk manifest from a chunks directory.
///
/// Falls back to scanning the directory for chunk files when the
/// manifest is missing, so batches produced by older tooling still
/// run.
pub fn load_manifest(chunks_dir: &Path) -> Result<ChunkManifest> {
    let manifest_path = chunks_dir.join(crate::core::splitter::CHUNK_MANIFEST_FILE);
    if manifest_path.is_file() {
        let raw = fs::read_to_string(&manifest_path)?;
        return Ok(serde_json::from_str(&raw)?);
    }

    tracing::warn!(
        dir = %chunks_dir.display(),
        "Chunk manifest not found, scanning directory"
    );

    let mut files = Vec::new();
    for entry in fs::read_dir(chunks_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".txt")
            && (name.starts_with(RAW_CHUNK_PREFIX) || name.starts_with(QUIZ_CHUNK_PREFIX))
            && !name.contains("summary")
        {
            files.push(name);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(QuizmillError::NoChunksFound(
            chunks_dir.display().to_string(),
        ));
    }

    let chunks = files
        .into_iter()
        .map(|file| {
            let content = fs::read_to_string(chunks_dir.join(&file)).unwrap_or_default();
            ManifestEntry {
                file,
                word_count: content.split_whitespace().count(),
                question_count: content.matches('?').count(),
            }
        })
        .collect();

    Ok(ChunkManifest {
        created_at: chrono::Utc::now(),
        source: chunks_dir.display().to_string(),
        questions_per_chunk: 0,
        total_lines: 0,
        lines_per_question: 0,
        lines_per_chunk: 0,
        chunks,
    })
}
