//! Shared data types for the quizmill pipeline.
//!
//! Chunk identifiers are zero-padded so that lexicographic file-name
//! order equals numeric sequence order. Every downstream stage relies
//! on that property to preserve corpus order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the zero-padded chunk sequence number
pub const CHUNK_ID_WIDTH: usize = 3;

/// Prefix for raw chunk artifacts produced by the splitter
pub const RAW_CHUNK_PREFIX: &str = "raw_chunk_";

/// Alternate prefix accepted for chunks produced by other tooling
pub const QUIZ_CHUNK_PREFIX: &str = "quiz_chunk_";

/// Prefix prepended to corrected chunk artifacts
pub const CORRECTED_PREFIX: &str = "corrected_";

/// One bounded slice of raw text, submitted to the correction
/// service as a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChunk {
    /// 1-based sequence number; defines corpus order
    pub sequence: usize,

    /// Chunk content (trimmed, newline-joined lines)
    pub content: String,

    /// Whitespace-separated word count
    pub word_count: usize,

    /// Provisional question count (`?` occurrences)
    pub question_count: usize,
}

impl RawChunk {
    pub fn new(sequence: usize, content: String) -> Self {
        let word_count = content.split_whitespace().count();
        let question_count = content.matches('?').count();
        Self {
            sequence,
            content,
            word_count,
            question_count,
        }
    }

    /// Artifact file name, e.g. `raw_chunk_001.txt`
    pub fn file_name(&self) -> String {
        format!("{RAW_CHUNK_PREFIX}{:0width$}.txt", self.sequence, width = CHUNK_ID_WIDTH)
    }
}

/// Outcome of correcting a single chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionOutcome {
    /// Source chunk file name
    pub chunk: String,

    /// Whether correction succeeded after retries
    pub status: CorrectionStatus,

    /// Failure reason when status is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    Success,
    Failed,
}

/// Aggregate correction results, persisted as `correction_summary.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub failed_files: Vec<String>,
}

/// Per-chunk entry in the split manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    pub word_count: usize,
    pub question_count: usize,
}

/// Ordered list of chunk artifacts produced by the splitter.
///
/// Persisted as `chunk_manifest.json` and consumed by the correction
/// stage, so stage wiring is explicit instead of glob-driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkManifest {
    pub created_at: DateTime<Utc>,

    /// Input the chunks were split from
    pub source: String,

    pub questions_per_chunk: usize,
    pub total_lines: usize,
    pub lines_per_question: usize,
    pub lines_per_chunk: usize,

    /// Entries in corpus order
    pub chunks: Vec<ManifestEntry>,
}

impl ChunkManifest {
    /// Chunk file names in corpus order
    pub fn file_names(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.file.clone()).collect()
    }
}
