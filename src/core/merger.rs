//! Order-preserving merge of corrected chunk artifacts.
//!
//! Collects corrected chunk files from a directory, sorts them by
//! name (zero-padded ids make lexicographic order numeric), and
//! concatenates their contents into the single merged corpus. This
//! is the only all-or-nothing stage: zero mergeable inputs fail it.

use crate::core::error::{QuizmillError, Result};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Separator between records in the merged corpus
const PAIR_SEPARATOR: &str = "\n\n";

/// Result of a merge operation
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// Chunk files merged, in corpus order
    pub files_merged: Vec<String>,

    /// Blank-line-separated pair count in the merged corpus
    pub pair_count: usize,

    /// Whether the broadened name-pattern fallback was used
    pub broadened_discovery: bool,
}

/// Merges corrected chunk artifacts into one corpus.
#[derive(Debug, Clone)]
pub struct ChunkMerger {
    patterns: Vec<Pattern>,
}

impl Default for ChunkMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkMerger {
    pub fn new() -> Self {
        // Both artifact naming variants are accepted
        let patterns = ["corrected_raw_chunk_*.txt", "corrected_quiz_chunk_*.txt"]
            .iter()
            .map(|p| Pattern::new(p).expect("static pattern is valid"))
            .collect();
        Self { patterns }
    }

    /// Merge corrected chunks from `corrected_dir` into `output_file`.
    pub fn merge(&self, corrected_dir: &Path, output_file: &Path) -> Result<MergeOutcome> {
        if !corrected_dir.is_dir() {
            return Err(QuizmillError::InvalidInput(format!(
                "Corrected chunks directory not found: {}",
                corrected_dir.display()
            )));
        }

        let mut broadened = false;
        let mut files = self.discover(corrected_dir)?;

        if files.is_empty() {
            tracing::warn!(
                dir = %corrected_dir.display(),
                "No corrected chunk files matched the naming convention, broadening discovery"
            );
            files = broadened_discovery(corrected_dir)?;
            broadened = true;
        }

        if files.is_empty() {
            return Err(QuizmillError::NoChunksFound(
                corrected_dir.display().to_string(),
            ));
        }

        files.sort();

        let mut merged = Vec::new();
        let mut merged_names = Vec::new();

        for file in &files {
            let content = fs::read_to_string(corrected_dir.join(file))?;
            let content = content.trim();
            if !content.is_empty() {
                merged.push(content.to_string());
                merged_names.push(file.clone());
                tracing::debug!(file = %file, "Added chunk to merge");
            }
        }

        let final_content = merged.join(PAIR_SEPARATOR);
        fs::write(output_file, &final_content)?;

        let pair_count = final_content
            .split(PAIR_SEPARATOR)
            .filter(|p| !p.trim().is_empty())
            .count();

        tracing::info!(
            files = merged_names.len(),
            pairs = pair_count,
            output = %output_file.display(),
            "Merged corrected chunks"
        );

        Ok(MergeOutcome {
            files_merged: merged_names,
            pair_count,
            broadened_discovery: broadened,
        })
    }

    /// File names matching the corrected-chunk naming convention,
    /// summaries excluded.
    fn discover(&self, dir: &Path) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().contains("summary") {
                continue;
            }
            if self.patterns.iter().any(|p| p.matches(&name)) {
                files.push(name);
            }
        }
        Ok(files)
    }
}

/// Fallback discovery: any `.txt` file whose name mentions
/// "corrected" or "chunk" (summaries still excluded).
fn broadened_discovery(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let lower = name.to_lowercase();
        if lower.ends_with(".txt")
            && !lower.contains("summary")
            && (lower.contains("corrected") || lower.contains("chunk"))
        {
            files.push(name);
        }
    }
    Ok(files)
}

/// Convenience wrapper using the default naming convention.
pub fn merge_corrected_chunks(corrected_dir: &Path, output_file: &Path) -> Result<MergeOutcome> {
    ChunkMerger::new().merge(corrected_dir, output_file)
}
