//! Bounded chunk splitting with safe cut-point selection.
//!
//! Splits raw line-oriented text into ordered, size-bounded chunks
//! for the correction service. Chunk boundaries prefer safe cut
//! points (blank lines, question starts) found in the last 20% of
//! each window, so records are not severed mid-question.

use crate::core::error::Result;
use crate::core::types::{ChunkManifest, ManifestEntry, RawChunk};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Numbered question start, e.g. `12. ...`
static NUMBERED_QUESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").unwrap());

/// Capitalized line ending in a question mark
static QUESTION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z].*\?$").unwrap());

/// Fallback floor for the lines-per-question estimate
const MIN_LINES_PER_QUESTION: usize = 8;

/// Fraction of the window searched backward for a safe cut point
const CUT_SEARCH_FRACTION: f64 = 0.8;

/// File name of the human-readable split summary
pub const SPLIT_SUMMARY_FILE: &str = "raw_chunk_summary.txt";

/// File name of the machine-readable chunk manifest
pub const CHUNK_MANIFEST_FILE: &str = "chunk_manifest.json";

/// Splits raw text into ordered, size-bounded chunks.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    /// Target questions per chunk (estimate)
    questions_per_chunk: usize,
}

/// Window sizing derived from the input length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSizing {
    pub total_lines: usize,
    pub lines_per_question: usize,
    pub lines_per_chunk: usize,
}

impl ChunkSplitter {
    /// Create a splitter targeting `questions_per_chunk` questions.
    ///
    /// # Panics
    ///
    /// Panics if `questions_per_chunk` is 0.
    pub fn new(questions_per_chunk: usize) -> Self {
        assert!(questions_per_chunk > 0, "questions_per_chunk must be > 0");
        Self {
            questions_per_chunk,
        }
    }

    /// Estimate window sizing for an input of `total_lines` lines.
    ///
    /// `lines_per_question = max(8, total_lines / (S * 10))` and
    /// `lines_per_chunk = S * lines_per_question`, where S is the
    /// target questions per chunk.
    pub fn sizing(&self, total_lines: usize) -> ChunkSizing {
        let lines_per_question =
            MIN_LINES_PER_QUESTION.max(total_lines / (self.questions_per_chunk * 10));
        ChunkSizing {
            total_lines,
            lines_per_question,
            lines_per_chunk: self.questions_per_chunk * lines_per_question,
        }
    }

    /// Split raw text into ordered chunks.
    ///
    /// Empty input yields zero chunks with a warning, not an error.
    /// The final partial window is always emitted.
    pub fn split(&self, content: &str) -> Vec<RawChunk> {
        let content = content.trim();
        if content.is_empty() {
            tracing::warn!("No content found in the input, producing zero chunks");
            return Vec::new();
        }

        let lines: Vec<&str> = content.split('\n').collect();
        let sizing = self.sizing(lines.len());

        tracing::info!(
            total_lines = sizing.total_lines,
            lines_per_question = sizing.lines_per_question,
            lines_per_chunk = sizing.lines_per_chunk,
            "Splitting input"
        );

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < lines.len() {
            let mut end = (start + sizing.lines_per_chunk).min(lines.len());

            // Windows that don't reach the end of input get their
            // boundary pulled back to a safe cut point when one
            // exists in the last 20% of the window
            if end < lines.len() {
                let search_start = (start
                    + (sizing.lines_per_chunk as f64 * CUT_SEARCH_FRACTION) as usize)
                    .max(start + 1);

                for i in (search_start..=end).rev() {
                    if is_safe_cut_point(lines[i].trim()) {
                        end = i + 1;
                        break;
                    }
                }
            }

            let chunk_content = lines[start..end].join("\n").trim().to_string();
            if !chunk_content.is_empty() {
                chunks.push(RawChunk::new(chunks.len() + 1, chunk_content));
            }

            start = end;
        }

        tracing::info!(chunks = chunks.len(), "Created chunks");
        chunks
    }

    /// Split `content` and write chunk artifacts plus a manifest and
    /// a human-readable summary into `output_dir`.
    pub fn write_chunks(
        &self,
        content: &str,
        source: &str,
        output_dir: &Path,
    ) -> Result<ChunkManifest> {
        fs::create_dir_all(output_dir)?;

        let lines = if content.trim().is_empty() {
            0
        } else {
            content.trim().split('\n').count()
        };
        let sizing = self.sizing(lines);
        let chunks = self.split(content);

        for chunk in &chunks {
            let path = output_dir.join(chunk.file_name());
            fs::write(&path, &chunk.content)?;
            tracing::debug!(
                file = %chunk.file_name(),
                questions = chunk.question_count,
                words = chunk.word_count,
                "Wrote chunk"
            );
        }

        let manifest = ChunkManifest {
            created_at: Utc::now(),
            source: source.to_string(),
            questions_per_chunk: self.questions_per_chunk,
            total_lines: sizing.total_lines,
            lines_per_question: sizing.lines_per_question,
            lines_per_chunk: sizing.lines_per_chunk,
            chunks: chunks
                .iter()
                .map(|c| ManifestEntry {
                    file: c.file_name(),
                    word_count: c.word_count,
                    question_count: c.question_count,
                })
                .collect(),
        };

        let manifest_path = output_dir.join(CHUNK_MANIFEST_FILE);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

        self.write_summary(&manifest, output_dir)?;

        Ok(manifest)
    }

    /// Write the plain-text split summary for manual inspection.
    fn write_summary(&self, manifest: &ChunkManifest, output_dir: &Path) -> Result<()> {
        let mut out = fs::File::create(output_dir.join(SPLIT_SUMMARY_FILE))?;

        writeln!(out, "Raw Text Split Summary")?;
        writeln!(out, "{}", "=".repeat(25))?;
        writeln!(out)?;
        writeln!(out, "Original file: {}", manifest.source)?;
        writeln!(out, "Total lines: {}", manifest.total_lines)?;
        writeln!(
            out,
            "Target chunk size: {} questions",
            manifest.questions_per_chunk
        )?;
        writeln!(out, "Total chunks created: {}", manifest.chunks.len())?;
        writeln!(out)?;
        writeln!(out, "Chunk Details:")?;
        writeln!(out, "{}", "-".repeat(15))?;

        for entry in &manifest.chunks {
            writeln!(
                out,
                "{}: ~{} questions, {} words",
                entry.file, entry.question_count, entry.word_count
            )?;
        }

        Ok(())
    }
}

/// Safe cut points: blank lines, numbered questions, question lines,
/// or long lines containing a question mark.
fn is_safe_cut_point(line: &str) -> bool {
    line.is_empty()
        || QUESTION_LINE.is_match(line)
        || NUMBERED_QUESTION.is_match(line)
        || (line.chars().count() > 50 && line.contains('?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing_math() {
        // 9000 lines at S=30: lines_per_question = max(8, 9000/300) = 30
        let splitter = ChunkSplitter::new(30);
        let sizing = splitter.sizing(9000);
        assert_eq!(sizing.lines_per_question, 30);
        assert_eq!(sizing.lines_per_chunk, 900);
    }

    #[test]
    fn test_sizing_floor() {
        let splitter = ChunkSplitter::new(30);
        let sizing = splitter.sizing(100);
        assert_eq!(sizing.lines_per_question, 8);
        assert_eq!(sizing.lines_per_chunk, 240);
    }

    #[test]
    #[should_panic(expected = "questions_per_chunk must be > 0")]
    fn test_zero_chunk_size_panics() {
        ChunkSplitter::new(0);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let splitter = ChunkSplitter::new(30);
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n  \n").is_empty());
    }

    #[test]
    fn test_small_input_single_chunk() {
        let splitter = ChunkSplitter::new(30);
        let content = "What is Rust?\nA. A language\nB. A game";
        let chunks = splitter.split(content);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sequence, 1);
        assert_eq!(chunks[0].content, content);
    }

    #[test]
    fn test_no_line_loss_or_reordering() {
        // Rejoining chunk contents reproduces the input modulo the
        // blank-line breaks induced at chunk boundaries
        let lines: Vec<String> = (0..1000).map(|i| format!("line {i} text")).collect();
        let content = lines.join("\n");

        let splitter = ChunkSplitter::new(10);
        let chunks = splitter.split(&content);
        assert!(chunks.len() > 1);

        let rejoined = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(rejoined, content);
    }

    #[test]
    fn test_chunks_are_sequential() {
        let lines: Vec<String> = (0..2000).map(|i| format!("row {i}")).collect();
        let splitter = ChunkSplitter::new(10);
        let chunks = splitter.split(&lines.join("\n"));

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i + 1);
        }
    }

    #[test]
    fn test_cut_prefers_blank_line() {
        // 300 content lines with a blank line placed inside the last
        // 20% of the first window (lines_per_chunk = 80 at S=10)
        let mut lines: Vec<String> = (0..300).map(|i| format!("row {i}")).collect();
        lines[75] = String::new();

        let splitter = ChunkSplitter::new(10);
        let sizing = splitter.sizing(300);
        assert_eq!(sizing.lines_per_chunk, 80);

        let chunks = splitter.split(&lines.join("\n"));
        // First chunk ends right after the blank line at index 75
        assert!(chunks[0].content.ends_with("row 74"));
        assert!(chunks[1].content.starts_with("row 76"));
    }

    #[test]
    fn test_cut_on_numbered_question() {
        let mut lines: Vec<String> = (0..300).map(|i| format!("row {i}")).collect();
        lines[78] = "42. Which crate provides derive macros?".to_string();

        let splitter = ChunkSplitter::new(10);
        let chunks = splitter.split(&lines.join("\n"));
        assert!(chunks[0].content.ends_with("42. Which crate provides derive macros?"));
    }

    #[test]
    fn test_final_partial_window_emitted() {
        let lines: Vec<String> = (0..250).map(|i| format!("row {i}")).collect();
        let splitter = ChunkSplitter::new(10);
        let chunks = splitter.split(&lines.join("\n"));

        let last = chunks.last().unwrap();
        assert!(last.content.ends_with("row 249"));
    }

    #[test]
    fn test_safe_cut_point_detection() {
        assert!(is_safe_cut_point(""));
        assert!(is_safe_cut_point("3. Something"));
        assert!(is_safe_cut_point("What is the capital of France?"));
        assert!(is_safe_cut_point(
            "this line is definitely longer than fifty characters and has a ? in it"
        ));
        assert!(!is_safe_cut_point("A. an option line"));
        assert!(!is_safe_cut_point("short line?"));
        assert!(!is_safe_cut_point("plain continuation text"));
    }

    #[test]
    fn test_write_chunks_creates_artifacts() {
        let dir = tempfile::TempDir::new().unwrap();
        let lines: Vec<String> = (0..1000).map(|i| format!("line {i}")).collect();

        let splitter = ChunkSplitter::new(10);
        let manifest = splitter
            .write_chunks(&lines.join("\n"), "input.txt", dir.path())
            .unwrap();

        assert!(!manifest.chunks.is_empty());
        for entry in &manifest.chunks {
            assert!(dir.path().join(&entry.file).exists());
        }
        assert!(dir.path().join(CHUNK_MANIFEST_FILE).exists());
        assert!(dir.path().join(SPLIT_SUMMARY_FILE).exists());
    }
}
