// Integration tests for the chunk splitter

use crate::common::quiz_corpus;
use quizmill::core::splitter::{ChunkSplitter, CHUNK_MANIFEST_FILE, SPLIT_SUMMARY_FILE};
use quizmill::core::types::ChunkManifest;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_chunks_produces_artifacts() {
    let corpus = quiz_corpus(120);
    let dir = TempDir::new().unwrap();

    let splitter = ChunkSplitter::new(30);
    let manifest = splitter
        .write_chunks(&corpus, "raw_extracted_text.txt", dir.path())
        .unwrap();

    assert!(!manifest.chunks.is_empty());
    for entry in &manifest.chunks {
        let path = dir.path().join(&entry.file);
        assert!(path.is_file(), "missing chunk artifact {}", entry.file);
    }

    assert!(dir.path().join(CHUNK_MANIFEST_FILE).is_file());
    assert!(dir.path().join(SPLIT_SUMMARY_FILE).is_file());
}

#[test]
fn test_manifest_roundtrips_from_disk() {
    let corpus = quiz_corpus(60);
    let dir = TempDir::new().unwrap();

    let splitter = ChunkSplitter::new(10);
    let written = splitter
        .write_chunks(&corpus, "raw_extracted_text.txt", dir.path())
        .unwrap();

    let raw = fs::read_to_string(dir.path().join(CHUNK_MANIFEST_FILE)).unwrap();
    let loaded: ChunkManifest = serde_json::from_str(&raw).unwrap();

    assert_eq!(loaded.file_names(), written.file_names());
    assert_eq!(loaded.source, "raw_extracted_text.txt");
    assert_eq!(loaded.questions_per_chunk, 10);
}

#[test]
fn test_no_content_lost_across_chunks() {
    let corpus = quiz_corpus(200);
    let dir = TempDir::new().unwrap();

    let splitter = ChunkSplitter::new(20);
    let manifest = splitter
        .write_chunks(&corpus, "raw_extracted_text.txt", dir.path())
        .unwrap();

    let mut question_lines = 0;
    for entry in &manifest.chunks {
        let content = fs::read_to_string(dir.path().join(&entry.file)).unwrap();
        question_lines += content
            .lines()
            .filter(|l| l.trim_end().ends_with('?'))
            .count();
    }

    assert_eq!(question_lines, 200);
}

#[test]
fn test_chunks_cut_on_record_boundaries() {
    // The boundary lands right after a safe cut line, so every
    // non-final chunk ends at a record edge (a question line or a
    // record-closing answer line), never between two option lines,
    // and no questions go missing across the cuts
    let corpus = quiz_corpus(150);
    let dir = TempDir::new().unwrap();

    let splitter = ChunkSplitter::new(15);
    let manifest = splitter
        .write_chunks(&corpus, "raw_extracted_text.txt", dir.path())
        .unwrap();

    assert!(manifest.chunks.len() > 1, "corpus should span chunks");

    let mut question_lines = 0;
    for (i, entry) in manifest.chunks.iter().enumerate() {
        let content = fs::read_to_string(dir.path().join(&entry.file)).unwrap();
        question_lines += content
            .lines()
            .filter(|l| l.trim_end().ends_with('?'))
            .count();

        if i + 1 < manifest.chunks.len() {
            let last_line = content.lines().last().unwrap().trim_end();
            assert!(
                last_line.ends_with('?') || last_line.contains(";;"),
                "chunk {} ends mid-record: {last_line}",
                entry.file
            );
        }
    }
    assert_eq!(question_lines, 150);
}

#[test]
fn test_empty_input_produces_no_artifacts() {
    let dir = TempDir::new().unwrap();
    let splitter = ChunkSplitter::new(30);
    let manifest = splitter
        .write_chunks("   \n  ", "empty.txt", dir.path())
        .unwrap();

    assert!(manifest.chunks.is_empty());
    // Manifest and summary still record the (empty) run
    assert!(dir.path().join(CHUNK_MANIFEST_FILE).is_file());
}
