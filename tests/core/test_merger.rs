// Integration tests for the chunk merger

use crate::common::{qa_record, quiz_corpus};
use quizmill::core::merger::{merge_corrected_chunks, ChunkMerger};
use quizmill::core::splitter::ChunkSplitter;
use quizmill::core::types::CORRECTED_PREFIX;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_merge_split_artifacts_recovers_corpus() {
    // Split, pretend-correct (copy), merge: every record survives
    let corpus = quiz_corpus(80);
    let chunks = TempDir::new().unwrap();
    let corrected = TempDir::new().unwrap();

    let manifest = ChunkSplitter::new(10)
        .write_chunks(&corpus, "raw_extracted_text.txt", chunks.path())
        .unwrap();

    for entry in &manifest.chunks {
        let content = fs::read_to_string(chunks.path().join(&entry.file)).unwrap();
        fs::write(
            corrected.path().join(format!("{CORRECTED_PREFIX}{}", entry.file)),
            content,
        )
        .unwrap();
    }

    let output = corrected.path().join("final_corrected_quiz_data.txt");
    let outcome = ChunkMerger::new().merge(corrected.path(), &output).unwrap();

    assert_eq!(outcome.files_merged.len(), manifest.chunks.len());
    assert!(!outcome.broadened_discovery);

    let merged = fs::read_to_string(&output).unwrap();
    let questions = merged
        .lines()
        .filter(|l| l.trim_end().ends_with('?'))
        .count();
    assert_eq!(questions, 80);
}

#[test]
fn test_merge_preserves_corpus_order() {
    let dir = TempDir::new().unwrap();
    for i in 1..=12 {
        fs::write(
            dir.path().join(format!("corrected_raw_chunk_{i:03}.txt")),
            qa_record(&format!("Question number {i}?"), "A"),
        )
        .unwrap();
    }

    let output = dir.path().join("merged.txt");
    merge_corrected_chunks(dir.path(), &output).unwrap();

    let merged = fs::read_to_string(&output).unwrap();
    let mut last_pos = 0;
    for i in 1..=12 {
        let pos = merged
            .find(&format!("Question number {i}?"))
            .unwrap_or_else(|| panic!("question {i} missing"));
        assert!(pos >= last_pos, "question {i} out of order");
        last_pos = pos;
    }
}

#[test]
fn test_merge_with_convenience_function() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("corrected_raw_chunk_001.txt"),
        qa_record("Only question?", "B"),
    )
    .unwrap();

    let output = dir.path().join("merged.txt");
    let outcome = merge_corrected_chunks(dir.path(), &output).unwrap();
    assert_eq!(outcome.pair_count, 1);
}
