// Integration tests for duplicate detection

use crate::common::qa_record;
use quizmill::core::dedup::DuplicateDetector;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_report_persisted_with_sections() {
    let corpus = [
        qa_record("What is the law of contradiction?", "A"),
        qa_record("What is the law of contradiction", "B"),
        qa_record("A standalone question?", "C"),
    ]
    .join("\n\n");

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("duplicate_report.json");

    let detector = DuplicateDetector::new(0.8);
    let report = detector.generate_report(&corpus, "merged.txt");
    detector.save_report(&report, &report_path).unwrap();

    let raw = fs::read_to_string(&report_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["file_analyzed"], "merged.txt");
    assert_eq!(json["total_questions"], 3);
    assert_eq!(json["similarity_threshold"], 0.8);
    assert_eq!(json["exact_duplicates"]["count"], 1);
    assert_eq!(json["exact_duplicates"]["affected_questions"], 2);
    // The same normalized questions also group as near-duplicates,
    // and their answers disagree
    assert_eq!(json["similar_questions"]["count"], 1);
    assert_eq!(json["answer_inconsistencies"]["count"], 1);
    assert_eq!(
        json["answer_inconsistencies"]["groups"][0]["different_answers"],
        serde_json::json!(["A", "B"])
    );
}

#[test]
fn test_cleaned_corpus_reparses() {
    let corpus = [
        qa_record("What is the law of contradiction?", "A"),
        qa_record("A standalone question?", "C"),
        qa_record("What is the law of contradiction", "B"),
    ]
    .join("\n\n");

    let detector = DuplicateDetector::new(0.8);
    let outcome = detector.cleaned_corpus(&corpus);
    assert_eq!(outcome.removed, 1);

    let records = quizmill::core::corpus::parse_corpus(&outcome.cleaned_content);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].answer.as_deref(), Some("A"));
    assert_eq!(records[1].question, "A standalone question?");
}
