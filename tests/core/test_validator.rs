// Integration tests for answer validation and repair

use crate::common::qa_record;
use quizmill::core::validator::AnswerValidator;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_report_persisted_with_breakdown() {
    let corpus = [
        qa_record("A clean question?", "A"),
        "A broken question?\nA. alpha\nB. beta\nC. gamma\nD. delta".to_string(),
        qa_record("An unreadable answer?", "?"),
    ]
    .join("\n\n");

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("answer_check_report.json");

    let validator = AnswerValidator::new();
    let report = validator.generate_report(&corpus, "merged.txt");
    validator.save_report(&report, &report_path).unwrap();

    let raw = fs::read_to_string(&report_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["file_analyzed"], "merged.txt");
    assert_eq!(json["total_questions"], 3);
    assert_eq!(json["questions_with_issues"], 2);
    assert_eq!(json["issue_breakdown"]["missing_answer"]["count"], 1);
    assert_eq!(json["issue_breakdown"]["question_mark_answer"]["count"], 1);
}

#[test]
fn test_placeholder_repair_survives_reparse() {
    let broken =
        "Which one applies?\nA. alpha\nB. beta\nC. gamma\nD. (Missing Option);;B\nE. epsilon";
    let corpus = [qa_record("A clean question?", "A"), broken.to_string()].join("\n\n");

    let validator = AnswerValidator::new();
    let outcome = validator.fix_placeholder_options(&corpus);
    assert_eq!(outcome.removed_options, 1);

    // Repaired corpus still parses, with the answer reattached
    let records = quizmill::core::corpus::parse_corpus(&outcome.fixed_content);
    assert_eq!(records.len(), 2);
    let repaired = &records[1];
    assert!(repaired.is_well_formed());
    assert_eq!(repaired.answer.as_deref(), Some("B"));
    assert!(!repaired.full_text.contains("Missing Option"));
}

#[test]
fn test_missing_answers_artifact() {
    let corpus = [
        qa_record("Answered question?", "C"),
        "Unanswered question?\nA. alpha\nB. beta\nC. gamma\nD. delta".to_string(),
    ]
    .join("\n\n");

    let validator = AnswerValidator::new();
    let text = validator.missing_answers_text(&corpus).unwrap();
    assert!(text.contains("Unanswered question?"));
    assert!(!text.contains("Answered question?"));

    // Clean corpus produces no artifact
    let clean = qa_record("Answered question?", "C");
    assert!(validator.missing_answers_text(&clean).is_none());
}
