//! Shared corpus grammar for QA records.
//!
//! Both the answer validator and the duplicate detector parse the
//! merged corpus through this module, so they always agree on what
//! constitutes a record. Records are separated by blank lines; a
//! record is a question line followed by option lines (`A.`/`A)`
//! style prefixes); the answer letter is attached with the `;;`
//! delimiter, either to an option line or on its own trailing line.

use serde::{Deserialize, Serialize};

/// Token separating option/question text from the answer
pub const ANSWER_DELIMITER: &str = ";;";

/// Minimum lines for a record candidate: question + 4 options
const MIN_RECORD_LINES: usize = 5;

/// One question with its options and resolved answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRecord {
    /// Position among blank-line-separated segments of the corpus
    pub index: usize,

    /// Question text (first line of the record)
    pub question: String,

    /// Option lines, delimiter stripped, in order
    pub options: Vec<String>,

    /// Answer text after the first `;;`, if any
    pub answer: Option<String>,

    /// 1-based line offset the answer was found on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_line: Option<usize>,

    /// Raw text span, kept for diagnostics and repair output
    pub full_text: String,
}

impl QaRecord {
    /// A record is well-formed when it has a question and at least
    /// four option lines.
    pub fn is_well_formed(&self) -> bool {
        !self.question.is_empty() && self.options.len() >= 4
    }

    /// Answer text, with `?` standing in for a missing one
    pub fn answer_or_unknown(&self) -> &str {
        self.answer.as_deref().unwrap_or("?")
    }
}

/// Check whether a line starts with a valid option prefix
/// (`A.`..`E.` or `A)`..`E)`), returning the option letter.
pub fn option_prefix(line: &str) -> Option<char> {
    let mut chars = line.chars();
    let letter = chars.next()?;
    let sep = chars.next()?;
    if ('A'..='E').contains(&letter) && (sep == '.' || sep == ')') {
        Some(letter)
    } else {
        None
    }
}

/// Parse the corpus into QA records.
///
/// Candidates with fewer than five lines (question + four options)
/// are skipped entirely, but keep their slot in the index numbering
/// so record indices stay stable across both consumers.
pub fn parse_corpus(content: &str) -> Vec<QaRecord> {
    let mut records = Vec::new();

    for (index, segment) in content.trim().split("\n\n").enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let lines: Vec<&str> = segment.lines().collect();
        if lines.len() < MIN_RECORD_LINES {
            continue;
        }

        let question = lines[0].trim().to_string();
        let mut options = Vec::new();
        let mut answer: Option<String> = None;
        let mut answer_line = None;

        for (offset, raw_line) in lines[1..].iter().enumerate() {
            let line = raw_line.trim();

            if option_prefix(line).is_some() {
                if let Some((option_part, rest)) = line.split_once(ANSWER_DELIMITER) {
                    options.push(option_part.trim().to_string());
                    if answer.is_none() {
                        // Delimiters may repeat; the answer is the
                        // token right after the first one
                        let token = rest.split(ANSWER_DELIMITER).next().unwrap_or("");
                        answer = Some(token.trim().to_string());
                        answer_line = Some(offset + 1);
                    }
                } else {
                    options.push(line.to_string());
                }
            } else if line.contains(ANSWER_DELIMITER) && answer.is_none() {
                answer = Some(line.replace(ANSWER_DELIMITER, "").trim().to_string());
                answer_line = Some(offset + 1);
            }
        }

        records.push(QaRecord {
            index,
            question,
            options,
            answer,
            answer_line,
            full_text: segment.to_string(),
        });
    }

    records
}

/// Normalize text for comparison: collapse whitespace, strip
/// punctuation, lowercase.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_with_attached_answer() {
        let records = parse_corpus("Q?\nA. x\nB. y\nC. z\nD. w;;D");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.question, "Q?");
        assert_eq!(r.options, vec!["A. x", "B. y", "C. z", "D. w"]);
        assert_eq!(r.answer.as_deref(), Some("D"));
        assert_eq!(r.answer_line, Some(4));
        assert!(r.is_well_formed());
    }

    #[test]
    fn test_parse_record_with_separate_answer_line() {
        let records = parse_corpus("Q?\nA. x\nB. y\nC. z\nD. w\n;;B");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answer.as_deref(), Some("B"));
        assert_eq!(records[0].options.len(), 4);
    }

    #[test]
    fn test_first_delimiter_wins() {
        let records = parse_corpus("Q?\nA. x;;A\nB. y\nC. z\nD. w;;D");
        assert_eq!(records[0].answer.as_deref(), Some("A"));
        assert_eq!(records[0].answer_line, Some(1));
    }

    #[test]
    fn test_paren_option_prefix_accepted() {
        let records = parse_corpus("Q?\nA) x\nB) y\nC) z\nD) w;;C");
        assert_eq!(records[0].options.len(), 4);
        assert_eq!(records[0].answer.as_deref(), Some("C"));
    }

    #[test]
    fn test_short_candidate_skipped_but_index_kept() {
        let corpus = "too\nshort\n\nQ?\nA. x\nB. y\nC. z\nD. w;;A";
        let records = parse_corpus(corpus);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 1);
    }

    #[test]
    fn test_answer_with_justification() {
        let records = parse_corpus("Q?\nA. x\nB. y\nC. z\nD. w;;B (standard definition)");
        assert_eq!(records[0].answer.as_deref(), Some("B (standard definition)"));
    }

    #[test]
    fn test_three_option_record_parses_but_not_well_formed() {
        let records = parse_corpus("Q?\nA. x\nB. y\nC. z;;C\nnot an option");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].options.len(), 3);
        assert!(!records[0].is_well_formed());
    }

    #[test]
    fn test_option_prefix() {
        assert_eq!(option_prefix("A. text"), Some('A'));
        assert_eq!(option_prefix("E) text"), Some('E'));
        assert_eq!(option_prefix("F. text"), None);
        assert_eq!(option_prefix("AB text"), None);
        assert_eq!(option_prefix(""), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  What is   Rust? "), "what is rust");
        assert_eq!(normalize("Hello, World!"), "hello world");
        assert_eq!(normalize("A\tB\nC"), "a b c");
    }

    #[test]
    fn test_normalize_equality_ignores_punctuation() {
        assert_eq!(normalize("What is ownership?"), normalize("What is ownership"));
    }

    #[test]
    fn test_empty_corpus() {
        assert!(parse_corpus("").is_empty());
        assert!(parse_corpus("\n\n\n").is_empty());
    }
}
