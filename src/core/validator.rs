//! Rule-based answer validation and placeholder auto-repair.
//!
//! Parses the merged corpus into QA records, applies the validation
//! rule set, and emits a categorized issue report. Every issue is
//! recorded, never raised; a corpus full of broken records still
//! validates "successfully" and reports what it found.

use crate::core::corpus::{self, QaRecord, ANSWER_DELIMITER};
use crate::core::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Letters considered valid answers
static ANSWER_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-E]").unwrap());

/// Recurring multi-answer shape: letter, optional parenthetical, letter
static MULTI_ANSWER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-E]\s*(\([^)]*\))?\s*[A-E]").unwrap());

/// Parenthetical justification groups
static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Stand-in tokens indicating incomplete correction output
const PLACEHOLDER_TOKENS: &[&str] = &[
    "missing option",
    "missing",
    "placeholder",
    "todo",
    "tbd",
    "to be determined",
    "fix",
    "check answer",
    "check",
    "unknown",
];

/// Maximum sampled records per issue category in the report
const SAMPLE_CAP: usize = 10;

/// Issue categories recorded per record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    MissingAnswer,
    QuestionMarkAnswer,
    PlaceholderAnswer,
    PlaceholderOption,
    InvalidFormat,
    AnswerMismatch,
    MultiAnswerMismatch,
    MalformedOptions,
    MalformedOptionLine,
}

/// One issue found on a record
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub detail: String,
}

/// Sampled record in a report category
#[derive(Debug, Clone, Serialize)]
pub struct IssueSample {
    pub index: usize,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub issues: Vec<String>,
}

/// Per-category counts with capped samples
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryBreakdown {
    pub count: usize,
    pub questions: Vec<IssueSample>,
}

/// Categorized validation report, persisted as JSON
#[derive(Debug, Clone, Serialize)]
pub struct IssueReport {
    pub file_analyzed: String,
    pub total_questions: usize,
    pub questions_without_issues: usize,
    pub questions_with_issues: usize,
    pub issue_breakdown: BTreeMap<IssueCategory, CategoryBreakdown>,
}

impl IssueReport {
    /// Count for one category (0 when absent)
    pub fn category_count(&self, category: IssueCategory) -> usize {
        self.issue_breakdown
            .get(&category)
            .map(|b| b.count)
            .unwrap_or(0)
    }
}

/// Result of the placeholder auto-repair pass
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub fixed_content: String,
    pub removed_options: usize,
}

/// Validates parsed QA records against the rule set.
#[derive(Debug, Clone, Default)]
pub struct AnswerValidator;

impl AnswerValidator {
    pub fn new() -> Self {
        Self
    }

    /// Parse the corpus and validate every record.
    pub fn validate_corpus(&self, content: &str) -> Vec<(QaRecord, Vec<Issue>)> {
        corpus::parse_corpus(content)
            .into_iter()
            .map(|record| {
                let issues = self.check_record(&record);
                (record, issues)
            })
            .collect()
    }

    /// Apply all validation rules to one record.
    pub fn check_record(&self, record: &QaRecord) -> Vec<Issue> {
        let mut issues = Vec::new();

        self.check_answer(record, &mut issues);

        if record.options.len() < 4 {
            issues.push(Issue {
                category: IssueCategory::MalformedOptions,
                detail: format!(
                    "Only {} options found, expected at least 4",
                    record.options.len()
                ),
            });
        }

        for (i, option) in record.options.iter().enumerate() {
            if corpus::option_prefix(option).is_none() {
                issues.push(Issue {
                    category: IssueCategory::MalformedOptionLine,
                    detail: format!("Option {} doesn't start with a letter: '{}'", i + 1, option),
                });
            }
        }

        for (i, option) in record.options.iter().enumerate() {
            if is_placeholder(option) {
                let letter = (b'A' + (i as u8).min(25)) as char;
                issues.push(Issue {
                    category: IssueCategory::PlaceholderOption,
                    detail: format!("Option {letter} has placeholder text: '{option}'"),
                });
            }
        }

        issues
    }

    /// Answer-field rules. These branches are mutually exclusive:
    /// an answer is classified once, then validated in that class.
    fn check_answer(&self, record: &QaRecord, issues: &mut Vec<Issue>) {
        let option_letters = option_letters(record);

        let answer = match record.answer.as_deref().map(str::trim) {
            None | Some("") => {
                issues.push(Issue {
                    category: IssueCategory::MissingAnswer,
                    detail: "Missing answer".to_string(),
                });
                return;
            }
            Some(a) => a,
        };

        if answer == "?" {
            issues.push(Issue {
                category: IssueCategory::QuestionMarkAnswer,
                detail: "Answer is a question mark".to_string(),
            });
            return;
        }

        if is_placeholder(answer) {
            issues.push(Issue {
                category: IssueCategory::PlaceholderAnswer,
                detail: format!("Placeholder answer: '{answer}'"),
            });
            return;
        }

        if answer.chars().count() == 1 {
            let letter = answer.chars().next().unwrap().to_ascii_uppercase();
            if !('A'..='E').contains(&letter) {
                issues.push(Issue {
                    category: IssueCategory::InvalidFormat,
                    detail: format!("Invalid answer format: '{answer}'"),
                });
            } else if !option_letters.contains(&letter) {
                issues.push(Issue {
                    category: IssueCategory::AnswerMismatch,
                    detail: format!("Answer '{letter}' doesn't match available options"),
                });
            }
            return;
        }

        if is_multi_answer(answer) {
            for letter in extract_letters(answer) {
                if !option_letters.contains(&letter) {
                    issues.push(Issue {
                        category: IssueCategory::MultiAnswerMismatch,
                        detail: format!("Multi-answer '{letter}' doesn't match available options"),
                    });
                }
            }
            return;
        }

        if answer.contains('(') && answer.contains(')') {
            // Single answer with a free-text justification
            match answer.chars().next().map(|c| c.to_ascii_uppercase()) {
                Some(letter) if ('A'..='E').contains(&letter) => {
                    if !option_letters.contains(&letter) {
                        issues.push(Issue {
                            category: IssueCategory::AnswerMismatch,
                            detail: format!("Answer '{letter}' doesn't match available options"),
                        });
                    }
                }
                _ => {
                    issues.push(Issue {
                        category: IssueCategory::InvalidFormat,
                        detail: format!(
                            "Answer with explanation doesn't start with a valid option: '{answer}'"
                        ),
                    });
                }
            }
            return;
        }

        let starts_valid = answer
            .chars()
            .next()
            .map(|c| ('A'..='E').contains(&c.to_ascii_uppercase()))
            .unwrap_or(false);
        if !starts_valid {
            issues.push(Issue {
                category: IssueCategory::InvalidFormat,
                detail: format!("Answer doesn't start with a valid option: '{answer}'"),
            });
        }
    }

    /// Generate the categorized issue report for a corpus.
    pub fn generate_report(&self, content: &str, file_label: &str) -> IssueReport {
        let validated = self.validate_corpus(content);
        let total_questions = validated.len();
        let questions_with_issues = validated.iter().filter(|(_, i)| !i.is_empty()).count();

        let mut breakdown: BTreeMap<IssueCategory, CategoryBreakdown> = BTreeMap::new();

        for (record, issues) in &validated {
            let mut seen = Vec::new();
            for issue in issues {
                let entry = breakdown.entry(issue.category).or_default();
                // A record counts once per category even when it has
                // several issues of that category
                if !seen.contains(&issue.category) {
                    entry.count += 1;
                    if entry.questions.len() < SAMPLE_CAP {
                        entry.questions.push(IssueSample {
                            index: record.index,
                            question: record.question.clone(),
                            answer: record.answer.clone(),
                            issues: issues.iter().map(|i| i.detail.clone()).collect(),
                        });
                    }
                    seen.push(issue.category);
                }
            }
        }

        tracing::info!(
            total = total_questions,
            with_issues = questions_with_issues,
            "Answer validation complete"
        );

        IssueReport {
            file_analyzed: file_label.to_string(),
            total_questions,
            questions_without_issues: total_questions - questions_with_issues,
            questions_with_issues,
            issue_breakdown: breakdown,
        }
    }

    /// Persist a report as pretty-printed JSON.
    pub fn save_report(&self, report: &IssueReport, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(report)?)?;
        tracing::info!(path = %path.display(), "Saved answer check report");
        Ok(())
    }

    /// Remove placeholder options from the corpus, reattaching a
    /// displaced answer token to the last surviving option.
    ///
    /// Returns the repaired corpus and the number of options removed.
    pub fn fix_placeholder_options(&self, content: &str) -> RepairOutcome {
        let mut fixed_pairs = Vec::new();
        let mut removed = 0;

        for pair in content.trim().split("\n\n") {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }

            let lines: Vec<&str> = pair.lines().collect();
            if lines.len() < 5 {
                fixed_pairs.push(pair.to_string());
                continue;
            }

            let question = lines[0];
            let mut kept: Vec<String> = Vec::new();
            let mut displaced_answer: Option<String> = None;

            for line in &lines[1..] {
                if let Some((option_part, rest)) = line.split_once(ANSWER_DELIMITER) {
                    let token = rest.split(ANSWER_DELIMITER).next().unwrap_or("").trim();
                    // A bare trailing delimiter carries no answer to displace
                    if !token.is_empty() {
                        displaced_answer = Some(token.to_string());
                    }

                    if is_placeholder(option_part.trim()) {
                        removed += 1;
                        tracing::debug!(option = %option_part.trim(), "Removing placeholder option");
                    } else {
                        kept.push(line.to_string());
                    }
                } else if is_placeholder(line.trim()) {
                    removed += 1;
                    tracing::debug!(option = %line.trim(), "Removing placeholder option");
                } else {
                    kept.push(line.to_string());
                }
            }

            // Reattach the answer when its carrier option was removed
            if let Some(answer) = &displaced_answer {
                let has_answer = kept.iter().any(|l| l.contains(ANSWER_DELIMITER));
                if !has_answer {
                    if let Some(last) = kept.pop() {
                        kept.push(format!("{last}{ANSWER_DELIMITER}{answer}"));
                    }
                }
            }

            let mut rebuilt = vec![question.to_string()];
            rebuilt.extend(kept);
            fixed_pairs.push(rebuilt.join("\n"));
        }

        tracing::info!(removed, "Fixed placeholder options");

        RepairOutcome {
            fixed_content: fixed_pairs.join("\n\n"),
            removed_options: removed,
        }
    }

    /// Plain-text artifact listing records with missing answers, for
    /// manual review. Returns `None` when nothing is missing.
    pub fn missing_answers_text(&self, content: &str) -> Option<String> {
        let missing: Vec<QaRecord> = self
            .validate_corpus(content)
            .into_iter()
            .filter(|(_, issues)| {
                issues
                    .iter()
                    .any(|i| i.category == IssueCategory::MissingAnswer)
            })
            .map(|(record, _)| record)
            .collect();

        if missing.is_empty() {
            return None;
        }

        let mut out = String::new();
        out.push_str("QUESTIONS WITH MISSING ANSWERS\n");
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");
        for record in &missing {
            out.push_str(&format!("Question {}:\n", record.index));
            out.push_str(&record.full_text);
            out.push_str("\n\n");
            out.push_str(&"-".repeat(30));
            out.push_str("\n\n");
        }
        Some(out)
    }
}

/// Leading letters of the record's options
fn option_letters(record: &QaRecord) -> Vec<char> {
    record
        .options
        .iter()
        .filter_map(|o| o.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Case-insensitive substring match against the placeholder dictionary
pub fn is_placeholder(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    PLACEHOLDER_TOKENS.iter().any(|token| lower.contains(token))
}

/// Answer letters present in the text, in order. Parenthetical
/// justifications are stripped first so their prose can't contribute
/// letters ("B (bad) C" yields B and C, never the A in "bad").
fn extract_letters(answer: &str) -> Vec<char> {
    let stripped = PAREN_GROUP.replace_all(answer, "");
    let upper = stripped.to_uppercase();
    ANSWER_LETTER
        .find_iter(&upper)
        .filter_map(|m| m.as_str().chars().next())
        .collect()
}

/// Classify a multi-letter answer as a genuine multi-answer.
///
/// "A (foo) B (bar)" is a multi-answer; "A (mentions B and C)" is a
/// single answer whose justification happens to name other letters.
pub fn is_multi_answer(answer: &str) -> bool {
    let letters = extract_letters(answer);
    if letters.len() <= 1 {
        return false;
    }

    let upper = answer.to_uppercase();

    // Single answer with explanation: first letter leads the text
    // and the first parenthetical's content accounts for every
    // other extracted letter
    let first_at_start = upper.find(letters[0]) == Some(0);
    if first_at_start {
        if let Some(paren_content) = first_parenthetical(&upper) {
            let all_in_explanation = letters[1..]
                .iter()
                .all(|l| paren_content.contains(*l));
            if all_in_explanation {
                return false;
            }
        }
    }

    MULTI_ANSWER_PATTERN.is_match(&upper)
}

/// Content of the first `(...)` group, if any
fn first_parenthetical(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let rest = &text[open + 1..];
    let close = rest.find(')')?;
    Some(&rest[..close])
}
