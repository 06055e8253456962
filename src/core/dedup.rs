//! Exact and near-duplicate detection over the merged corpus.
//!
//! Questions are compared on normalized text (whitespace collapsed,
//! punctuation stripped, lowercased). Near-duplicate grouping is a
//! greedy single pass in original corpus order: once a record is
//! assigned to a group it is never reconsidered, so grouping is
//! deliberately non-transitive.

use crate::core::corpus::{self, QaRecord};
use crate::core::error::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A cluster of records sharing a representative (the first member).
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub group_id: usize,
    pub count: usize,
    pub questions: Vec<QaRecord>,

    /// Similarity of each member after the first to the representative
    pub similarities: Vec<f64>,

    pub answer_inconsistency: bool,

    /// Distinct answers across members, when inconsistent
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub different_answers: Vec<String>,
}

/// Counts plus groups for one section of the report
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateSection {
    pub count: usize,
    pub affected_questions: usize,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateSection {
    fn from_groups(groups: Vec<DuplicateGroup>) -> Self {
        Self {
            count: groups.len(),
            affected_questions: groups.iter().map(|g| g.count).sum(),
            groups,
        }
    }
}

/// Duplicate check report, persisted as JSON
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub file_analyzed: String,
    pub total_questions: usize,
    pub similarity_threshold: f64,
    pub exact_duplicates: DuplicateSection,
    pub similar_questions: DuplicateSection,
    pub answer_inconsistencies: DuplicateSection,
}

/// Result of removing exact duplicates from a corpus
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub cleaned_content: String,
    pub kept: usize,
    pub removed: usize,
}

/// Finds exact and near-duplicate questions.
#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    similarity_threshold: f64,
}

impl DuplicateDetector {
    /// Create a detector with the given inclusive similarity threshold.
    ///
    /// # Panics
    ///
    /// Panics if the threshold is outside `0.0..=1.0`.
    pub fn new(similarity_threshold: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&similarity_threshold),
            "similarity_threshold must be within 0.0..=1.0"
        );
        Self {
            similarity_threshold,
        }
    }

    /// Well-formed records of the corpus, in original order.
    pub fn parse_records(&self, content: &str) -> Vec<QaRecord> {
        corpus::parse_corpus(content)
            .into_iter()
            .filter(|r| r.is_well_formed())
            .collect()
    }

    /// Group records whose normalized question text is identical.
    /// Only groups of size > 1 are returned.
    pub fn find_exact_duplicates(&self, records: &[QaRecord]) -> Vec<DuplicateGroup> {
        let mut order: Vec<String> = Vec::new();
        let mut by_question: std::collections::HashMap<String, Vec<QaRecord>> =
            std::collections::HashMap::new();

        for record in records {
            let key = corpus::normalize(&record.question);
            let entry = by_question.entry(key.clone()).or_default();
            if entry.is_empty() {
                order.push(key);
            }
            entry.push(record.clone());
        }

        let mut groups = Vec::new();
        for key in order {
            let members = by_question.remove(&key).unwrap_or_default();
            if members.len() > 1 {
                groups.push(make_group(groups.len() + 1, members, Vec::new()));
            }
        }
        groups
    }

    /// Greedy single-pass near-duplicate grouping.
    ///
    /// For each unassigned record in original order, every later
    /// unassigned record whose similarity meets the threshold
    /// (inclusive) joins its group. Assigned records are never
    /// reconsidered.
    pub fn find_similar_questions(&self, records: &[QaRecord]) -> Vec<DuplicateGroup> {
        let mut groups = Vec::new();
        let mut assigned: HashSet<usize> = HashSet::new();

        for i in 0..records.len() {
            if assigned.contains(&i) {
                continue;
            }
            assigned.insert(i);

            let mut members = vec![records[i].clone()];
            let mut similarities = Vec::new();

            for (j, candidate) in records.iter().enumerate().skip(i + 1) {
                if assigned.contains(&j) {
                    continue;
                }
                let sim = similarity(&records[i].question, &candidate.question);
                if sim >= self.similarity_threshold {
                    members.push(candidate.clone());
                    similarities.push(sim);
                    assigned.insert(j);
                }
            }

            if members.len() > 1 {
                groups.push(make_group(groups.len() + 1, members, similarities));
            }
        }

        groups
    }

    /// Flag groups whose members disagree on the answer.
    pub fn check_answer_consistency(&self, groups: &mut [DuplicateGroup]) -> Vec<DuplicateGroup> {
        let mut inconsistent = Vec::new();

        for group in groups.iter_mut() {
            let answers: Vec<String> = group
                .questions
                .iter()
                .map(|q| q.answer_or_unknown().to_string())
                .collect();
            let mut distinct: Vec<String> = Vec::new();
            for answer in answers {
                if !distinct.contains(&answer) {
                    distinct.push(answer);
                }
            }

            if distinct.len() > 1 {
                group.answer_inconsistency = true;
                group.different_answers = distinct;
                inconsistent.push(group.clone());
            }
        }

        inconsistent
    }

    /// Generate the full duplicate check report for a corpus.
    pub fn generate_report(&self, content: &str, file_label: &str) -> DuplicateReport {
        let records = self.parse_records(content);
        let exact = self.find_exact_duplicates(&records);
        let mut similar = self.find_similar_questions(&records);
        let inconsistent = self.check_answer_consistency(&mut similar);

        tracing::info!(
            total = records.len(),
            exact_groups = exact.len(),
            similar_groups = similar.len(),
            inconsistent_groups = inconsistent.len(),
            "Duplicate detection complete"
        );

        DuplicateReport {
            file_analyzed: file_label.to_string(),
            total_questions: records.len(),
            similarity_threshold: self.similarity_threshold,
            exact_duplicates: DuplicateSection::from_groups(exact),
            similar_questions: DuplicateSection::from_groups(similar),
            answer_inconsistencies: DuplicateSection::from_groups(inconsistent),
        }
    }

    /// Persist a report as pretty-printed JSON.
    pub fn save_report(&self, report: &DuplicateReport, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(report)?)?;
        tracing::info!(path = %path.display(), "Saved duplicate report");
        Ok(())
    }

    /// Build a deduplicated corpus: the first occurrence of each
    /// normalized question is kept, everything else survives in
    /// original relative order.
    pub fn cleaned_corpus(&self, content: &str) -> CleanOutcome {
        let records = self.parse_records(content);
        let mut seen: HashSet<String> = HashSet::new();
        let mut kept = Vec::new();

        for record in &records {
            let key = corpus::normalize(&record.question);
            if seen.insert(key) {
                kept.push(record.full_text.clone());
            }
        }

        let removed = records.len() - kept.len();
        tracing::info!(kept = kept.len(), removed, "Removed exact duplicate questions");

        CleanOutcome {
            cleaned_content: kept.join("\n\n"),
            kept: kept.len(),
            removed,
        }
    }
}

fn make_group(group_id: usize, members: Vec<QaRecord>, similarities: Vec<f64>) -> DuplicateGroup {
    DuplicateGroup {
        group_id,
        count: members.len(),
        questions: members,
        similarities,
        answer_inconsistency: false,
        different_answers: Vec::new(),
    }
}

/// Similarity of two texts after normalization, as a normalized
/// edit-distance ratio in `[0.0, 1.0]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = corpus::normalize(a);
    let b = corpus::normalize(b);
    levenshtein_ratio(&a, &b)
}

/// `1 - levenshtein(a, b) / max(len)`, on characters. Two empty
/// strings are identical (ratio 1.0).
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    if max_len == 0 {
        return 1.0;
    }
    let dist = levenshtein(&a_chars, &b_chars);
    1.0 - (dist as f64 / max_len as f64)
}

/// Classic two-row Levenshtein distance over char slices.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, answer: &str) -> String {
        format!("{question}\nA. x\nB. y\nC. z\nD. w;;{answer}")
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein(&['a', 'b', 'c'], &['a', 'b', 'c']), 0);
        assert_eq!(levenshtein(&['a', 'b', 'c'], &['a', 'x', 'c']), 1);
        assert_eq!(levenshtein(&[], &['a', 'b']), 2);
        assert_eq!(levenshtein(&['k', 'i', 't', 't', 'e', 'n'], &['s', 'i', 't', 't', 'i', 'n', 'g']), 3);
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(levenshtein_ratio("same", "same"), 1.0);
        assert_eq!(levenshtein_ratio("", ""), 1.0);
        assert_eq!(levenshtein_ratio("abcd", "wxyz"), 0.0);
    }

    #[test]
    fn test_similarity_ignores_punctuation_and_case() {
        assert_eq!(similarity("What is Rust?", "what is rust"), 1.0);
    }

    #[test]
    fn test_exact_duplicates_grouped() {
        let corpus = [
            record("What is ownership?", "A"),
            record("Totally different question?", "B"),
            record("What is ownership", "A"),
        ]
        .join("\n\n");

        let detector = DuplicateDetector::new(0.8);
        let records = detector.parse_records(&corpus);
        let groups = detector.find_exact_duplicates(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].questions[0].index, 0);
        assert_eq!(groups[0].questions[1].index, 2);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        // "aaaaaaaaaa" vs "aaaaaaaabb": distance 2 over length 10,
        // ratio exactly 0.8
        assert_eq!(levenshtein_ratio("aaaaaaaaaa", "aaaaaaaabb"), 0.8);

        let corpus = [record("aaaaaaaaaa", "A"), record("aaaaaaaabb", "B")].join("\n\n");
        let detector = DuplicateDetector::new(0.8);
        let records = detector.parse_records(&corpus);
        let groups = detector.find_similar_questions(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].similarities, vec![0.8]);
    }

    #[test]
    fn test_greedy_grouping_is_not_transitive() {
        // b is near a, c is near b but not near a; greedy assigns b
        // to a's group, leaving c alone
        let a = "aaaaaaaaaa";
        let b = "aaaaaaaabb";
        let c = "aaaaaabbbb";
        assert!(levenshtein_ratio(a, b) >= 0.8);
        assert!(levenshtein_ratio(b, c) >= 0.8);
        assert!(levenshtein_ratio(a, c) < 0.8);

        let corpus = [record(a, "A"), record(b, "B"), record(c, "C")].join("\n\n");
        let detector = DuplicateDetector::new(0.8);
        let records = detector.parse_records(&corpus);
        let groups = detector.find_similar_questions(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn test_answer_inconsistency_flagged() {
        let corpus = [record("aaaaaaaaaa", "A"), record("aaaaaaaabb", "B")].join("\n\n");
        let detector = DuplicateDetector::new(0.8);
        let records = detector.parse_records(&corpus);
        let mut groups = detector.find_similar_questions(&records);
        let inconsistent = detector.check_answer_consistency(&mut groups);

        assert_eq!(inconsistent.len(), 1);
        assert!(groups[0].answer_inconsistency);
        assert_eq!(groups[0].different_answers, vec!["A", "B"]);
    }

    #[test]
    fn test_consistent_group_not_flagged() {
        let corpus = [record("aaaaaaaaaa", "A"), record("aaaaaaaabb", "A")].join("\n\n");
        let detector = DuplicateDetector::new(0.8);
        let records = detector.parse_records(&corpus);
        let mut groups = detector.find_similar_questions(&records);
        let inconsistent = detector.check_answer_consistency(&mut groups);

        assert!(inconsistent.is_empty());
        assert!(!groups[0].answer_inconsistency);
    }

    #[test]
    fn test_cleaned_corpus_keeps_first_occurrence() {
        let first = record("What is ownership?", "A");
        let corpus = [
            first.clone(),
            record("Unrelated question?", "B"),
            record("What is ownership", "C"),
        ]
        .join("\n\n");

        let detector = DuplicateDetector::new(0.8);
        let outcome = detector.cleaned_corpus(&corpus);

        assert_eq!(outcome.kept, 2);
        assert_eq!(outcome.removed, 1);
        assert!(outcome.cleaned_content.starts_with(&first));
        assert!(outcome.cleaned_content.contains("Unrelated question?"));
        assert!(!outcome.cleaned_content.contains(";;C"));
    }

    #[test]
    fn test_report_shape() {
        let corpus = [
            record("What is ownership?", "A"),
            record("What is ownership", "B"),
        ]
        .join("\n\n");

        let detector = DuplicateDetector::new(0.8);
        let report = detector.generate_report(&corpus, "merged.txt");

        assert_eq!(report.total_questions, 2);
        assert_eq!(report.exact_duplicates.count, 1);
        assert_eq!(report.exact_duplicates.affected_questions, 2);
        // Identical normalized questions are also near-duplicates
        assert_eq!(report.similar_questions.count, 1);
        assert_eq!(report.answer_inconsistencies.count, 1);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("similarity_threshold"));
    }

    #[test]
    #[should_panic(expected = "similarity_threshold must be within")]
    fn test_invalid_threshold_panics() {
        DuplicateDetector::new(1.5);
    }

    #[test]
    fn test_malformed_records_excluded() {
        let corpus = format!("{}\n\nshort\nrecord", record("Valid question?", "A"));
        let detector = DuplicateDetector::new(0.8);
        assert_eq!(detector.parse_records(&corpus).len(), 1);
    }
}
