// Test fixtures for integration testing

use async_trait::async_trait;
use quizmill::core::corrector::Corrector;
use quizmill::core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build one well-formed QA record
pub fn qa_record(question: &str, answer: &str) -> String {
    format!(
        "{question}\nA. first option\nB. second option\nC. third option\nD. fourth option;;{answer}"
    )
}

/// Build a corpus of distinct well-formed records
#[allow(dead_code)]
pub fn quiz_corpus(count: usize) -> String {
    (0..count)
        .map(|i| {
            qa_record(
                &format!("What is the meaning of concept number {i}?"),
                ["A", "B", "C", "D"][i % 4],
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Corrector stub that returns chunk text unchanged
#[allow(dead_code)] // Used in integration tests
pub struct PassthroughCorrector;

#[async_trait]
impl Corrector for PassthroughCorrector {
    async fn correct(&self, chunk_text: &str) -> Result<String> {
        Ok(chunk_text.to_string())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

/// Temporary working directory with a raw input file
#[allow(dead_code)] // Used in integration tests
pub struct TestWorkspace {
    pub dir: TempDir,
    pub input: PathBuf,
}

impl TestWorkspace {
    #[allow(dead_code)] // Used in integration tests
    pub fn with_corpus(corpus: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("raw_extracted_text.txt");
        fs::write(&input, corpus).unwrap();
        Self { dir, input }
    }

    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[allow(dead_code)]
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap()
    }

    #[allow(dead_code)]
    pub fn exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }
}
