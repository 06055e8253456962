//! Error types and error handling for the quizmill pipeline.
//!
//! Stage-level failures (missing input, zero mergeable chunks) are
//! errors; per-record problems found during validation or duplicate
//! detection are data and live in the reports instead.

use thiserror::Error;

/// Result type alias for quizmill operations
pub type Result<T> = std::result::Result<T, QuizmillError>;

/// Main error type for the quizmill pipeline
#[derive(Error, Debug)]
pub enum QuizmillError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No chunk artifacts found in {0}")]
    NoChunksFound(String),

    #[error("Correction failed for {chunk}: {reason}")]
    CorrectionFailed { chunk: String, reason: String },

    #[error("Correction service error: {0}")]
    ServiceError(String),

    #[error("Stage '{stage}' failed: {reason}")]
    StageFailed { stage: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl QuizmillError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error aborts the whole stage that produced it.
    ///
    /// Service errors are retried and then recorded per chunk; they
    /// never abort a run on their own.
    pub fn is_stage_fatal(&self) -> bool {
        !matches!(
            self,
            QuizmillError::CorrectionFailed { .. } | QuizmillError::ServiceError(_)
        )
    }

    /// Check if this is a bad input error (caller mistake)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            QuizmillError::InvalidInput(_) | QuizmillError::ConfigError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_failure_is_not_stage_fatal() {
        let err = QuizmillError::CorrectionFailed {
            chunk: "raw_chunk_001.txt".to_string(),
            reason: "empty response".to_string(),
        };
        assert!(!err.is_stage_fatal());
        assert!(!err.is_bad_request());
    }

    #[test]
    fn test_no_chunks_is_stage_fatal() {
        let err = QuizmillError::NoChunksFound("corrected_chunks".to_string());
        assert!(err.is_stage_fatal());
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = QuizmillError::InvalidInput("empty file".to_string());
        assert!(err.is_bad_request());
        assert!(err.is_stage_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = QuizmillError::from(io_err);
        assert!(err.is_stage_fatal());
    }

    #[test]
    fn test_error_message() {
        let err = QuizmillError::StageFailed {
            stage: "merge".to_string(),
            reason: "no corrected chunks".to_string(),
        };
        assert!(err.message().contains("merge"));
        assert!(err.message().contains("no corrected chunks"));
    }
}
