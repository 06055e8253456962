//! Configuration management for the quizmill pipeline.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{QuizmillError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub correction: CorrectionConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

/// Chunk splitting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Target questions per chunk (size estimate, not a hard bound)
    #[serde(default = "default_questions_per_chunk")]
    pub questions_per_chunk: usize,
}

/// Correction service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorrectionConfig {
    /// Model identifier sent to the correction service
    #[serde(default = "default_model")]
    pub model: String,

    /// Retry attempts per chunk before recording it as failed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Fixed delay between retry attempts, in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Pacing delay between chunks (rate limiting), in seconds
    #[serde(default = "default_pacing_delay")]
    pub pacing_delay_secs: u64,

    /// Environment variable holding the service API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Duplicate detection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DedupConfig {
    /// Similarity threshold for near-duplicate grouping (inclusive)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

/// Artifact directory configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    /// Directory for raw chunk artifacts
    #[serde(default = "default_chunks_dir")]
    pub chunks_dir: PathBuf,

    /// Directory for corrected chunk artifacts
    #[serde(default = "default_corrected_dir")]
    pub corrected_dir: PathBuf,

    /// File name for the merged corpus
    #[serde(default = "default_merged_file")]
    pub merged_file: PathBuf,
}

// Default value functions
fn default_questions_per_chunk() -> usize {
    30
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_attempts() -> usize {
    3
}

fn default_retry_delay() -> u64 {
    5
}

fn default_pacing_delay() -> u64 {
    2
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_chunks_dir() -> PathBuf {
    PathBuf::from("raw_chunks")
}

fn default_corrected_dir() -> PathBuf {
    PathBuf::from("corrected_chunks")
}

fn default_merged_file() -> PathBuf {
    PathBuf::from("final_corrected_quiz_data.txt")
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            questions_per_chunk: default_questions_per_chunk(),
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay(),
            pacing_delay_secs: default_pacing_delay(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            chunks_dir: default_chunks_dir(),
            corrected_dir: default_corrected_dir(),
            merged_file: default_merged_file(),
        }
    }
}

impl CorrectionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_secs(self.pacing_delay_secs)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| QuizmillError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// File lookup order:
    /// 1. QUIZMILL_CONFIG env var
    /// 2. ./quizmill.toml
    /// 3. XDG config file (~/.config/quizmill/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("QUIZMILL_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("quizmill.toml").exists() {
            Self::from_file("quizmill.toml")?
        } else {
            let xdg_config = dirs::config_dir()
                .map(|d| d.join("quizmill").join("config.toml"))
                .filter(|p| p.exists());
            match xdg_config {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(size) = env::var("QUIZMILL_QUESTIONS_PER_CHUNK") {
            if let Ok(size) = size.parse() {
                self.chunking.questions_per_chunk = size;
            }
        }
        if let Ok(model) = env::var("QUIZMILL_MODEL") {
            self.correction.model = model;
        }
        if let Ok(attempts) = env::var("QUIZMILL_MAX_ATTEMPTS") {
            if let Ok(attempts) = attempts.parse() {
                self.correction.max_attempts = attempts;
            }
        }
        if let Ok(delay) = env::var("QUIZMILL_PACING_DELAY_SECS") {
            if let Ok(delay) = delay.parse() {
                self.correction.pacing_delay_secs = delay;
            }
        }
        if let Ok(threshold) = env::var("QUIZMILL_SIMILARITY_THRESHOLD") {
            if let Ok(threshold) = threshold.parse() {
                self.dedup.similarity_threshold = threshold;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.questions_per_chunk == 0 {
            return Err(QuizmillError::ConfigError(
                "questions_per_chunk must be > 0".to_string(),
            ));
        }
        if self.correction.max_attempts == 0 {
            return Err(QuizmillError::ConfigError(
                "max_attempts must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dedup.similarity_threshold) {
            return Err(QuizmillError::ConfigError(format!(
                "similarity_threshold {} out of range 0.0-1.0",
                self.dedup.similarity_threshold
            )));
        }
        Ok(())
    }
}
