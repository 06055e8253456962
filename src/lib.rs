//! Quizmill - Quiz Data Correction Pipeline
//!
//! A pipeline for turning raw, noisy quiz text (typically extracted
//! from scanned documents) into a clean question-and-answer corpus:
//! split into bounded chunks, corrected through an LLM service,
//! merged back in order, validated, and deduplicated.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (interface-agnostic)
//!   - config, error, types
//!   - corpus (shared QA record grammar)
//!   - splitter (chunking with safe cut points)
//!   - corrector (retrying client, Gemini backend)
//!   - merger (order-preserving concatenation)
//!   - validator (answer rules, placeholder repair)
//!   - dedup (exact + near-duplicate detection)
//!   - workflow (stage orchestration)
//!
//! - **cli**: clap adapter (depends on core)
//!
//! # Key Properties
//!
//! - Chunk order is corpus order (zero-padded artifact names)
//! - Per-chunk correction failures never abort a batch
//! - Validation findings are data (reports), not errors
//! - Every artifact is a plain file, inspectable between stages

// Core domain logic (interface-agnostic)
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{QuizmillError, Result};
pub use core::types::*;
