//! Core domain logic (interface-agnostic)
//!
//! This module contains all pipeline logic, independent of how it
//! is invoked (CLI today, other adapters later).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures (chunks, manifests, summaries)
//! - **corpus**: Shared QA record grammar and normalization
//! - **splitter**: Raw text chunking with safe cut points
//! - **corrector**: Retrying correction client + Gemini backend
//! - **merger**: Order-preserving chunk merge
//! - **validator**: Answer validation rules and placeholder repair
//! - **dedup**: Exact and near-duplicate detection
//! - **workflow**: Success-gated stage orchestration

pub mod config;
pub mod corpus;
pub mod corrector;
pub mod dedup;
pub mod error;
pub mod merger;
pub mod splitter;
pub mod types;
pub mod validator;
pub mod workflow;

// Re-export key types for convenience
pub use config::Config;
pub use error::{QuizmillError, Result};
