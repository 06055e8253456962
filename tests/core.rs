//! Core module integration tests
//!
//! File-level tests for the pipeline stages:
//! - Splitter: chunk artifacts, manifest and summary on disk
//! - Merger: order-preserving merge of corrected artifacts
//! - Validator: report persistence and placeholder repair
//! - Dedup: report persistence and cleaned corpus output

mod common;

// Core submodules - tests/core/ directory
mod core {
    pub mod test_dedup;
    pub mod test_merger;
    pub mod test_splitter;
    pub mod test_validator;
}
