//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific CLI command. Commands map one-to-one onto pipeline stages.

pub mod completions;
pub mod config;
pub mod correct;
pub mod dedup;
pub mod merge;
pub mod run;
pub mod split;
pub mod validate;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use correct::CorrectArgs;
pub use dedup::DedupArgs;
pub use merge::MergeArgs;
pub use run::RunArgs;
pub use split::SplitArgs;
pub use validate::ValidateArgs;
