//! Batch conversion: discovery, per-file pipeline runs and their results.

mod files;
mod runner;
mod types;

pub use files::{contains_tag, find_convertible_files};
pub use runner::Runner;
pub use types::{ConversionResult, FileJob, FileReport};
