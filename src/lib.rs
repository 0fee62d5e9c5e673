//! xvert - plain to NumPy docstring converter.
//!
//! xvert finds Python files whose docstrings use single-line `:param` and
//! `:return` tags and writes converted copies using NumPy-style
//! "Parameters" / "Returns" sections, plus a script of `mv` commands to apply
//! them once checked.
//!
//! # Architecture
//!
//! - `docstring`: the transformation pipeline (signature parsing, scanning,
//!   synthesis, rewriting)
//! - `convert`: file discovery and the per-file runner
//! - `config`: optional YAML settings
//! - `report`: console output and the rename script
//! - `cli`: command-line surface
//! - `logger`: tracing setup for the binary

pub mod cli;
pub mod config;
pub mod convert;
pub mod docstring;
pub mod logger;
pub mod report;

pub use config::Config;
pub use convert::{find_convertible_files, ConversionResult, FileJob, FileReport, Runner};
pub use docstring::{ConversionFinding, DocError, FunctionRecord, Signature};
