//! Plain-to-NumPy docstring transformation pipeline.
//!
//! A file goes through three stages:
//!
//! - [`scanner`]: collects each function's signature (via [`signature`]),
//!   its `return` values and its plain `:param`/`:return` docstring
//! - [`synthesizer`]: builds the NumPy block for each function and reports
//!   return values it could not map to a documented name
//! - [`rewriter`]: copies the file, replacing each docstring's line range

pub mod rewriter;
pub mod scanner;
pub mod signature;
pub mod synthesizer;
mod types;

pub use rewriter::{rewrite, rewrite_to_string};
pub use scanner::{scan_lines, scan_str, ScannedFile, Tags, DELIMITER};
pub use signature::parse_definition;
pub use synthesizer::{synthesize, synthesize_file, Replacement, Synthesized};
pub use types::{
    ConversionFinding, DocBlock, DocError, FunctionRecord, LineRange, ParameterSpec, Sections,
    Signature,
};
