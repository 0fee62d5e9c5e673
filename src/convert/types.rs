//! Result types for a conversion run.

use std::path::PathBuf;

use crate::docstring::{ConversionFinding, DocError};

/// An input file and where its converted copy goes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl FileJob {
    /// Shell command that replaces the input with its converted copy.
    pub fn rename_command(&self) -> String {
        format!("mv {} {}", self.output.display(), self.input.display())
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub job: FileJob,
    /// Number of docstrings replaced.
    pub converted: usize,
    pub findings: Vec<ConversionFinding>,
    pub issues: Vec<DocError>,
}

impl FileReport {
    /// Issues that left a docstring unconverted.
    pub fn skipped(&self) -> impl Iterator<Item = &DocError> {
        self.issues.iter().filter(|e| e.skips_function())
    }
}

/// Results of a whole run.
#[derive(Debug, Clone, Default)]
pub struct ConversionResult {
    pub files: Vec<FileReport>,
    /// `mv` commands, one per converted file, in processing order.
    pub commands: Vec<String>,
}

impl ConversionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a converted file.
    pub fn add(&mut self, report: FileReport) {
        self.commands.push(report.job.rename_command());
        self.files.push(report);
    }

    /// Number of files written.
    pub fn converted_files(&self) -> usize {
        self.commands.len()
    }

    /// Files with return values needing a manual check.
    pub fn files_with_findings(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.findings.is_empty())
    }

    /// Files where some docstrings were left unconverted or parsed with warnings.
    pub fn files_with_issues(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.issues.is_empty())
    }

    pub fn has_findings(&self) -> bool {
        self.files_with_findings().next().is_some()
    }

    pub fn finding_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.findings)
            .map(|f| f.unmapped.len())
            .sum()
    }
}
