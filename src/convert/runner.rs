//! Runs the docstring pipeline over a set of files.

use anyhow::Context;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use super::{ConversionResult, FileJob, FileReport};
use crate::config::Config;
use crate::docstring::{rewrite, scan_str, synthesize_file, Tags};

/// Converts files one at a time, in the order given.
pub struct Runner {
    tags: Tags,
}

impl Runner {
    /// Create a runner using the tags from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            tags: config.tags(),
        }
    }

    /// Scan, synthesize and rewrite a single file.
    ///
    /// Only I/O failures are returned as errors; per-function problems end up
    /// in the report.
    pub fn convert_file(&self, job: &FileJob) -> anyhow::Result<FileReport> {
        let content = fs::read_to_string(&job.input)
            .with_context(|| format!("reading {}", job.input.display()))?;

        let scanned = scan_str(&content, &self.tags);
        let synthesized = synthesize_file(&scanned);

        let file = File::create(&job.output)
            .with_context(|| format!("creating {}", job.output.display()))?;
        let mut out = BufWriter::new(file);
        rewrite(&content, &synthesized.replacements, &mut out)
            .and_then(|_| out.flush())
            .with_context(|| format!("writing {}", job.output.display()))?;

        tracing::debug!(
            input = %job.input.display(),
            converted = synthesized.replacements.len(),
            findings = synthesized.findings.len(),
            "file converted"
        );

        Ok(FileReport {
            job: job.clone(),
            converted: synthesized.replacements.len(),
            findings: synthesized.findings,
            issues: scanned.issues,
        })
    }

    /// Convert every job, calling `on_file` after each one.
    ///
    /// Stops at the first I/O error; files already written stay in place.
    pub fn run<F>(&self, jobs: &[FileJob], mut on_file: F) -> anyhow::Result<ConversionResult>
    where
        F: FnMut(&FileReport),
    {
        let mut result = ConversionResult::new();
        for job in jobs {
            let report = self.convert_file(job)?;
            on_file(&report);
            result.add(report);
        }
        Ok(result)
    }
}
