//! Console output and rename-script export.

use anyhow::Context;
use colored::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::convert::{ConversionResult, FileReport};

/// Print one progress line for a converted file.
pub fn write_progress(report: &FileReport) {
    print!("  {} ", "converted".green());
    print!("{}", report.job.input.display());
    let mut notes = vec![format!("{} docstrings", report.converted)];
    if !report.findings.is_empty() {
        notes.push(format!("{} to check", report.findings.len()));
    }
    let skipped = report.skipped().count();
    if skipped > 0 {
        notes.push(format!("{} skipped", skipped));
    }
    println!(" {}", format!("({})", notes.join(", ")).dimmed());
}

/// Render the manual-check section: file, then function, then value.
pub fn format_findings(result: &ConversionResult) -> String {
    let mut out = String::new();
    for file in result.files_with_findings() {
        out.push_str(&format!("{}\n", file.job.output.display()));
        for finding in &file.findings {
            out.push_str(&format!("\t* function: {}\n", finding.function));
            for value in &finding.unmapped {
                out.push_str(&format!("\t└──── value: {}\n", value));
            }
        }
    }
    out
}

/// Write the end-of-run summary.
pub fn write_pretty(result: &ConversionResult, script: Option<&Path>) {
    if result.has_findings() {
        println!();
        println!("{}", "\"Returns\" to check manually:".yellow().bold());
        println!("----------------------------");
        print!("{}", format_findings(result));
    }

    let with_issues: Vec<_> = result.files_with_issues().collect();
    if !with_issues.is_empty() {
        println!();
        println!("{}", "Docstrings left unchanged or parsed with warnings:".yellow());
        for file in with_issues {
            println!("{}", file.job.input.display().to_string().blue());
            for issue in &file.issues {
                let tag = if issue.skips_function() {
                    "skipped".red()
                } else {
                    "warning".yellow()
                };
                println!("\t{} {}", tag, issue);
            }
        }
    }

    println!();
    println!(
        "{} {} converted files to check.",
        "Done!".green().bold(),
        result.converted_files()
    );

    if let Some(path) = script {
        println!(
            " - After checking, run this to overwrite the original files with the converted ones:"
        );
        println!(" sh {}", path.display());
    }
}

/// Write the rename commands, one per line.
pub fn write_script(path: &Path, commands: &[String]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for cmd in commands {
        writeln!(out, "{}", cmd).with_context(|| format!("writing {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::FileJob;
    use crate::docstring::ConversionFinding;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_format_findings_groups_by_output() {
        let mut result = ConversionResult::new();
        result.add(FileReport {
            job: FileJob {
                input: PathBuf::from("m.py"),
                output: PathBuf::from("m.py_xverted.py"),
            },
            converted: 2,
            findings: vec![ConversionFinding {
                function: "split".to_string(),
                unmapped: vec!["head".to_string(), "tail".to_string()],
            }],
            issues: Vec::new(),
        });

        assert_eq!(
            format_findings(&result),
            "m.py_xverted.py\n\t* function: split\n\t└──── value: head\n\t└──── value: tail\n"
        );
    }

    #[test]
    fn test_write_script() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("apply.sh");
        let commands = vec![
            "mv a.py_xverted.py a.py".to_string(),
            "mv b.py_xverted.py b.py".to_string(),
        ];
        write_script(&path, &commands).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "mv a.py_xverted.py a.py\nmv b.py_xverted.py b.py\n"
        );
    }
}
