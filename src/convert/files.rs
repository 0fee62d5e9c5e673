//! Discovery of files that still carry plain docstrings.

use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

use super::FileJob;
use crate::config::Config;

/// Whether any line of the file contains `tag`.
pub fn contains_tag(path: &Path, tag: &str) -> anyhow::Result<bool> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.contains(tag) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Walk `root` and pair every convertible source file with its output path.
///
/// Results are sorted by input path.
pub fn find_convertible_files(root: &Path, config: &Config) -> anyhow::Result<Vec<FileJob>> {
    let excluded = config.excluded_set()?;
    let mut jobs = Vec::new();

    // Symlinks are not followed, so loops and out-of-tree targets are never visited.
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            // Never prune the root itself, even if it is hidden.
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if config.skip_hidden && e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            !excluded.is_match(e.path())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !config.is_source_name(name) {
            continue;
        }
        if !contains_tag(path, &config.param_tag)? {
            tracing::debug!(path = %path.display(), "no plain docstrings, skipping");
            continue;
        }
        jobs.push(FileJob {
            input: path.to_path_buf(),
            output: config.output_path(path),
        });
    }

    jobs.sort();
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PLAIN: &str = "def f(x):\n    \"\"\"\n    :param x: value\n    \"\"\"\n";

    #[test]
    fn test_finds_only_files_with_tags() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pkg/sub")).unwrap();
        fs::write(root.join("pkg/a.py"), PLAIN).unwrap();
        fs::write(root.join("pkg/sub/b.py"), PLAIN).unwrap();
        fs::write(root.join("pkg/plain.py"), "x = 1\n").unwrap();
        fs::write(root.join("pkg/a.py_xverted.py"), PLAIN).unwrap();
        fs::write(root.join("pkg/notes.txt"), PLAIN).unwrap();

        let jobs = find_convertible_files(root, &Config::default()).unwrap();
        let inputs: Vec<_> = jobs
            .iter()
            .map(|j| j.input.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            inputs,
            vec![Path::new("pkg/a.py").to_path_buf(), Path::new("pkg/sub/b.py").to_path_buf()]
        );
        assert_eq!(jobs[0].output, root.join("pkg/a.py_xverted.py"));
    }

    #[test]
    fn test_hidden_and_excluded_dirs_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".venv")).unwrap();
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::write(root.join(".venv/lib.py"), PLAIN).unwrap();
        fs::write(root.join("vendor/dep.py"), PLAIN).unwrap();
        fs::write(root.join("main.py"), PLAIN).unwrap();

        let config = Config {
            excluded_paths: vec!["**/vendor".to_string()],
            ..Default::default()
        };
        let jobs = find_convertible_files(root, &config).unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].input.ends_with("main.py"));

        let config = Config {
            skip_hidden: false,
            ..Default::default()
        };
        let jobs = find_convertible_files(root, &config).unwrap();
        assert_eq!(jobs.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("proj");
        let outside = temp.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(root.join("main.py"), PLAIN).unwrap();
        fs::write(outside.join("ext.py"), PLAIN).unwrap();
        symlink(&root, root.join("loop")).unwrap();
        symlink(&outside, root.join("link")).unwrap();

        let jobs = find_convertible_files(&root, &Config::default()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].input, root.join("main.py"));
    }

    #[test]
    fn test_empty_when_no_tags() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("m.py"), "def f():\n    return 1\n").unwrap();
        let jobs = find_convertible_files(temp.path(), &Config::default()).unwrap();
        assert!(jobs.is_empty());
    }
}
