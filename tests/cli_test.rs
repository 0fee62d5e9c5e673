//! Binary-level tests for the xvert command.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn xvert() -> Command {
    let mut cmd = Command::cargo_bin("xvert").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write_project(root: &std::path::Path) {
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(
        root.join("lib/io_utils.py"),
        r#"def load(path: str, mode: str = 'r') -> str, int:
    """
    Read a file.
    :param path: file to read
    :param mode: open mode
    :return text: file content
    """
    text = open(path, mode).read()
    return text, size
"#,
    )
    .unwrap();
    fs::write(root.join("lib/empty.py"), "x = 1\n").unwrap();
}

#[test]
fn test_requires_input_folder() {
    xvert()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--i-folder"));
}

#[test]
fn test_converts_and_reports() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    let script = temp.path().join("apply.sh");

    xvert()
        .arg("-i")
        .arg(temp.path())
        .arg("-o")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Returns\" to check manually:"))
        .stdout(predicate::str::contains("\t* function: load"))
        .stdout(predicate::str::contains("\t└──── value: size"))
        .stdout(predicate::str::contains("Done! 1 converted files to check."))
        .stdout(predicate::str::contains(format!("sh {}", script.display())));

    let input = temp.path().join("lib/io_utils.py");
    let output = temp.path().join("lib/io_utils.py_xverted.py");
    assert_eq!(
        fs::read_to_string(&script).unwrap(),
        format!("mv {} {}\n", output.display(), input.display())
    );

    let converted = fs::read_to_string(&output).unwrap();
    assert!(converted.contains("    mode : str\n        open mode\n        Default: 'r'\n"));
    assert!(converted.contains("    text : str\n        file content\n"));
    assert!(!temp.path().join("lib/empty.py_xverted.py").exists());
}

#[test]
fn test_without_script_path() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());

    xvert()
        .arg("--i-folder")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done! 1 converted files to check."))
        .stdout(predicate::str::contains("sh ").not());
}

#[test]
fn test_nothing_to_convert() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("m.py"), "def f():\n    return 1\n").unwrap();

    xvert()
        .arg("-i")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done! 0 converted files to check."));
    assert!(!temp.path().join("m.py_xverted.py").exists());
}

#[test]
fn test_missing_folder_is_an_error() {
    let temp = TempDir::new().unwrap();
    xvert()
        .arg("-i")
        .arg(temp.path().join("missing"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}
