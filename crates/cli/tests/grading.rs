// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

//! End-to-end tests for the autograde binary.
//!
//! Each test writes a small shell program and a solution file into a temp
//! directory, runs the grader against them and checks the printed report.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn grader(&self) -> Command {
        let mut cmd = Command::cargo_bin("autograde").unwrap();
        cmd.current_dir(self.dir.path()).env_remove("AUTOGRADE_CONFIG");
        cmd
    }
}

#[test]
fn matching_output_reports_ok_with_preview() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "printf 'Hello\\nWorld\\n'\n");
    let solution = ws.file("expected.txt", "Hello\nWorld\n");

    ws.grader()
        .args(["--runner", "sh", "--main", &program, "--solution", &solution])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[OK]: Matched\n-------------\n"))
        .stdout(predicate::str::contains(
            "Actual Output:\n--------------\nHello\nWorld\n",
        ))
        .stdout(predicate::str::contains(
            "Your Output:\n------------\nHello\nWorld\n",
        ));
}

#[test]
fn long_matching_output_is_truncated() {
    let ws = Workspace::new();
    let program = ws.file("count.sh", "seq 1 10\n");
    let expected: String = (1..=10).map(|i| format!("{i}\n")).collect();
    let solution = ws.file("expected.txt", &expected);

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\n2\n3\n...\nYour Output:"))
        .stdout(predicate::str::contains("\n4\n").not());
}

#[test]
fn extra_output_reports_mismatch_in_full() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "printf 'Hello\\nWorld'\n");
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("[NOT OK]: MISMATCH\n"))
        .stdout(predicate::str::contains(
            "Actual Output:\n--------------\nHello\nYour Output:\n------------\nHello\nWorld\n",
        ))
        .stdout(predicate::str::contains("+World\n"));
}

#[test]
fn fail_on_mismatch_sets_exit_code() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "echo Goodbye\n");
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .arg("--fail-on-mismatch")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("-Hello\n+Goodbye\n"));
}

#[test]
fn stderr_counts_as_output() {
    let ws = Workspace::new();
    let program = ws.file("mixed.sh", "echo out\necho err >&2\n");
    let solution = ws.file("expected.txt", "out\nerr\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[OK]: Matched"));
}

#[test]
fn missing_program_aborts() {
    let ws = Workspace::new();
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["-m", "autograde-no-such-program-3f9c", "-s", &solution])
        .assert()
        .code(255)
        .stdout(predicate::str::starts_with(
            "Program Failed to Run... Aborting...\n",
        ))
        .stdout(predicate::str::contains("Matched").not())
        .stdout(predicate::str::contains("MISMATCH").not());
}

#[test]
fn failing_program_aborts() {
    let ws = Workspace::new();
    let program = ws.file("fail.sh", "echo Hello\nexit 3\n");
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .assert()
        .code(255)
        .stdout(predicate::str::contains("Program Failed to Run... Aborting..."))
        .stdout(predicate::str::contains("exited with status 3"));
}

#[cfg(target_os = "linux")]
#[test]
fn unwritable_stdout_is_fatal() {
    use assert_cmd::cargo::CommandCargoExt;

    let ws = Workspace::new();
    let program = ws.file("hello.sh", "echo Hello\n");
    let solution = ws.file("expected.txt", "Hello\n");
    let full = std::fs::OpenOptions::new()
        .write(true)
        .open("/dev/full")
        .unwrap();

    let output = std::process::Command::cargo_bin("autograde")
        .unwrap()
        .current_dir(ws.dir.path())
        .env_remove("AUTOGRADE_CONFIG")
        .env_remove("RUST_LOG")
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .stdout(full)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(255));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to write report"), "{stderr}");
}

#[test]
fn missing_solution_aborts() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "echo Hello\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", "absent.txt"])
        .assert()
        .code(255)
        .stdout(predicate::str::starts_with(
            "Can't find solution file... Aborting...\n",
        ));
}

#[test]
fn failing_build_aborts_before_run() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "echo Hello\n");
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .args(["--build", "echo 'syntax error' >&2; exit 1"])
        .assert()
        .code(255)
        .stdout(predicate::str::starts_with("Compilation Failed... Aborting...\n"))
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn build_output_stays_off_stdout() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "echo Hello\n");
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution])
        .args(["--build", "echo compiling noise"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[OK]: Matched"))
        .stdout(predicate::str::contains("compiling noise").not())
        .stderr(predicate::str::contains("compiling noise"));
}

#[test]
fn config_file_supplies_build_and_runner() {
    let ws = Workspace::new();
    ws.file(
        "autograde.toml",
        "[build]\ncommand = \"printf 'echo Hello\\\\n' > Main.sh\"\n\n[run]\nrunner = [\"sh\"]\n",
    );
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["-m", "Main.sh", "-s", &solution])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[OK]: Matched"));
}

#[test]
fn json_format_prints_result_object() {
    let ws = Workspace::new();
    let program = ws.file("hello.sh", "printf 'Hello\\nWorld\\n'\n");
    let solution = ws.file("expected.txt", "Hello\n");

    let output = ws
        .grader()
        .args(["--runner", "sh", "-m", &program, "-s", &solution, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["matched"], false);
    assert_eq!(value["reference"], serde_json::json!(["Hello"]));
    assert_eq!(value["candidate"], serde_json::json!(["Hello", "World"]));
}

#[test]
fn missing_required_option_is_a_usage_error() {
    let ws = Workspace::new();
    ws.grader()
        .args(["--main", "Hello"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn broken_config_aborts() {
    let ws = Workspace::new();
    ws.file("autograde.toml", "[report]\npreview_lines = \"three\"\n");
    let solution = ws.file("expected.txt", "Hello\n");

    ws.grader()
        .args(["-m", "true", "-s", &solution])
        .assert()
        .code(255)
        .stdout(predicate::str::starts_with("Invalid Configuration... Aborting...\n"));
}
