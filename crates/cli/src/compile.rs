// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Build step run before the target.

use std::process::Stdio;

use autograde_capture::{CaptureError, ExitOutcome};
use tokio::process::Command;

/// Run `command` through `sh -c` and wait for it.
///
/// Compiler output goes to our stderr so it never mixes with the report.
pub async fn run_build(command: &str) -> Result<(), CaptureError> {
    log::info!("compiling: {}", command);
    let status = Command::new("sh")
        .args(["-c", command])
        .stdin(Stdio::null())
        .stdout(Stdio::from(std::io::stderr()))
        .status()
        .await
        .map_err(|source| CaptureError::ProcessCreation {
            command: command.to_string(),
            source,
        })?;

    let outcome = ExitOutcome::from(status);
    if !outcome.success() {
        return Err(CaptureError::ProcessFailed {
            command: command.to_string(),
            outcome,
        });
    }
    log::info!("build finished");
    Ok(())
}
