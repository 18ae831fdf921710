// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One grading run: load reference, build, capture, compare, report.
//!
//! Every failure is fatal and surfaces as a [`GradeError`]; there is no
//! partial result.

use std::io::Write;
use std::path::{Path, PathBuf};

use autograde_capture::{capture, CaptureError, ComparisonResult};
use thiserror::Error;

use crate::cli::Cli;
use crate::compile::run_build;
use crate::config::{ConfigError, GraderConfig, Settings};
use crate::report::write_report;
use crate::solution;

/// Process exit codes
pub mod exit_codes {
    /// Comparison completed
    pub const SUCCESS: i32 = 0;
    /// Output did not match and `--fail-on-mismatch` was given
    pub const MISMATCH: i32 = 1;
    /// Run aborted before a result was produced
    pub const FATAL: i32 = 255;
}

/// Errors that abort a grading run
#[derive(Debug, Error)]
pub enum GradeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Solution file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read solution file {}: {source}", path.display())]
    SolutionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Build step failed: {0}")]
    Build(#[source] CaptureError),

    #[error(transparent)]
    Run(CaptureError),

    #[error("Failed to write report: {0}")]
    Report(#[source] std::io::Error),
}

impl GradeError {
    /// One-line status printed before the detailed cause.
    pub fn headline(&self) -> &'static str {
        match self {
            GradeError::Config(_) => "Invalid Configuration... Aborting...",
            GradeError::MissingFile(_) => "Can't find solution file... Aborting...",
            GradeError::SolutionRead { .. } => "Can't read solution file... Aborting...",
            GradeError::Build(_) => "Compilation Failed... Aborting...",
            GradeError::Run(err) if err.is_stream_read() => {
                "Error Reading from File Descriptor! Aborting..."
            }
            GradeError::Run(_) => "Program Failed to Run... Aborting...",
            GradeError::Report(_) => "Failed to Write Report... Aborting...",
        }
    }
}

/// Load the reference, build, run the target and compare.
pub async fn grade(settings: &Settings) -> Result<ComparisonResult, GradeError> {
    let reference = solution::load(&settings.solution)?;

    if let Some(build) = &settings.build {
        run_build(build).await.map_err(GradeError::Build)?;
    }

    let command = settings.command();
    log::info!("running `{}`", command);
    let output = capture(&command).await.map_err(GradeError::Run)?;

    let result = ComparisonResult::new(output, reference);
    log::info!("comparison {}", if result.matched() { "matched" } else { "mismatched" });
    Ok(result)
}

/// Resolve settings for `cli`, grade, and write the report to `writer`.
///
/// Returns the process exit code for a completed comparison.
pub async fn execute<W: Write>(cli: &Cli, dir: &Path, writer: &mut W) -> Result<i32, GradeError> {
    let config = GraderConfig::discover(cli.config.as_deref(), dir)?;
    let settings = Settings::resolve(cli, config);

    let result = grade(&settings).await?;
    write_report(&result, &settings.report, writer).map_err(GradeError::Report)?;

    if !result.matched() && settings.fail_on_mismatch {
        Ok(exit_codes::MISMATCH)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

#[cfg(test)]
#[path = "grade_tests.rs"]
mod tests;
