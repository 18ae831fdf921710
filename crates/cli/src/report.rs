// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of comparison results.
//!
//! On a match only the first few lines of each transcript are shown; on a
//! mismatch both are printed in full, followed by a line diff.

use std::io::{self, Write};
use std::num::NonZeroUsize;

use autograde_capture::ComparisonResult;
use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};

use crate::cli::OutputFormat;

pub const MATCHED_BANNER: &str = "[OK]: Matched";
pub const MISMATCH_BANNER: &str = "[NOT OK]: MISMATCH";
pub const REFERENCE_HEADER: &str = "Actual Output:";
pub const CANDIDATE_HEADER: &str = "Your Output:";
pub const DIFF_HEADER: &str = "Diff (- expected, + yours):";
pub const TRUNCATION_MARKER: &str = "...";

/// How a result is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    pub preview_lines: NonZeroUsize,
    pub diff: bool,
    pub format: OutputFormat,
}

/// Write `result` to `writer` in the configured format.
pub fn write_report<W: Write>(
    result: &ComparisonResult,
    options: &ReportOptions,
    writer: &mut W,
) -> io::Result<()> {
    match options.format {
        OutputFormat::Text => write_text(result, options, writer),
        OutputFormat::Json => write_json(result, writer),
    }
}

fn write_text<W: Write>(
    result: &ComparisonResult,
    options: &ReportOptions,
    writer: &mut W,
) -> io::Result<()> {
    let (banner, limit) = if result.matched() {
        (MATCHED_BANNER, Some(options.preview_lines.get()))
    } else {
        (MISMATCH_BANNER, None)
    };

    write_heading(writer, banner)?;
    write_section(writer, REFERENCE_HEADER, result.reference(), limit)?;
    write_section(writer, CANDIDATE_HEADER, result.candidate(), limit)?;

    if !result.matched() && options.diff {
        write_diff(writer, result)?;
    }
    writer.flush()
}

/// A line followed by a dashed underline of the same width.
fn write_heading<W: Write>(writer: &mut W, heading: &str) -> io::Result<()> {
    writeln!(writer, "{}", heading)?;
    writeln!(writer, "{}", "-".repeat(heading.chars().count()))
}

fn write_section<W: Write>(
    writer: &mut W,
    header: &str,
    lines: &[String],
    limit: Option<usize>,
) -> io::Result<()> {
    write_heading(writer, header)?;
    let shown = limit.map_or(lines.len(), |n| n.min(lines.len()));
    for line in &lines[..shown] {
        writeln!(writer, "{}", line)?;
    }
    if shown < lines.len() {
        writeln!(writer, "{}", TRUNCATION_MARKER)?;
    }
    Ok(())
}

fn write_diff<W: Write>(writer: &mut W, result: &ComparisonResult) -> io::Result<()> {
    if let Some(index) = result.first_difference() {
        writeln!(writer, "First difference at line {}", index + 1)?;
    }
    write_heading(writer, DIFF_HEADER)?;

    // Diff the raw bytes so lines that only differ in invalid UTF-8 still
    // show up as changes.
    let expected: Vec<&[u8]> = result.reference().bytes().collect();
    let actual: Vec<&[u8]> = result.candidate().bytes().collect();
    for op in capture_diff_slices(Algorithm::Myers, &expected, &actual) {
        let (tag, old, new) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => write_prefixed(writer, ' ', &result.reference()[old])?,
            DiffTag::Delete => write_prefixed(writer, '-', &result.reference()[old])?,
            DiffTag::Insert => write_prefixed(writer, '+', &result.candidate()[new])?,
            DiffTag::Replace => {
                write_prefixed(writer, '-', &result.reference()[old])?;
                write_prefixed(writer, '+', &result.candidate()[new])?;
            }
        }
    }
    Ok(())
}

fn write_prefixed<W: Write>(writer: &mut W, sign: char, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(writer, "{}{}", sign, line)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a ComparisonResult,
    first_difference: Option<usize>,
}

fn write_json<W: Write>(result: &ComparisonResult, writer: &mut W) -> io::Result<()> {
    let report = JsonReport {
        result,
        first_difference: result.first_difference(),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
