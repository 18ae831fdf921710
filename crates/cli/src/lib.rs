// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output grader
//!
//! Runs a program with its stdin closed and captures its stdout and stderr
//! together. Compares the captured lines against a reference transcript and
//! reports whether they match.

pub mod cli;
pub mod compile;
pub mod config;
pub mod grade;
#[doc(hidden)]
pub mod logging;
pub mod report;
pub mod solution;

pub use grade::{exit_codes, GradeError};
