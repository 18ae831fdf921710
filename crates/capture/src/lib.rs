// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess launch and output capture.
//!
//! This crate runs a program with its stdin closed and its stdout and
//! stderr merged into one pipe. It drains that pipe into lines and compares
//! them against a reference. Unix only.

pub mod compare;
mod error;
pub mod launcher;
pub mod lines;
pub mod pipe;
pub mod session;

pub use compare::{compare, ComparisonResult};
pub use error::CaptureError;
pub use launcher::{spawn, ChildProcess, CommandLine, ExitOutcome, Spawn};
pub use lines::{drain, LineSequence};
pub use pipe::{PipeChannel, PipeEnd};
pub use session::capture;
