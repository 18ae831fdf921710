// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the capture pipeline.

use nix::errno::Errno;
use thiserror::Error;

use crate::launcher::ExitOutcome;
use crate::pipe::PipeEnd;

/// Errors raised while launching a child and capturing its output.
///
/// Every variant is fatal for a grading run; callers propagate them with `?`.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to allocate pipe: {0}")]
    ResourceExhausted(#[source] Errno),

    #[error("failed to create process for `{command}`: {source}")]
    ProcessCreation {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {outcome}")]
    ProcessFailed {
        command: String,
        outcome: ExitOutcome,
    },

    #[error("failed to read {stream}: {source}")]
    StreamRead {
        stream: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} end of pipe was already closed")]
    InvalidHandle(PipeEnd),

    #[error("failed to wait for process {pid}: {source}")]
    Reap {
        pid: i32,
        #[source]
        source: Errno,
    },

    #[error("capture task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CaptureError {
    /// Whether the error came from reading the child's output stream.
    pub fn is_stream_read(&self) -> bool {
        matches!(self, CaptureError::StreamRead { .. })
    }
}
