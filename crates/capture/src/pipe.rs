// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unidirectional OS pipes with single-owner endpoints.
//!
//! Each endpoint is an [`OwnedFd`] that lives in exactly one place, so it is
//! closed exactly once, when its owner drops it. A reader only observes
//! end-of-stream after every copy of the write end is gone, including copies
//! inherited across `fork`.

use std::fmt;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

use nix::fcntl::OFlag;

use crate::error::CaptureError;

/// Which side of a pipe an operation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeEnd {
    Read,
    Write,
}

impl fmt::Display for PipeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeEnd::Read => f.write_str("read"),
            PipeEnd::Write => f.write_str("write"),
        }
    }
}

/// One OS pipe: a read end and a write end.
#[derive(Debug)]
pub struct PipeChannel {
    read: Option<OwnedFd>,
    write: Option<OwnedFd>,
}

impl PipeChannel {
    /// Allocate a new pipe. Both ends are close-on-exec from the moment
    /// they exist, so a fork on another thread can never inherit them.
    pub fn create() -> Result<Self, CaptureError> {
        let (read, write) =
            nix::unistd::pipe2(OFlag::O_CLOEXEC).map_err(CaptureError::ResourceExhausted)?;
        Ok(Self {
            read: Some(read),
            write: Some(write),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_ends(read: OwnedFd, write: OwnedFd) -> Self {
        Self {
            read: Some(read),
            write: Some(write),
        }
    }

    /// Borrow the read end, if it is still held.
    pub fn read_end(&self) -> Option<BorrowedFd<'_>> {
        self.read.as_ref().map(|fd| fd.as_fd())
    }

    /// Borrow the write end, if it is still held.
    pub fn write_end(&self) -> Option<BorrowedFd<'_>> {
        self.write.as_ref().map(|fd| fd.as_fd())
    }

    /// Move the read end out to a new owner.
    pub fn take_read(&mut self) -> Result<OwnedFd, CaptureError> {
        self.read.take().ok_or(CaptureError::InvalidHandle(PipeEnd::Read))
    }

    /// Move the write end out to a new owner.
    pub fn take_write(&mut self) -> Result<OwnedFd, CaptureError> {
        self.write
            .take()
            .ok_or(CaptureError::InvalidHandle(PipeEnd::Write))
    }

    /// Close the read end. Fails if it was already closed or taken.
    pub fn close_read(&mut self) -> Result<(), CaptureError> {
        drop(self.take_read()?);
        Ok(())
    }

    /// Close the write end. Fails if it was already closed or taken.
    pub fn close_write(&mut self) -> Result<(), CaptureError> {
        drop(self.take_write()?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipe_tests.rs"]
mod tests;
