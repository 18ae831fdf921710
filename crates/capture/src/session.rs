// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One capture run: launch, drain and reap.

use std::fs::File;

use crate::error::CaptureError;
use crate::launcher::{self, CommandLine, Spawn};
use crate::lines::{self, LineSequence};
use crate::pipe::PipeChannel;

/// Run `command` to completion and return its merged stdout/stderr as lines.
///
/// The output pipe is drained while the child is waited on, so a child that
/// writes more than the kernel pipe buffer never blocks against us. Any
/// outcome other than a clean exit is [`CaptureError::ProcessFailed`] and
/// the captured lines are discarded.
pub async fn capture(command: &CommandLine) -> Result<LineSequence, CaptureError> {
    let input = PipeChannel::create()?;
    let output = PipeChannel::create()?;

    let mut child = match launcher::spawn(command, input, output)? {
        Spawn::Spawned(child) => child,
        Spawn::LaunchFailed(source) => {
            return Err(CaptureError::ProcessCreation {
                command: command.to_string(),
                source,
            })
        }
    };

    let stream = child.take_output()?;
    let reader = tokio::task::spawn_blocking(move || lines::drain(File::from(stream)));
    let waiter = tokio::task::spawn_blocking(move || child.wait());
    let (drained, waited) = tokio::join!(reader, waiter);

    let outcome = waited??;
    if !outcome.success() {
        return Err(CaptureError::ProcessFailed {
            command: command.to_string(),
            outcome,
        });
    }
    log::info!("finished executing program");

    let lines = drained?.map_err(|source| CaptureError::StreamRead {
        stream: format!("output of `{}`", command),
        source,
    })?;
    log::info!("finished reading output ({} lines)", lines.len());
    Ok(lines)
}
