// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Child process creation with redirected standard streams.
//!
//! [`spawn`] forks, binds the child's stdin to the input pipe and both
//! stdout and stderr to the output pipe, then execs the target. Exec
//! failures travel back to the parent over a close-on-exec status pipe, so
//! callers get [`Spawn::LaunchFailed`] instead of a child that silently
//! exits 127.

use std::ffi::CString;
use std::fmt;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::raw::c_char;

use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};

use crate::error::CaptureError;
use crate::pipe::PipeChannel;

/// Exit status of a child whose exec failed.
pub const EXEC_FAILED_STATUS: i32 = 127;

/// A program to run, looked up on `PATH`, and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// argv for `execvp`: the program name followed by the arguments.
    fn to_argv(&self) -> std::io::Result<Vec<CString>> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| {
                CString::new(part.as_bytes()).map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "argument contains a nul byte",
                    )
                })
            })
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a child process terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(i32),
}

impl ExitOutcome {
    /// Only a normal exit with status 0 counts as success.
    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitOutcome::Exited(code) => Some(*code),
            ExitOutcome::Signaled(_) => None,
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exited with status {}", code),
            ExitOutcome::Signaled(sig) => match Signal::try_from(*sig) {
                Ok(signal) => write!(f, "was terminated by {}", signal.as_str()),
                Err(_) => write!(f, "was terminated by signal {}", sig),
            },
        }
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match (status.code(), status.signal()) {
            (Some(code), _) => ExitOutcome::Exited(code),
            (None, Some(sig)) => ExitOutcome::Signaled(sig),
            (None, None) => ExitOutcome::Exited(-1),
        }
    }
}

/// Result of a launch attempt.
#[derive(Debug)]
pub enum Spawn {
    /// The target image is running.
    Spawned(ChildProcess),
    /// The child could not exec the target; it has already been reaped.
    LaunchFailed(std::io::Error),
}

/// A running child process and the parent's end of its output pipe.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
    command: CommandLine,
    output: Option<OwnedFd>,
}

impl ChildProcess {
    pub fn id(&self) -> i32 {
        self.pid.as_raw()
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    /// Take the read end of the child's merged stdout/stderr.
    pub fn take_output(&mut self) -> Result<OwnedFd, CaptureError> {
        self.output
            .take()
            .ok_or(CaptureError::InvalidHandle(crate::pipe::PipeEnd::Read))
    }

    /// Block until the child terminates and reap it.
    pub fn wait(self) -> Result<ExitOutcome, CaptureError> {
        reap(self.pid)
    }
}

/// Raw descriptors the child touches between `fork` and `exec`.
struct ChildFds {
    stdin: RawFd,
    output: RawFd,
    output_read: RawFd,
    status_read: RawFd,
    status_write: RawFd,
}

/// Launch `command` with its stdin on `input` and its stdout and stderr on
/// `output`.
///
/// The input channel's write end is closed before forking, so the child
/// sees an already-closed stdin. The parent keeps only the output read end,
/// which the returned [`ChildProcess`] owns.
pub fn spawn(
    command: &CommandLine,
    mut input: PipeChannel,
    mut output: PipeChannel,
) -> Result<Spawn, CaptureError> {
    let creation_error = |source: std::io::Error| CaptureError::ProcessCreation {
        command: command.to_string(),
        source,
    };

    // argv must be built before the fork: the child may not allocate.
    let argv = command.to_argv().map_err(creation_error)?;
    let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
    argv_ptrs.push(std::ptr::null());

    input.close_write()?;
    let stdin_read = input.take_read()?;
    let output_read = output.take_read()?;
    let output_write = output.take_write()?;

    let mut status = PipeChannel::create()?;
    let status_read = status.take_read()?;
    let status_write = status.take_write()?;

    let fds = ChildFds {
        stdin: stdin_read.as_raw_fd(),
        output: output_write.as_raw_fd(),
        output_read: output_read.as_raw_fd(),
        status_read: status_read.as_raw_fd(),
        status_write: status_write.as_raw_fd(),
    };

    // SAFETY: between fork and exec the child only calls fcntl, dup2, close,
    // signal, execvp, write and _exit on memory prepared above.
    let forked = unsafe { fork() }.map_err(|errno| creation_error(errno.into()))?;

    match forked {
        ForkResult::Child => exec_child(&argv_ptrs, &fds),
        ForkResult::Parent { child } => {
            // The child holds its own copies; ours would keep the pipes open.
            drop(stdin_read);
            drop(output_write);
            drop(status_write);

            let launched = ChildProcess {
                pid: child,
                command: command.clone(),
                output: Some(output_read),
            };

            match read_exec_errno(&status_read) {
                Ok(None) => {
                    log::debug!("spawned `{}` as pid {}", command, child);
                    Ok(Spawn::Spawned(launched))
                }
                Ok(Some(errno)) => {
                    let outcome = launched.wait()?;
                    log::debug!("`{}` failed to exec and {}", command, outcome);
                    Ok(Spawn::LaunchFailed(std::io::Error::from_raw_os_error(
                        errno,
                    )))
                }
                Err(source) => Err(CaptureError::StreamRead {
                    stream: format!("exec status of `{}`", command),
                    source,
                }),
            }
        }
    }
}

/// Child side of [`spawn`]. Never returns.
fn exec_child(argv: &[*const c_char], fds: &ChildFds) -> ! {
    // SAFETY: every call below is async-signal-safe and only reads memory
    // that was allocated before the fork.
    unsafe {
        // Pipe ends can sit on 0-2 when the caller runs with a standard
        // stream closed; binding one stream would then clobber another end.
        let status_write = match lift(fds.status_write) {
            -1 => report_exec_failure(fds.status_write),
            fd => fd,
        };
        let stdin = lift(fds.stdin);
        let output = lift(fds.output);
        if stdin < 0
            || output < 0
            || libc::dup2(stdin, libc::STDIN_FILENO) < 0
            || libc::dup2(output, libc::STDOUT_FILENO) < 0
            || libc::dup2(output, libc::STDERR_FILENO) < 0
        {
            report_exec_failure(status_write);
        }

        // Lifted copies are close-on-exec; the originals may not be.
        for fd in [fds.stdin, fds.output, fds.output_read, fds.status_read] {
            if fd > libc::STDERR_FILENO {
                libc::close(fd);
            }
        }

        // Rust ignores SIGPIPE and ignored dispositions survive exec.
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);

        libc::execvp(argv[0], argv.as_ptr());
        report_exec_failure(status_write)
    }
}

/// Return `fd` if it is above stderr, otherwise a close-on-exec duplicate
/// that is. Returns -1 on failure.
unsafe fn lift(fd: RawFd) -> RawFd {
    if fd > libc::STDERR_FILENO {
        fd
    } else {
        libc::fcntl(fd, libc::F_DUPFD_CLOEXEC, libc::STDERR_FILENO + 1)
    }
}

/// Send errno to the parent and exit with [`EXEC_FAILED_STATUS`].
unsafe fn report_exec_failure(status_write: RawFd) -> ! {
    let errno = (Errno::last() as i32).to_ne_bytes();
    libc::write(status_write, errno.as_ptr().cast(), errno.len());
    libc::_exit(EXEC_FAILED_STATUS)
}

/// Read the child's exec report: `None` when exec succeeded (EOF).
fn read_exec_errno(status: &OwnedFd) -> std::io::Result<Option<i32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match nix::unistd::read(status.as_raw_fd(), &mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(i32::from_ne_bytes(buf))),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated exec status report",
        )),
    }
}

fn reap(pid: Pid) -> Result<ExitOutcome, CaptureError> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitOutcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ExitOutcome::Signaled(signal as i32))
            }
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(source) => {
                return Err(CaptureError::Reap {
                    pid: pid.as_raw(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
