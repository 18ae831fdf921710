// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.

use env_logger::Env;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the logger. `RUST_LOG` takes precedence over `-v`.
pub fn init(verbosity: u8) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(verbosity)))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
