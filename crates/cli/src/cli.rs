// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Run a program and compare its output against a reference transcript
#[derive(Parser, Debug, Clone)]
#[command(name = "autograde", version, about)]
pub struct Cli {
    /// Program to run, or the main class when a runner is configured
    #[arg(short = 'm', long = "main", value_name = "TARGET", value_parser = NonEmptyStringValueParser::new())]
    pub main: String,

    /// File holding the expected output, one line per line
    #[arg(short = 's', long, value_name = "PATH")]
    pub solution: PathBuf,

    /// Configuration file [default: ./autograde.toml if present]
    #[arg(long, env = "AUTOGRADE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Shell command that builds the target before it runs
    #[arg(long, value_name = "CMD", conflicts_with = "no_build")]
    pub build: Option<String>,

    /// Skip the build step even if the configuration names one
    #[arg(long)]
    pub no_build: bool,

    /// Program that runs the target (e.g. `java`)
    #[arg(long, value_name = "PROGRAM")]
    pub runner: Option<String>,

    /// Lines of each transcript shown when the output matches
    #[arg(long, value_name = "N")]
    pub preview_lines: Option<NonZeroUsize>,

    /// Do not print a diff on mismatch
    #[arg(long)]
    pub no_diff: bool,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Exit with status 1 when the output does not match
    #[arg(long)]
    pub fail_on_mismatch: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Report format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Banner and transcripts for humans
    #[default]
    Text,
    /// The comparison result as JSON
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
