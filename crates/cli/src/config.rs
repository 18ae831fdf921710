// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Grader configuration from `autograde.toml` and command-line overrides.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use autograde_capture::CommandLine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{Cli, OutputFormat};
use crate::report::ReportOptions;

/// Config file picked up from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "autograde.toml";
/// Lines of each transcript shown on a match
pub const DEFAULT_PREVIEW_LINES: NonZeroUsize = NonZeroUsize::MIN.saturating_add(2);

fn default_preview_lines() -> NonZeroUsize {
    DEFAULT_PREVIEW_LINES
}

fn default_diff() -> bool {
    true
}

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration file
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GraderConfig {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Build step run before the target
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Shell command, e.g. "javac *.java"
    #[serde(default)]
    pub command: Option<String>,
}

/// How the target is launched
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Program and leading arguments placed before the target, e.g. ["java"]
    #[serde(default)]
    pub runner: Vec<String>,
}

/// Report rendering
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_preview_lines")]
    pub preview_lines: NonZeroUsize,

    /// Print a diff on mismatch
    #[serde(default = "default_diff")]
    pub diff: bool,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_lines: DEFAULT_PREVIEW_LINES,
            diff: true,
            format: OutputFormat::Text,
        }
    }
}

impl GraderConfig {
    /// Parse TOML text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, otherwise `dir/autograde.toml` if it
    /// exists, otherwise defaults. A named file that is missing is an error.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }
}

/// Everything one grading run needs, after merging CLI and file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub target: String,
    pub solution: PathBuf,
    pub build: Option<String>,
    pub runner: Vec<String>,
    pub report: ReportOptions,
    pub fail_on_mismatch: bool,
}

impl Settings {
    /// Command-line flags win over the config file.
    pub fn resolve(cli: &Cli, config: GraderConfig) -> Self {
        let build = if cli.no_build {
            None
        } else {
            cli.build.clone().or(config.build.command)
        };
        let runner = match &cli.runner {
            Some(program) => vec![program.clone()],
            None => config.run.runner,
        };

        Self {
            target: cli.main.clone(),
            solution: cli.solution.clone(),
            build,
            runner,
            report: ReportOptions {
                preview_lines: cli.preview_lines.unwrap_or(config.report.preview_lines),
                diff: config.report.diff && !cli.no_diff,
                format: cli.format.unwrap_or(config.report.format),
            },
            fail_on_mismatch: cli.fail_on_mismatch,
        }
    }

    /// The target, prefixed by the runner when one is configured.
    pub fn command(&self) -> CommandLine {
        match self.runner.split_first() {
            Some((program, args)) => CommandLine::new(program.as_str())
                .args(args.iter().cloned())
                .arg(self.target.as_str()),
            None => CommandLine::new(self.target.as_str()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
