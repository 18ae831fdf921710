// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output grader binary entry point.

use std::io::Write;
use std::path::Path;

use clap::Parser;

use autograde::cli::Cli;
use autograde::{exit_codes, grade, logging, GradeError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut stdout = std::io::stdout();
    let code = match grade::execute(&cli, Path::new("."), &mut stdout).await {
        Ok(code) => code,
        Err(err) => {
            log::debug!("aborting: {:?}", err);
            if let Err(write_err) = write_failure(&mut stdout, &err) {
                log::error!("{}", err);
                log::debug!("could not print failure: {}", write_err);
            }
            exit_codes::FATAL
        }
    };

    let code = match stdout.flush() {
        Ok(()) => code,
        Err(err) => {
            log::error!("Failed to write report: {}", err);
            exit_codes::FATAL
        }
    };
    std::process::exit(code);
}

/// Headline, then the typed cause beneath it.
fn write_failure<W: Write>(writer: &mut W, err: &GradeError) -> std::io::Result<()> {
    writeln!(writer, "{}", err.headline())?;
    writeln!(writer, "  {}", err)?;
    writer.flush()
}
