// src/main.rs

//! The `vifi` command-line application.
//!
//! Parses the command line, dispatches to the library, and maps errors to
//! exit codes: 0 for success, 1 for input errors and user cancellation, 2
//! for failed filesystem operations.

use clap::Parser;
use std::process::ExitCode;
use vifi::cli::{run_move, run_scan, CliArgs, CliCommand, MoveOutcome};
use vifi::VifiError;

const COPYRIGHT: &str = concat!(
    "vifi ",
    env!("CARGO_PKG_VERSION"),
    " - rearrange a directory tree by editing a text manifest.\n",
    "Distributed under the terms of the MIT license.",
);

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match args.command {
        CliCommand::Scan { dir, manifest } => match run_scan(&dir, &manifest) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                print_error_chain(&error);
                ExitCode::from(2)
            }
        },
        CliCommand::Move { original, edited } => match run_move(&original, &edited) {
            Ok(MoveOutcome::Cancelled) => ExitCode::from(1),
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => {
                print_error_chain(&error);
                if error.is_input_error() {
                    ExitCode::from(1)
                } else {
                    ExitCode::from(2)
                }
            }
        },
        CliCommand::Copyright => {
            println!("{COPYRIGHT}");
            ExitCode::SUCCESS
        }
    }
}

/// Print an error and its source chain to stderr, indented by nest level.
fn print_error_chain(error: &VifiError) {
    let mut current: Option<&dyn std::error::Error> = Some(error);
    let mut level = 0;
    while let Some(e) = current {
        eprintln!("{:indent$}{}", "", e, indent = level * 2);
        current = e.source();
        level += 1;
    }
}
