// src/cli/mod.rs
mod args;
mod handler;

// Re-export the CLI surface used by the binary.
pub use args::{CliArgs, CliCommand};
pub use handler::{plan_move, run_move, run_scan, MoveOutcome, MovePlan};
