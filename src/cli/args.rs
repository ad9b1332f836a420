// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rearrange a directory tree by editing a text manifest", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Scan a directory and write its content to a manifest file
    Scan {
        /// The directory to scan
        dir: PathBuf,
        /// The manifest file to write
        manifest: PathBuf,
    },
    /// Plan and apply the changes between two manifest files
    Move {
        /// The manifest the directory was scanned into
        original: PathBuf,
        /// The edited manifest describing the target tree
        edited: PathBuf,
    },
    /// Print the copyright notice
    Copyright,
}
