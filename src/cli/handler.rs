// src/cli/handler.rs

//! Command handlers for the `vifi` binary.

use crate::core::error::VifiError;
use crate::core::exec::FsOpRunner;
use crate::core::manifest::{read_manifest, write_manifest};
use crate::core::ops::OpSequence;
use crate::core::tree::FileTree;
use crate::core::walker::scan_directory;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Name of the staging directory, placed next to the original manifest.
/// Dotted so that a later scan does not pick up leftovers.
const STAGING_DIR: &str = ".vifi-tmp";

/// How a `move` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Operations were executed.
    Executed,
    /// The manifests describe the same tree.
    NoChanges,
    /// The user declined the plan.
    Cancelled,
}

/// A planned `move` before the user confirmed it.
pub struct MovePlan {
    pub tree: FileTree,
    pub sequence: OpSequence,
    pub staging: PathBuf,
}

/// Scan a directory and write its content to a manifest file.
pub fn run_scan(dir: &Path, manifest: &Path) -> Result<(), VifiError> {
    let mut tree = FileTree::new();
    scan_directory(dir, &mut tree)?;
    write_manifest(&tree, manifest)
}

/// Read both manifests and compute the sorted operation sequence.
pub fn plan_move(original: &Path, edited: &Path) -> Result<MovePlan, VifiError> {
    let mut tree = FileTree::new();
    read_manifest(original, &mut tree)?;
    tree.end_original()?;
    read_manifest(edited, &mut tree)?;
    tree.end_target()?;

    let mut sequence = OpSequence::new();
    tree.generate(&mut sequence);
    sequence.prepare()?;

    let staging = original
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(STAGING_DIR);
    Ok(MovePlan {
        tree,
        sequence,
        staging,
    })
}

/// Plan the changes between two manifests, prompt, and execute.
pub fn run_move(original: &Path, edited: &Path) -> Result<MoveOutcome, VifiError> {
    let plan = plan_move(original, edited)?;
    let mut runner = FsOpRunner::new(&plan.staging, plan.sequence.max_entry_id())?;

    if plan.sequence.is_empty() {
        println!("No changes detected.");
        runner.finish()?;
        return Ok(MoveOutcome::NoChanges);
    }

    print!("{}", plan.sequence.render(plan.tree.base_path(), &runner));
    print!("Do you want to execute operations? [y|n] ");
    io::stdout().flush()?;

    if prompt_confirmation()? {
        println!("Executing operations...");
        plan.sequence.run(&mut runner)?;
        runner.finish()?;
        println!("Done.");
        Ok(MoveOutcome::Executed)
    } else {
        println!("Cancel.");
        Ok(MoveOutcome::Cancelled)
    }
}

/// Read single characters from stdin until the user answers yes or no.
/// End of input counts as no.
fn prompt_confirmation() -> Result<bool, VifiError> {
    let mut stdin = io::stdin().lock();
    let mut buffer = [0u8; 1];
    loop {
        if stdin.read(&mut buffer)? == 0 {
            return Ok(false);
        }
        match buffer[0] {
            b'y' | b'Y' => return Ok(true),
            b'n' | b'N' => return Ok(false),
            c if c.is_ascii_whitespace() => {}
            _ => println!("Type 'y' for yes (proceed), 'n' for no (cancel)."),
        }
    }
}
