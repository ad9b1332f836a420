// src/lib.rs

//! `vifi` is a library for rearranging a directory tree by editing a text
//! manifest, together with the `vifi` command-line binary built on it.
//!
//! A directory is scanned into a line-oriented manifest that assigns every
//! file and directory a stable hex id. The user edits the manifest (changing
//! paths, duplicating lines to copy, removing lines to delete, introducing
//! intermediate directories) and the planner computes a sorted sequence of
//! filesystem operations that reconciles the tree with the edit, without
//! clobbering data even for swaps and cycles.
//!
//! # Key pieces
//!
//! - [`FileTree`] - Combined original and target tree with identity
//!   tracking; computes per-level moves and generates operations.
//! - [`OpSequence`] - Ordered operation collection; validates copy
//!   accounting, prints the plan, and replays itself against an executor.
//! - [`Executor`] - The side-effecting primitives an execution needs;
//!   [`FsOpRunner`] implements them against the real filesystem with a
//!   single staging directory.
//! - [`scan_directory`] / [`read_manifest`] / [`write_manifest`] - The
//!   collaborators that produce and persist labeled trees.
//!
//! # Example
//!
//! ```no_run
//! use vifi::{FileTree, FsOpRunner, OpSequence};
//!
//! fn main() -> Result<(), vifi::VifiError> {
//!     let mut tree = FileTree::new();
//!     vifi::read_manifest_text("# ViFi@/base\n01\tfile.txt\n", &mut tree)?;
//!     tree.end_original()?;
//!     vifi::read_manifest_text("# ViFi@/base\n01\tdocs/file.txt\n", &mut tree)?;
//!     tree.end_target()?;
//!
//!     let mut sequence = OpSequence::new();
//!     tree.generate(&mut sequence);
//!     sequence.prepare()?;
//!
//!     let mut runner = FsOpRunner::new("/base/.vifi-tmp", sequence.max_entry_id())?;
//!     sequence.run(&mut runner)?;
//!     runner.finish()?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;

// Re-export key types for the public API
pub use crate::core::error::VifiError;
pub use crate::core::exec::{Executor, FsOpRunner};
pub use crate::core::manifest::{
    manifest_to_string, read_manifest, read_manifest_text, write_manifest,
};
pub use crate::core::ops::{OpSequence, OpType, Operation};
pub use crate::core::tree::{EntryId, FileTree, Level, NodeRef, Slot, ROOT_ID};
pub use crate::core::walker::scan_directory;
