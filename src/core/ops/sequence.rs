// src/core/ops/sequence.rs

//! Records file operations and sorts them into a feasible order.

use crate::core::error::VifiError;
use crate::core::exec::Executor;
use crate::core::ops::operation::{OpType, Operation};
use crate::core::tree::{hex_width, EntryId, Level};
use std::path::{Path, PathBuf};

/// Ordered collection of planned file operations.
///
/// Operations are recorded by [`FileTree::generate`](crate::FileTree::generate),
/// sorted and checked by [`OpSequence::prepare`], and applied to an
/// [`Executor`] by [`OpSequence::run`]. Between the out- and in-operations
/// every entry passes through the executor's temporary space, named by its
/// hex id; see [`OpSequence::temp_name`].
#[derive(Debug, Default)]
pub struct OpSequence {
    /// All recorded file operations.
    ops: Vec<Operation>,
    /// Maximum entry id encountered.
    max_entry: EntryId,
}

impl OpSequence {
    /// Empty operation sequence.
    pub fn new() -> Self {
        OpSequence::default()
    }

    /// Indicate an empty operation sequence.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Maximum entry id encountered so far.
    pub fn max_entry_id(&self) -> EntryId {
        self.max_entry
    }

    /// Raise the maximum entry id used for hex id width.
    pub fn note_max_entry_id(&mut self, id: EntryId) {
        self.max_entry = self.max_entry.max(id);
    }

    /// Add a file operation out to temporary space.
    ///
    /// `keep` selects a copy instead of a move, used when the original stays
    /// in place while duplicates are made elsewhere. A move with zero
    /// `copies` removes the entry outright.
    pub fn add_out_op(
        &mut self,
        entry: EntryId,
        path: PathBuf,
        keep: bool,
        level: Level,
        pivot: Level,
        copies: u32,
    ) {
        let op = if keep { OpType::CopyOut } else { OpType::MoveOut };
        self.ops.push(Operation {
            op,
            entry,
            path,
            level,
            pivot,
            copies,
        });
        self.note_max_entry_id(entry);
    }

    /// Add a file operation in from temporary space.
    ///
    /// `create` requests an empty directory instead of staged content.
    pub fn add_in_op(
        &mut self,
        entry: EntryId,
        path: PathBuf,
        create: bool,
        level: Level,
        pivot: Level,
    ) {
        let copies = if create { 0 } else { 1 };
        self.ops.push(Operation {
            op: OpType::CopyIn,
            entry,
            path,
            level,
            pivot,
            copies,
        });
        self.note_max_entry_id(entry);
    }

    /// Check and sort operations into a feasible order.
    ///
    /// Sorts by pivot, level, type and entry id, then walks the result
    /// keeping a per-entry balance of staged copies. A balance that goes
    /// negative means more in- than out-copies were scheduled for an entry.
    pub fn prepare(&mut self) -> Result<(), VifiError> {
        self.ops.sort_by_key(Operation::sort_key);
        let mut balance = vec![0i64; self.max_entry + 1];
        for op in &self.ops {
            match op.op {
                OpType::CopyOut | OpType::MoveOut => balance[op.entry] += i64::from(op.copies),
                OpType::CopyIn => balance[op.entry] -= i64::from(op.copies),
            }
            if balance[op.entry] < 0 {
                return Err(VifiError::CopyAccounting {
                    path: op.path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Execute the file operations against the given executor.
    ///
    /// The per-entry copy balance decides how each operation degrades: a
    /// move out with zero copies is a removal, a copy in with zero copies
    /// creates a directory, and the last copy in of an entry turns into a
    /// move that evacuates the temporary space.
    pub fn run(&self, executor: &mut dyn Executor) -> Result<(), VifiError> {
        let mut balance = vec![0i64; self.max_entry + 1];
        for op in &self.ops {
            match op.op {
                OpType::CopyOut => {
                    balance[op.entry] += i64::from(op.copies);
                    executor.copy_out(op.entry, &op.path)?;
                }
                OpType::MoveOut => {
                    balance[op.entry] += i64::from(op.copies);
                    if op.copies > 0 {
                        executor.move_out(op.entry, &op.path)?;
                    } else {
                        executor.remove(&op.path)?;
                    }
                }
                OpType::CopyIn => {
                    balance[op.entry] -= i64::from(op.copies);
                    if op.copies == 0 {
                        executor.create_dir(&op.path)?;
                    } else if balance[op.entry] > 0 {
                        executor.copy_in(op.entry, &op.path)?;
                    } else {
                        executor.move_in(op.entry, &op.path)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Render the file operations for user inspection.
    ///
    /// One line per operation, with entry paths relative to `base` and
    /// staging paths taken from the executor.
    pub fn render(&self, base: &Path, executor: &dyn Executor) -> String {
        let mut out = String::new();
        let mut balance = vec![0i64; self.max_entry + 1];
        for op in &self.ops {
            let path = op.path.strip_prefix(base).unwrap_or(&op.path);
            let temp = executor.temporary(op.entry);
            match op.op {
                OpType::CopyOut => {
                    balance[op.entry] += i64::from(op.copies);
                    out.push_str(&format!("{} <=== {}\n", temp.display(), path.display()));
                }
                OpType::MoveOut => {
                    balance[op.entry] += i64::from(op.copies);
                    if op.copies > 0 {
                        out.push_str(&format!("{} <--- {}\n", temp.display(), path.display()));
                    } else {
                        out.push_str(&format!("[x] <--- {}\n", path.display()));
                    }
                }
                OpType::CopyIn => {
                    balance[op.entry] -= i64::from(op.copies);
                    if op.copies == 0 {
                        out.push_str(&format!("[*] ---> {}\n", path.display()));
                    } else if balance[op.entry] > 0 {
                        out.push_str(&format!("{} ===> {}\n", temp.display(), path.display()));
                    } else {
                        out.push_str(&format!("{} ---> {}\n", temp.display(), path.display()));
                    }
                }
            }
        }
        out
    }

    /// Name to store an entry under in temporary space, the lowercase hex
    /// rendering of its id padded to the width of the maximum id.
    pub fn temp_name(&self, entry: EntryId) -> String {
        format!("{:0width$x}", entry, width = hex_width(self.max_entry))
    }

    /// All recorded operations in current order.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }
}

impl PartialEq for OpSequence {
    fn eq(&self, other: &Self) -> bool {
        self.ops == other.ops
    }
}
