// src/core/ops/operation.rs

use crate::core::tree::{EntryId, Level};
use std::cmp::Reverse;
use std::path::PathBuf;

/// File operation type, in execution precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpType {
    /// Copy a file or directory out to temporary space.
    CopyOut,
    /// Move a file or directory out to temporary space, or remove it.
    MoveOut,
    /// Copy a file or directory in from temporary space, or create one.
    CopyIn,
}

/// One planned file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// File operation type.
    pub op: OpType,
    /// Entry id of the file or directory.
    pub entry: EntryId,
    /// Source or target path, depending on the type.
    pub path: PathBuf,
    /// Source or target directory level.
    pub level: Level,
    /// Pivot level for sorting.
    pub pivot: Level,
    /// Number of copies to be made, zero for removals and created
    /// directories.
    pub copies: u32,
}

impl Operation {
    /// Ordering key: deepest pivot first, then shallow paths first within a
    /// layer, then all outs before any ins, then entry id as a tie break.
    pub(crate) fn sort_key(&self) -> (Reverse<Level>, Level, OpType, EntryId) {
        (Reverse(self.pivot), self.level, self.op, self.entry)
    }
}
