// src/core/tree/mod.rs

//! Combined original and target file tree.
//!
//! The nodes of the file tree each represent a unique path, with both the
//! original and the edited paths combined in a single tree. When
//! transitioning from the original to the target tree, the actual file or
//! directory object located at a path may change in time, as it is moved
//! away or replaced by a different object. Each path node therefore records
//! the object located there for every layer of the transition, identified by
//! the unique id assigned in the original file tree.
//!
//! Typical usage goes as follows:
//! 1. Add the path nodes of the original file tree through
//!    [`FileTree::add_entry`] / [`FileTree::add_entry_with_id`].
//! 2. Finish the original file tree with [`FileTree::end_original`].
//! 3. Add the path nodes of the edited file tree through the same methods.
//! 4. Finish the edited file tree with [`FileTree::end_target`].
//! 5. Let [`FileTree::generate`] fill a [`OpSequence`] from the changes.

mod node;

pub use node::{EntryId, Level, NodeRef, Slot, ROOT_ID};

pub(crate) use node::{hex_width, MAX_LEVEL};

use crate::core::error::VifiError;
use crate::core::ops::OpSequence;
use node::{Move, Node};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Node index cache sorted by parent directory and entry name.
///
/// Rebuilt on demand whenever the arena grew since the last build; any
/// mutation of the tree adds nodes, so the length check is sufficient as a
/// staleness flag.
#[derive(Debug, Default)]
struct IndexCache {
    order: Vec<usize>,
    built_for: usize,
}

/// File tree composed of directory entry path nodes.
#[derive(Debug)]
pub struct FileTree {
    /// Path of the base directory the tree is rooted at.
    base: PathBuf,
    /// Node arena; index 0 is the base directory.
    nodes: Vec<Node>,
    /// Access to original nodes by entry id.
    by_id: Vec<Option<usize>>,
    /// Set while loading the original file tree.
    original: bool,
    /// Nodes sorted by directory and name.
    index: RefCell<IndexCache>,
}

impl FileTree {
    /// Initialize an empty file tree, ready for the original phase.
    pub fn new() -> Self {
        FileTree {
            base: PathBuf::new(),
            nodes: vec![Node::new(None, Some(ROOT_ID), Some(ROOT_ID), String::new(), 0)],
            by_id: vec![Some(0)],
            original: true,
            index: RefCell::new(IndexCache::default()),
        }
    }

    /// Clear all data, restoring the empty state.
    pub fn clear(&mut self) {
        self.base = PathBuf::new();
        self.nodes.clear();
        self.nodes
            .push(Node::new(None, Some(ROOT_ID), Some(ROOT_ID), String::new(), 0));
        self.by_id.clear();
        self.by_id.push(Some(0));
        self.original = true;
        let mut cache = self.index.borrow_mut();
        cache.order.clear();
        cache.built_for = 0;
    }

    /// Path of the base directory.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// Set the base directory path and return the base node.
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) -> NodeRef {
        self.base = path.into();
        NodeRef(0)
    }

    /// Node of the base directory.
    pub fn base_node(&self) -> NodeRef {
        NodeRef(0)
    }

    /// Maximum id used by any entry of the original file tree.
    pub fn max_entry_id(&self) -> EntryId {
        self.by_id.len() - 1
    }

    /// Complete path of a file tree node.
    pub fn node_path(&self, node: NodeRef) -> PathBuf {
        let mut parts = Vec::new();
        let mut at = node.0;
        while let Some(dir) = self.nodes[at].dir {
            parts.push(self.nodes[at].name.clone());
            at = dir;
        }
        let mut path = self.base.clone();
        for part in parts.iter().rev() {
            path.push(part);
        }
        path
    }

    /// Entry name of a file tree node in its parent directory.
    pub fn node_name(&self, node: NodeRef) -> &str {
        &self.nodes[node.0].name
    }

    /// Original entry id of a file tree node, `None` for pure target paths.
    pub fn node_id(&self, node: NodeRef) -> Option<EntryId> {
        self.nodes[node.0].entry
    }

    /// Add an entry node to the given directory.
    ///
    /// In the original phase the entry is assigned the next free id. In the
    /// target phase this marks an intermediate path without an id of its
    /// own; see [`FileTree::add_entry_with_id`] for the id-carrying variant.
    pub fn add_entry(&mut self, dir: NodeRef, name: &str) -> Result<NodeRef, VifiError> {
        if self.original {
            self.add_original(dir, self.by_id.len(), name)
        } else {
            Ok(self.add_target(dir, None, name))
        }
    }

    /// Add an entry node with a fixed id to the given directory.
    ///
    /// In the original phase the id must be unused. In the target phase an
    /// existing node at the same path is re-targeted to the id (the last
    /// assignment wins); otherwise a new pure target node is created.
    /// Multiple target paths carrying the same id mean "copy".
    pub fn add_entry_with_id(
        &mut self,
        dir: NodeRef,
        id: EntryId,
        name: &str,
    ) -> Result<NodeRef, VifiError> {
        if self.original {
            self.add_original(dir, id, name)
        } else {
            Ok(self.add_target(dir, Some(id), name))
        }
    }

    /// Ends loading the original tree, prepares for the target phase.
    ///
    /// Verifies that the original ids `0..=max` are each taken exactly once.
    pub fn end_original(&mut self) -> Result<(), VifiError> {
        for (id, slot) in self.by_id.iter().enumerate() {
            if slot.is_none() {
                return Err(VifiError::SparseIds { id });
            }
        }
        self.original = false;
        // Warm the index of the original file tree.
        self.with_index(|_, _| ());
        Ok(())
    }

    /// Ends loading the target tree, prepares for [`FileTree::generate`].
    pub fn end_target(&mut self) -> Result<(), VifiError> {
        self.compute_pivots()?;
        self.compute_moves();
        Ok(())
    }

    /// Entries of a directory node, sorted by name.
    pub fn entries(&self, dir: NodeRef) -> Vec<NodeRef> {
        self.with_index(|nodes, order| {
            let lo = order.partition_point(|&i| nodes[i].dir.unwrap_or(0) < dir.0);
            let hi = order.partition_point(|&i| nodes[i].dir.unwrap_or(0) <= dir.0);
            order[lo..hi].iter().map(|&i| NodeRef(i)).collect()
        })
    }

    /// Generate the file operation sequence from the computed moves.
    ///
    /// Emits one in-operation per layer that materializes an entry or
    /// creates a directory, and one out-operation per layer that vacates or
    /// removes one, counting how many copies of each entry the in side
    /// consumes. The result still has to be sorted by
    /// [`OpSequence::prepare`](crate::core::ops::OpSequence::prepare).
    pub fn generate(&self, sequence: &mut OpSequence) {
        sequence.note_max_entry_id(self.max_entry_id());
        // Count target copies and add the operations in from temporary space.
        let mut copies = vec![0u32; self.by_id.len()];
        for at in 1..self.nodes.len() {
            let node = &self.nodes[at];
            for p in (1..=node.level).rev() {
                let mv = node.mv(p);
                match mv.to {
                    Slot::Entry(to) if mv.from != mv.to => {
                        sequence.add_in_op(to, self.node_path(NodeRef(at)), false, node.level, p);
                        copies[to] += 1;
                    }
                    Slot::CreateDir if mv.from != mv.to => {
                        sequence.add_in_op(
                            ROOT_ID,
                            self.node_path(NodeRef(at)),
                            true,
                            node.level,
                            p,
                        );
                    }
                    _ => {}
                }
            }
        }
        // Add the operations out to temporary space.
        for at in 1..self.nodes.len() {
            let node = &self.nodes[at];
            for p in (1..=node.level).rev() {
                let mv = node.mv(p);
                let deepest = p == node.level;
                match mv.from {
                    Slot::Entry(from) if deepest && (mv.from != mv.to || copies[from] > 0) => {
                        let keep = mv.from == mv.to;
                        sequence.add_out_op(
                            from,
                            self.node_path(NodeRef(at)),
                            keep,
                            node.level,
                            p,
                            copies[from],
                        );
                    }
                    Slot::Entry(from) if mv.from != mv.to => {
                        sequence.add_out_op(from, self.node_path(NodeRef(at)), false, node.level, p, 0);
                    }
                    Slot::CreateDir if mv.from != mv.to => {
                        sequence.add_out_op(
                            ROOT_ID,
                            self.node_path(NodeRef(at)),
                            false,
                            node.level,
                            p,
                            0,
                        );
                    }
                    _ => {}
                }
            }
        }
    }

    fn add_original(
        &mut self,
        dir: NodeRef,
        id: EntryId,
        name: &str,
    ) -> Result<NodeRef, VifiError> {
        if self.by_id.len() <= id {
            self.by_id.resize(id + 1, None);
        } else if self.by_id[id].is_some() {
            return Err(VifiError::IdConflict {
                id,
                name: name.to_string(),
            });
        }
        let level = self.nodes[dir.0].level + 1;
        let at = self.nodes.len();
        self.nodes
            .push(Node::new(Some(dir.0), Some(id), None, name.to_string(), level));
        self.by_id[id] = Some(at);
        Ok(NodeRef(at))
    }

    fn add_target(&mut self, dir: NodeRef, target: Option<EntryId>, name: &str) -> NodeRef {
        if let Some(existing) = self.find_child(dir.0, name) {
            // Existing path, set the target entry id accordingly.
            self.nodes[existing].target = target;
            NodeRef(existing)
        } else {
            // No existing path, create a pure target node.
            let level = self.nodes[dir.0].level + 1;
            let at = self.nodes.len();
            self.nodes
                .push(Node::new(Some(dir.0), None, target, name.to_string(), level));
            NodeRef(at)
        }
    }

    /// Compute the pivot level of every node whose path changed.
    ///
    /// The pivot of a moved node is the deepest level at which its original
    /// and target paths already diverge, lowered to the parent's pivot when
    /// the parent moves at a shallower layer. Removed nodes pivot at their
    /// own level.
    fn compute_pivots(&mut self) -> Result<(), VifiError> {
        for at in 1..self.nodes.len() {
            let (entry, target, level, dir) = {
                let node = &self.nodes[at];
                (node.entry, node.target, node.level, node.dir)
            };
            match target {
                Some(tid) if entry != Some(tid) => {
                    let other = self
                        .by_id
                        .get(tid)
                        .copied()
                        .flatten()
                        .ok_or_else(|| VifiError::UnknownId {
                            id: tid,
                            path: self.node_path(NodeRef(at)),
                        })?;
                    let mut pivot = self.diverge_level(at, other);
                    if let Some(dir) = dir {
                        // Inherit a smaller pivot from the parent directory.
                        let dir_pivot = self.nodes[dir].pivot;
                        if pivot < level && dir_pivot < pivot {
                            pivot = dir_pivot;
                        }
                    }
                    self.nodes[at].pivot = pivot;
                }
                None => self.nodes[at].pivot = level,
                _ => {}
            }
        }
        Ok(())
    }

    /// Directory level where the paths of two nodes diverge.
    fn diverge_level(&self, mut a: usize, mut b: usize) -> Level {
        let mut result = MAX_LEVEL;
        loop {
            let (node_a, node_b) = (&self.nodes[a], &self.nodes[b]);
            if node_a.level > node_b.level {
                result = result.min(node_b.level);
                match node_a.dir {
                    Some(dir) => a = dir,
                    None => return result,
                }
            } else if node_a.level < node_b.level {
                result = result.min(node_a.level);
                match node_b.dir {
                    Some(dir) => b = dir,
                    None => return result,
                }
            } else {
                if a == b {
                    return result;
                }
                if node_a.name != node_b.name {
                    result = result.min(node_a.level);
                }
                match (node_a.dir, node_b.dir) {
                    (Some(dir_a), Some(dir_b)) => {
                        a = dir_a;
                        b = dir_b;
                    }
                    _ => return result,
                }
            }
        }
    }

    /// Compute the per-layer moves of every node.
    fn compute_moves(&mut self) {
        // Initialize one empty move per level.
        for node in &mut self.nodes[1..] {
            node.moves = vec![Move::EMPTY; node.level];
        }
        // Request intermediate target directories if missing, to pivot depth.
        let mut requests = Vec::new();
        for at in 1..self.nodes.len() {
            let pivot = self.nodes[at].pivot;
            let mut parent = self.nodes[at].dir;
            while let Some(dir) = parent {
                if dir == 0 || self.nodes[dir].level < pivot {
                    break;
                }
                requests.push((dir, pivot));
                parent = self.nodes[dir].dir;
            }
        }
        for (dir, pivot) in requests {
            self.nodes[dir].mv_mut(pivot).to = Slot::CreateDir;
        }
        // Chain the moves of each node through the relevant layers, from its
        // own level up to the shallowest.
        for at in 1..self.nodes.len() {
            let (entry, target, level, pivot, dir) = {
                let node = &self.nodes[at];
                (
                    node.entry,
                    node.target,
                    node.level,
                    node.pivot,
                    node.dir.unwrap_or(0),
                )
            };
            let name = self.nodes[at].name.clone();
            let mut previous = Slot::from(entry);
            for p in (1..=level).rev() {
                // Consider prior parent directory changes in this layer.
                if p <= self.nodes[dir].level {
                    let parent_move = self.nodes[dir].mv(p);
                    if parent_move.from != parent_move.to {
                        // Most parent directory changes empty the path.
                        previous = Slot::None;
                        if let Slot::Entry(occupant) = parent_move.to {
                            // The new occupant is a copy of an original
                            // directory; adopt its former entry of this name
                            // if it had one, carried along with the copy.
                            if let Some(former_dir) = self.by_id.get(occupant).copied().flatten() {
                                if let Some(former) = self.find_child(former_dir, &name) {
                                    let former_level = self.nodes[former].level;
                                    previous = self.nodes[former].mv(former_level).to;
                                }
                            }
                        }
                    }
                }
                // Keep the previous entry except for ...
                let mut next = previous;
                if p == pivot {
                    // ... the target id when we reach its pivot and ...
                    next = Slot::from(target);
                } else if p == level && entry != target {
                    // ... when we move out the original entry at the start.
                    next = Slot::None;
                }
                if !next.is_entry() && self.nodes[at].mv(p).to == Slot::CreateDir {
                    // Create the intermediate directory, nothing else is set.
                    next = Slot::CreateDir;
                }
                *self.nodes[at].mv_mut(p) = Move {
                    from: previous,
                    to: next,
                };
                previous = next;
            }
        }
    }

    /// Run `f` on the up-to-date node index sorted by directory and name.
    fn with_index<R>(&self, f: impl FnOnce(&[Node], &[usize]) -> R) -> R {
        let mut cache = self.index.borrow_mut();
        if cache.built_for != self.nodes.len() {
            let mut order: Vec<usize> = (1..self.nodes.len()).collect();
            order.sort_by(|&a, &b| {
                let key_a = (self.nodes[a].dir.unwrap_or(0), self.nodes[a].name.as_str());
                let key_b = (self.nodes[b].dir.unwrap_or(0), self.nodes[b].name.as_str());
                key_a.cmp(&key_b)
            });
            cache.order = order;
            cache.built_for = self.nodes.len();
        }
        f(&self.nodes, &cache.order)
    }

    /// Binary search the entry of the given directory and name.
    fn find_child(&self, dir: usize, name: &str) -> Option<usize> {
        self.with_index(|nodes, order| {
            let probe = (dir, name);
            let at = order.partition_point(|&i| {
                (nodes[i].dir.unwrap_or(0), nodes[i].name.as_str()) < probe
            });
            order
                .get(at)
                .copied()
                .filter(|&i| (nodes[i].dir.unwrap_or(0), nodes[i].name.as_str()) == probe)
        })
    }

    /// Comparable node records, sorted by parent entry id and name.
    fn records(&self) -> Vec<(Option<EntryId>, Option<EntryId>, Option<EntryId>, String, Level)> {
        let mut records: Vec<_> = self.nodes[1..]
            .iter()
            .map(|node| {
                let dir_entry = node.dir.and_then(|dir| self.nodes[dir].entry);
                (
                    dir_entry,
                    node.entry,
                    node.target,
                    node.name.clone(),
                    node.level,
                )
            })
            .collect();
        records.sort();
        records
    }
}

impl Default for FileTree {
    fn default() -> Self {
        FileTree::new()
    }
}

impl PartialEq for FileTree {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.records() == other.records()
    }
}
