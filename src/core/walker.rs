// src/core/walker.rs

//! Directory scanning into a file tree.

use crate::core::error::VifiError;
use crate::core::tree::{FileTree, NodeRef};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Scan a directory into the original phase of a file tree.
///
/// The canonical path of the directory becomes the base path. Entries are
/// visited sorted by name, so assigned ids are deterministic for a given
/// tree. Hidden entries and anything that is neither a regular file nor a
/// directory are skipped; symbolic links are not followed.
pub fn scan_directory(directory: &Path, tree: &mut FileTree) -> Result<(), VifiError> {
    scan_inner(directory, tree).map_err(|source| VifiError::Scan {
        path: directory.to_path_buf(),
        source: Box::new(source),
    })
}

fn scan_inner(directory: &Path, tree: &mut FileTree) -> Result<(), VifiError> {
    let metadata = fs::metadata(directory)?;
    if !metadata.is_dir() {
        return Err(VifiError::Io(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    let canonical = fs::canonicalize(directory)?;
    let base = tree.set_base_path(canonical.clone());

    let mut directories: HashMap<PathBuf, NodeRef> = HashMap::new();
    directories.insert(canonical.clone(), base);

    let walk = WalkDir::new(&canonical)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walk
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
    {
        let entry = entry?;
        let file_type = entry.file_type();
        // Only regular files and directories take part.
        if !file_type.is_file() && !file_type.is_dir() {
            continue;
        }
        let Some(&parent) = entry.path().parent().and_then(|dir| directories.get(dir)) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let node = tree.add_entry(parent, &name)?;
        if file_type.is_dir() {
            directories.insert(entry.into_path(), node);
        }
    }
    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
