// src/core/manifest/reader.rs

use crate::core::error::VifiError;
use crate::core::manifest::{split_path, HEADER_PREFIX};
use crate::core::tree::{EntryId, FileTree};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Read a manifest file into the current phase of a file tree.
pub fn read_manifest(file: &Path, tree: &mut FileTree) -> Result<(), VifiError> {
    let wrap = |source: VifiError| VifiError::ReadManifest {
        file: file.to_path_buf(),
        source: Box::new(source),
    };
    let text = fs::read_to_string(file).map_err(|error| wrap(error.into()))?;
    read_manifest_text(&text, tree).map_err(wrap)
}

/// Read manifest text into the current phase of a file tree.
///
/// The header fixes the base path. Entry lines may appear in any order;
/// they are sorted by path before feeding the tree, so intermediate
/// directories are synthesized exactly once. Components present in a path
/// but bound to no line of their own become id-less entries.
pub fn read_manifest_text(text: &str, tree: &mut FileTree) -> Result<(), VifiError> {
    let mut lines = text.lines();

    // Parse and check the header line.
    let header = lines.next().unwrap_or_default();
    let base = header
        .strip_prefix(HEADER_PREFIX)
        .ok_or_else(|| VifiError::BadHeader {
            line: header.to_string(),
        })?;
    tree.set_base_path(base);

    // Parse the entry lines.
    let mut entries: BTreeMap<Vec<String>, EntryId> = BTreeMap::new();
    for line in lines {
        let (id_text, path_text) =
            line.split_once('\t')
                .ok_or_else(|| VifiError::MissingSeparator {
                    line: line.to_string(),
                })?;
        let id = usize::from_str_radix(id_text, 16)
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| VifiError::InvalidId {
                line: line.to_string(),
            })?;
        if entries.insert(split_path(path_text), id).is_some() {
            return Err(VifiError::DuplicatePath {
                line: line.to_string(),
            });
        }
    }

    // Feed the entries into the file tree, sorted by path. A stack of
    // parent nodes is kept per level and truncated to the components shared
    // with the previously fed path.
    let mut previous: Vec<String> = Vec::new();
    let mut parents = vec![tree.base_node()];
    for (path, &id) in &entries {
        let mut level = previous
            .iter()
            .zip(path.iter())
            .take_while(|(last, part)| last == part)
            .count();
        parents.truncate(level + 1);
        // Add intermediate directories without entry ids.
        let mut name = &path[level];
        for part in &path[level + 1..] {
            let node = tree.add_entry(parents[level], name)?;
            parents.push(node);
            name = part;
            level += 1;
        }
        // Add the leaf entry of the current path with its id.
        let node = tree.add_entry_with_id(parents[level], id, name)?;
        parents.push(node);
        previous = path.clone();
    }
    Ok(())
}
