// src/core/manifest/writer.rs

use crate::core::error::VifiError;
use crate::core::manifest::{escape_component, HEADER_PREFIX};
use crate::core::tree::{hex_width, FileTree, NodeRef};
use std::fs;
use std::path::Path;

/// Write a file tree to a manifest file.
pub fn write_manifest(tree: &FileTree, file: &Path) -> Result<(), VifiError> {
    fs::write(file, manifest_to_string(tree)).map_err(|error| VifiError::WriteManifest {
        file: file.to_path_buf(),
        source: Box::new(error.into()),
    })
}

/// Render a file tree as manifest text.
///
/// Entries are written depth first with the content of every directory
/// sorted by name, so the output is ordered by path no matter how the tree
/// was fed.
pub fn manifest_to_string(tree: &FileTree) -> String {
    let mut out = String::new();
    out.push_str(HEADER_PREFIX);
    out.push_str(&tree.base_path().display().to_string());
    out.push('\n');
    write_node(tree, tree.base_node(), "", hex_width(tree.max_entry_id()), &mut out);
    out
}

fn write_node(tree: &FileTree, dir: NodeRef, dir_text: &str, width: usize, out: &mut String) {
    for sub in tree.entries(dir) {
        let Some(id) = tree.node_id(sub) else {
            continue;
        };
        let name = escape_component(tree.node_name(sub));
        let path = if dir_text.is_empty() {
            name
        } else {
            format!("{dir_text}/{name}")
        };
        out.push_str(&format!("{id:0width$x}\t{path}\n"));
        write_node(tree, sub, &path, width, out);
    }
}
