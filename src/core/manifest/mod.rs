// src/core/manifest/mod.rs

//! The line-oriented manifest text format.
//!
//! A manifest starts with a `# ViFi@<base-path>` header line followed by one
//! line per entry: the zero-padded lowercase hex id, a tab, and the path
//! relative to the base. Paths use forward slashes between components; a
//! literal slash inside a component is escaped as `\/` and a literal
//! backslash as `\\`.

mod reader;
mod writer;

pub use reader::{read_manifest, read_manifest_text};
pub use writer::{manifest_to_string, write_manifest};

/// Header prefix of every manifest file.
pub(crate) const HEADER_PREFIX: &str = "# ViFi@";

/// Escape one path component for the manifest text format.
pub fn escape_component(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '/' => escaped.push_str(r"\/"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Split an escaped relative path into its unescaped components.
pub fn split_path(text: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('/' | '\\')) => last_mut(&mut parts).push(escaped),
                Some(other) => {
                    last_mut(&mut parts).push('\\');
                    last_mut(&mut parts).push(other);
                }
                None => last_mut(&mut parts).push('\\'),
            },
            '/' => parts.push(String::new()),
            _ => last_mut(&mut parts).push(c),
        }
    }
    parts
}

/// Join unescaped components into an escaped relative path.
pub fn join_path(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| escape_component(part))
        .collect::<Vec<_>>()
        .join("/")
}

fn last_mut(parts: &mut Vec<String>) -> &mut String {
    if parts.is_empty() {
        parts.push(String::new());
    }
    let at = parts.len() - 1;
    &mut parts[at]
}
