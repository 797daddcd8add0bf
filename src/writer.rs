//! Canonical text form of an index.
//!
//! Comments and the original layout are not kept. Global keys come first with no
//! header, then one group per section in byte order, groups separated by a blank
//! line, keys sorted within each group.

use crate::error::{ConfigError, ParseResult};
use crate::index::KeyIndex;
use crate::scanner::SECTION_MARKER;
use std::path::Path;

/// Split a qualified key on its first `/` into section and bare key
pub fn split_qualified(key: &str) -> (Option<&str>, &str) {
    match key.split_once('/') {
        Some((section, bare)) => (Some(section), bare),
        None => (None, key),
    }
}

/// Render the index in canonical form
pub fn serialize(index: &KeyIndex) -> String {
    let mut rows: Vec<(Option<&str>, &str, &str)> = index
        .iter()
        .map(|(key, value)| {
            let (section, bare) = split_qualified(key);
            (section, bare, value)
        })
        .collect();

    // `None` orders before every `Some`, which puts global keys first
    rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let mut output = String::new();
    let mut current: Option<Option<&str>> = None;

    for (section, key, value) in rows {
        if current != Some(section) {
            if current.is_some() {
                output.push('\n');
            }
            if let Some(name) = section {
                output.push_str(SECTION_MARKER);
                output.push_str(name);
                output.push('\n');
            }
            current = Some(section);
        }

        output.push_str(key);
        if !value.is_empty() {
            output.push(' ');
            output.push_str(value);
        }
        output.push('\n');
    }

    output
}

/// Replace the contents of `path` with `contents`
pub fn write_file(path: &Path, contents: &str) -> ParseResult<()> {
    std::fs::write(path, contents)
        .map_err(|e| ConfigError::io(path.display().to_string(), e.to_string()))
}
