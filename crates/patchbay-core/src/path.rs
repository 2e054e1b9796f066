//! Path boundary validation and structured file addressing.
//!
//! Every path served over the delivery API must resolve inside the watched
//! root. Consumers address files structurally (directory parts, stem,
//! extension) rather than by raw path, so the decomposition here is part of
//! the wire contract.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Structured address of a file relative to the watched root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAddress {
    /// Directory segments between the root and the file
    pub parts: Vec<String>,

    /// File name up to its first dot
    pub stem: String,

    /// Everything from the first dot onward, e.g. `.server.lua`
    pub ext: String,
}

/// Check whether `path` lies strictly inside `root`.
///
/// A path equal to the root itself, or one whose relative form escapes
/// upward, is not inside.
pub fn is_inside(root: &Path, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(rel) => {
            if rel.as_os_str().is_empty() {
                return false;
            }
            !rel.components()
                .next()
                .map(|c| matches!(c, Component::ParentDir))
                .unwrap_or(true)
        }
        Err(_) => false,
    }
}

/// Decompose `path` into a [`FileAddress`] relative to `root`.
///
/// Returns `None` when the path is not inside the root. Multi-dot
/// extensions are captured whole: `init.server.lua` has stem `init` and
/// ext `.server.lua`. A name without a dot has an empty ext.
pub fn decompose(root: &Path, path: &Path) -> Option<FileAddress> {
    if !is_inside(root, path) {
        return None;
    }

    let rel = path.strip_prefix(root).ok()?;
    let basename = rel.file_name()?.to_string_lossy().into_owned();

    let (stem, ext) = match basename.find('.') {
        Some(idx) => (basename[..idx].to_string(), basename[idx..].to_string()),
        None => (basename.clone(), String::new()),
    };

    let parts = rel
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(seg) => Some(seg.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(FileAddress { parts, stem, ext })
}
