//! Last-observed file contents, used as the diff baseline for the next
//! detected change. Content is held only while the file is believed to
//! exist on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory store of the last known full text per absolute path
#[derive(Debug, Default)]
pub struct SnapshotStore {
    contents: HashMap<PathBuf, String>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current full content for a path
    pub fn insert(&mut self, path: &Path, contents: String) {
        self.contents.insert(path.to_path_buf(), contents);
    }

    /// Last observed content, if the path is believed to exist
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.contents.get(path).map(|s| s.as_str())
    }

    /// Drop the content for a path (the file is gone)
    pub fn remove(&mut self, path: &Path) -> Option<String> {
        self.contents.remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.contents.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
