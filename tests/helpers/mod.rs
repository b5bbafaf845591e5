#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use waymark::entries::EntryStore;

/// A scratch area holding the data file and a tree of real directories.
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.path().join("data").join("waymark.txt")
    }

    pub fn backup_path(&self) -> PathBuf {
        self.root.path().join("data").join("waymark.txt.bak")
    }

    /// Create `rel` (and parents) under the sandbox and return its absolute path.
    pub fn mkdir(&self, rel: &str) -> String {
        let dir = self.root.path().join("tree").join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        dir.to_str().unwrap().to_string()
    }

    /// An absolute path under the sandbox that is never created.
    pub fn ghost(&self, rel: &str) -> String {
        self.root
            .path()
            .join("ghost")
            .join(rel)
            .to_str()
            .unwrap()
            .to_string()
    }

    pub fn empty_store(&self) -> EntryStore {
        EntryStore::empty(self.data_path())
    }

    /// Write raw text as the data file.
    pub fn write_data(&self, contents: &str) {
        write_file(&self.data_path(), contents);
    }

    pub fn write_backup(&self, contents: &str) {
        write_file(&self.backup_path(), contents);
    }
}

fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}
