//! Inspection of directory trees produced by a load run.
//!
//! Tests take a [`Snapshot`] of a work target after a run and assert on its shape.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A single entry of a [`Snapshot`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entry {
    /// A directory.
    Dir,
    /// A regular file (or anything else that is not a directory) with its length in bytes.
    File(u64),
}

/// A recursive listing of a directory tree, keyed by paths relative to its root.
///
/// Two snapshots compare equal if the same paths exist with the same sizes, which is enough to
/// tell whether a read-only operation left a tree alone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, Entry>,
}

impl Snapshot {
    /// Walks `root` and records every entry below it. The root itself is not recorded.
    ///
    /// Panics if the tree cannot be walked.
    pub fn take(root: &Path) -> Self {
        let mut entries = BTreeMap::new();

        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(root).unwrap().to_owned();
            let kind = if entry.file_type().is_dir() {
                Entry::Dir
            } else {
                Entry::File(entry.metadata().unwrap().len())
            };
            entries.insert(relative, kind);
        }

        Self { entries }
    }

    /// Returns `true` if the tree contained nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All directories, in sorted order.
    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|(_, entry)| **entry == Entry::Dir)
            .map(|(path, _)| path.as_path())
    }

    /// All files with their sizes, in sorted order.
    pub fn files(&self) -> impl Iterator<Item = (&Path, u64)> {
        self.entries.iter().filter_map(|(path, entry)| match entry {
            Entry::File(len) => Some((path.as_path(), *len)),
            Entry::Dir => None,
        })
    }

    /// Directories directly below the root.
    pub fn top_level_dirs(&self) -> Vec<&Path> {
        self.dirs()
            .filter(|path| path.components().count() == 1)
            .collect()
    }

    /// Sizes of the files directly inside `dir`, which is relative to the root.
    pub fn file_sizes_in(&self, dir: &Path) -> Vec<u64> {
        self.files()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(_, len)| len)
            .collect()
    }
}
