//! A module for defining a [`Workload`] that can be run against a local filesystem.

use std::path::{Path, PathBuf};

/// Default number of bytes written per file.
pub const DEFAULT_FILE_SIZE: u64 = 1024 * 1024;

/// A builder for creating a [`Workload`].
#[derive(Debug)]
pub struct WorkloadBuilder {
    path: PathBuf,

    writers: usize,
    readers: usize,

    file_size: u64,
    files_per_writer: usize,
    reads_per_reader: usize,

    create_dirs: bool,
    delete_files: bool,
}

impl WorkloadBuilder {
    /// The number of concurrent writer tasks.
    pub fn writers(mut self, writers: usize) -> Self {
        self.writers = writers;
        self
    }

    /// The number of concurrent reader tasks.
    pub fn readers(mut self, readers: usize) -> Self {
        self.readers = readers;
        self
    }

    /// The exact size of every written file in bytes.
    pub fn file_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    /// How many files each writer creates.
    pub fn files_per_writer(mut self, files: usize) -> Self {
        self.files_per_writer = files;
        self
    }

    /// How many full recursive listings each reader performs.
    pub fn reads_per_reader(mut self, reads: usize) -> Self {
        self.reads_per_reader = reads;
        self
    }

    /// Gives each writer its own randomly named subdirectory instead of sharing the target.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Empties the target once all writers and readers have finished.
    pub fn delete_files(mut self, delete_files: bool) -> Self {
        self.delete_files = delete_files;
        self
    }

    /// Creates the workload instance.
    pub fn build(self) -> Workload {
        Workload {
            path: self.path,
            writers: self.writers,
            readers: self.readers,
            file_size: self.file_size,
            files_per_writer: self.files_per_writer,
            reads_per_reader: self.reads_per_reader,
            create_dirs: self.create_dirs,
            delete_files: self.delete_files,
        }
    }
}

/// Specification of a load run against a directory tree.
///
/// A workload is immutable once built. It is shared by all tasks of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Workload {
    /// The directory all tasks operate on.
    pub(crate) path: PathBuf,

    pub(crate) writers: usize,
    pub(crate) readers: usize,

    pub(crate) file_size: u64,
    pub(crate) files_per_writer: usize,
    pub(crate) reads_per_reader: usize,

    pub(crate) create_dirs: bool,
    pub(crate) delete_files: bool,
}

impl Workload {
    /// Constructs a new workload builder targeting the given directory.
    ///
    /// Without further configuration the workload spawns no tasks at all.
    pub fn builder(path: impl Into<PathBuf>) -> WorkloadBuilder {
        WorkloadBuilder {
            path: path.into(),

            writers: 0,
            readers: 0,

            file_size: DEFAULT_FILE_SIZE,
            files_per_writer: 1,
            reads_per_reader: 1,

            create_dirs: false,
            delete_files: false,
        }
    }

    /// The directory all tasks operate on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The number of bytes a writer is going to produce in total.
    pub fn bytes_per_writer(&self) -> u64 {
        self.file_size.saturating_mul(self.files_per_writer as u64)
    }
}
