//! Errors raised by the load-generating workers.

use std::io;
use std::path::PathBuf;

use rand::rand_core::OsError;
use thiserror::Error;

/// Errors that can occur while generating filesystem load.
///
/// Every variant names the path it concerns, except for [`Error::RandomSource`] which is
/// independent of the filesystem.
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system's random source could not provide entropy.
    #[error("failed to read from the system random source")]
    RandomSource(#[from] OsError),

    /// A target directory (or one of its parents) could not be created.
    #[error("failed to create directory {}", path.display())]
    DirectoryCreate {
        /// The directory that was being created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A directory could not be listed, or one of its entries could not be inspected.
    #[error("failed to read directory {}", path.display())]
    DirectoryRead {
        /// The directory that was being listed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A new file could not be created.
    #[error("failed to create file {}", path.display())]
    FileCreate {
        /// The file that was being created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing content into a file failed.
    #[error("failed to write to file {}", path.display())]
    FileWrite {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A top-level file could not be removed during cleanup.
    #[error("failed to delete file {}", path.display())]
    FileDelete {
        /// The file that was being removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A directory tree could not be removed during cleanup.
    #[error("failed to recursively delete {}", path.display())]
    DirectoryDelete {
        /// The root of the tree that was being removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Result type for worker operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
