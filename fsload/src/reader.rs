//! The directory reader worker.

use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Performs `repetitions` full recursive listings of `base_dir`.
///
/// The first directory that cannot be listed aborts all remaining repetitions. Directories
/// vanishing underneath a concurrent cleanup are reported the same way.
pub async fn run_reader(base_dir: &Path, repetitions: usize) -> Result<()> {
    for repetition in 0..repetitions {
        let entries = list_recursive(base_dir).await?;
        tracing::debug!(repetition, entries, "listed {}", base_dir.display());
    }

    Ok(())
}

/// Lists every entry below `root` depth-first and returns the number of entries seen.
///
/// Entry types are determined without following symlinks, so only real directories are descended
/// into. Entries removed between listing and inspection are skipped. Sibling order is whatever the
/// filesystem yields.
pub async fn list_recursive(root: &Path) -> Result<usize> {
    let mut pending = vec![root.to_owned()];
    let mut entries = 0;

    while let Some(dir) = pending.pop() {
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(source) => return Err(Error::DirectoryRead { path: dir, source }),
        };

        let mut subdirs = Vec::new();
        loop {
            let entry = match read_dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => return Err(Error::DirectoryRead { path: dir, source }),
            };

            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(source) if source.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(Error::DirectoryRead { path: dir, source }),
            };

            entries += 1;
            if file_type.is_dir() {
                subdirs.push(entry.path());
            }
        }

        // Reversed so the first listed subdirectory is visited next.
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(entries)
}
