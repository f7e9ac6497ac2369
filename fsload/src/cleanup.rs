//! Removal of everything below the work target once the load phase is over.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::task::{self, Role, Worker};

/// Empties `base_dir`, fanning out one deleter task per top-level directory.
///
/// Top-level files are removed right away, logging failures and moving on. Directories are handed
/// to spawned [`Role::Deleter`] tasks which remove the whole subtree. The returned workers must be
/// passed to [`task::join_all`] to wait for the deletions to complete.
///
/// Fails only if `base_dir` itself cannot be listed, in which case nothing is removed.
pub async fn run_cleanup(base_dir: &Path) -> Result<Vec<Worker>> {
    let entries = list_top_level(base_dir).await?;
    Ok(dispatch(entries).await)
}

async fn dispatch(entries: Vec<(PathBuf, bool)>) -> Vec<Worker> {
    let mut deleters = Vec::new();
    for (path, is_dir) in entries {
        if is_dir {
            let index = deleters.len();
            deleters.push(task::spawn(Role::Deleter, index, remove_tree(path)));
        } else {
            remove_top_level_file(path).await;
        }
    }

    tracing::debug!(deleters = deleters.len(), "dispatched cleanup");
    deleters
}

async fn remove_top_level_file(path: PathBuf) {
    if let Err(source) = tokio::fs::remove_file(&path).await {
        let error = Error::FileDelete { path, source };
        tracing::warn!(
            error = &error as &dyn std::error::Error,
            "failed to delete top-level file"
        );
    }
}

/// Reads all entries of `dir` before any of them is touched.
async fn list_top_level(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let read_error = |source| Error::DirectoryRead {
        path: dir.to_owned(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(read_error)? {
        let file_type = entry.file_type().await.map_err(read_error)?;
        entries.push((entry.path(), file_type.is_dir()));
    }

    Ok(entries)
}

async fn remove_tree(path: PathBuf) -> Result<()> {
    match tokio::fs::remove_dir_all(&path).await {
        Ok(()) => Ok(()),
        Err(source) => Err(Error::DirectoryDelete { path, source }),
    }
}
