//! The file writer worker.

use std::path::{Path, PathBuf};

use tokio::fs::{DirBuilder, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::random::{self, IDENTIFIER_LEN};

/// Upper bound for the size of a single write call.
pub const CHUNK_SIZE: usize = 4096;

/// Creates `file_count` randomly named files of `file_size` random bytes each.
///
/// With `create_subdir`, the files go into a new randomly named directory below `base_dir` which
/// is private to this worker. Otherwise they are written into `base_dir` directly, where they may
/// collide with files of other workers. The target directory and its parents are created if
/// missing.
///
/// Returns the directory the files were written to. The first failure aborts the worker and
/// leaves any partially written file in place.
pub async fn run_writer(
    base_dir: &Path,
    file_size: u64,
    file_count: usize,
    create_subdir: bool,
) -> Result<PathBuf> {
    let dir = if create_subdir {
        base_dir.join(random::generate_identifier(IDENTIFIER_LEN)?)
    } else {
        base_dir.to_owned()
    };

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o777);
    if let Err(source) = builder.create(&dir).await {
        return Err(Error::DirectoryCreate { path: dir, source });
    }

    for _ in 0..file_count {
        write_random_file(&dir, file_size).await?;
    }

    Ok(dir)
}

/// Creates a single randomly named file in `dir` and fills it with `file_size` random bytes.
pub async fn write_random_file(dir: &Path, file_size: u64) -> Result<PathBuf> {
    let path = dir.join(random::generate_identifier(IDENTIFIER_LEN)?);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(source) => return Err(Error::FileCreate { path, source }),
    };
    tracing::trace!(path = %path.display(), "created file");

    let mut buffer = [0u8; CHUNK_SIZE];
    let mut remaining = file_size;
    while remaining > 0 {
        let len = remaining.min(CHUNK_SIZE as u64) as usize;
        let chunk = &mut buffer[..len];
        random::fill_random(chunk)?;

        if let Err(source) = file.write_all(chunk).await {
            return Err(Error::FileWrite { path, source });
        }
        remaining -= len as u64;
    }

    // Tokio completes writes in the background; flushing surfaces their errors here.
    if let Err(source) = file.flush().await {
        return Err(Error::FileWrite { path, source });
    }

    Ok(path)
}
