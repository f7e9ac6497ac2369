//! Run a [`Workload`] against the local filesystem.

use std::sync::Arc;

use bytesize::ByteSize;

use crate::task::{self, Role, Worker};
use crate::workload::Workload;
use crate::{cleanup, reader, writer};

/// Runs the given workload to completion.
///
/// All writers and readers are spawned at once and run concurrently against the same target.
/// Once every one of them has finished, and only if the workload asks for it, the target is
/// emptied by a second wave of deleter tasks.
///
/// Individual task failures are logged and never abort the run.
pub async fn run(workload: Workload) {
    let workload = Arc::new(workload);

    tracing::info!(
        path = %workload.path.display(),
        writers = workload.writers,
        readers = workload.readers,
        "starting load phase"
    );
    tracing::debug!(
        per_writer = %ByteSize::b(workload.bytes_per_writer()),
        files_per_writer = workload.files_per_writer,
        create_dirs = workload.create_dirs,
        "writer parameters"
    );

    let mut workers = spawn_writers(&workload);
    workers.extend(spawn_readers(&workload));

    tracing::info!("waiting for readers and writers to finish");
    task::join_all(workers).await;

    if !workload.delete_files {
        return;
    }

    let deleters = match cleanup::run_cleanup(&workload.path).await {
        Ok(deleters) => deleters,
        Err(error) => {
            tracing::error!(
                error = &error as &dyn std::error::Error,
                "failed to start deleters"
            );
            return;
        }
    };

    tracing::info!("waiting for deleters to finish");
    task::join_all(deleters).await;
}

fn spawn_writers(workload: &Arc<Workload>) -> Vec<Worker> {
    (0..workload.writers)
        .map(|index| {
            let workload = Arc::clone(workload);
            task::spawn(Role::Writer, index, async move {
                let dir = writer::run_writer(
                    &workload.path,
                    workload.file_size,
                    workload.files_per_writer,
                    workload.create_dirs,
                )
                .await?;
                tracing::debug!(dir = %dir.display(), "writer task {index} wrote all files");
                Ok(())
            })
        })
        .collect()
}

fn spawn_readers(workload: &Arc<Workload>) -> Vec<Worker> {
    (0..workload.readers)
        .map(|index| {
            let workload = Arc::clone(workload);
            task::spawn(Role::Reader, index, async move {
                reader::run_reader(&workload.path, workload.reads_per_reader).await
            })
        })
        .collect()
}
