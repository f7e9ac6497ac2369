//! Spawning and joining of independent worker tasks.
//!
//! Each worker runs as its own Tokio task and reports its outcome through the log only. Failures
//! never travel to sibling tasks or to the caller of [`join_all`].

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;

use crate::error::Result;

/// The kind of work a task performs, used to label its log lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Creates and fills files.
    Writer,
    /// Recursively lists the directory tree.
    Reader,
    /// Removes a directory tree during cleanup.
    Deleter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Writer => "writer",
            Role::Reader => "reader",
            Role::Deleter => "deleter",
        };
        f.write_str(name)
    }
}

/// A spawned worker task that has not been joined yet.
#[derive(Debug)]
pub struct Worker {
    role: Role,
    index: usize,
    handle: JoinHandle<()>,
}

impl Worker {
    /// The kind of work this task performs.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The index of this task among the tasks of the same role.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Spawns `future` as a worker task which logs its own outcome when it completes.
pub fn spawn<F>(role: Role, index: usize, future: F) -> Worker
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        match future.await {
            Ok(()) => tracing::info!("{role} task {index} finished"),
            Err(error) => tracing::error!(
                error = &error as &dyn std::error::Error,
                "{role} task {index} failed"
            ),
        }
    });

    Worker {
        role,
        index,
        handle,
    }
}

/// Waits for every worker to complete, regardless of the outcome of the others.
pub async fn join_all(workers: Vec<Worker>) {
    let (labels, handles): (Vec<_>, Vec<_>) = workers
        .into_iter()
        .map(|worker| ((worker.role, worker.index), worker.handle))
        .unzip();

    let results = futures::future::join_all(handles).await;
    for ((role, index), result) in labels.into_iter().zip(results) {
        if let Err(error) = result {
            tracing::error!(
                error = &error as &dyn std::error::Error,
                "{role} task {index} panicked"
            );
        }
    }
}
