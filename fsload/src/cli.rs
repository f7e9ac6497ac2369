//! Command-line entry point.
//!
//! Every flag can also be set in the YAML configuration file or through `FSLOAD__*` environment
//! variables; see [`crate::config`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use bytesize::ByteSize;

use crate::config::{Config, Overrides};
use crate::{harness, observability};

/// Concurrent write, list and delete load generator for filesystems.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// number of writer tasks (default: 0)
    #[argh(option)]
    num_writers: Option<usize>,

    /// number of reader tasks (default: 0)
    #[argh(option)]
    num_readers: Option<usize>,

    /// directory into which files will be written
    #[argh(option)]
    path: Option<PathBuf>,

    /// size of every written file, e.g. `1048576` or `4KiB` (default: 1MiB)
    #[argh(option)]
    file_size: Option<ByteSize>,

    /// number of files written by each writer (default: 1)
    #[argh(option)]
    files_per_thread: Option<usize>,

    /// number of recursive listings performed by each reader (default: 1)
    #[argh(option)]
    reads_per_thread: Option<usize>,

    /// delete all files below the path at the end of the run
    #[argh(switch)]
    delete_files: bool,

    /// give each writer its own randomly named directory
    #[argh(switch)]
    create_dirs: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            path: self.path.clone(),
            num_writers: self.num_writers,
            num_readers: self.num_readers,
            file_size: self.file_size.map(|size| size.as_u64()),
            files_per_thread: self.files_per_thread,
            reads_per_thread: self.reads_per_thread,
            delete_files: self.delete_files.then_some(true),
            create_dirs: self.create_dirs.then_some(true),
        }
    }
}

/// Bootstrap the runtime and execute the load run described on the command line.
///
/// Worker failures are logged and do not turn into an error here. Only an invalid configuration or
/// a runtime that cannot be started fails this function.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    let config = Config::load(args.config.as_deref(), &args.overrides())
        .context("failed to load configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("fsload-rt")
        .enable_all()
        .worker_threads(config.runtime.worker_threads)
        .build()?;
    let _runtime_guard = runtime.enter();

    observability::init_tracing(&config.logging);
    tracing::debug!(?config);

    runtime.block_on(harness::run(config.workload()));

    Ok(())
}
