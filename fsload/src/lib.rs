//! This is a load-generation library which stresses a filesystem with concurrent writes,
//! directory listings and deletions.
//!
//! A [`Workload`] describes the load: a number of *writer* tasks that each create a configured
//! number of randomly named files filled with random bytes, and a number of *reader* tasks that
//! each repeatedly list the whole directory tree. Both run at the same time against the same
//! target directory, without any coordination between them.
//!
//! Once every writer and reader has finished, the target can optionally be emptied again by a
//! *cleanup* phase which deletes top-level files directly and spawns one deleter task per
//! top-level directory.
//!
//! File contents and names come from the operating system's secure random source, so storage
//! backends with compression or deduplication see realistic data.
//!
//! Failures of individual tasks are logged and never abort the run. There is no aggregation of
//! results and no timing; this is a load generator, not a benchmark.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod observability;
pub mod random;
pub mod reader;
pub mod task;
pub mod workload;
pub mod writer;

pub use crate::error::{Error, Result};
pub use crate::harness::run;
pub use crate::workload::Workload;
