//! Filesystem load generator.
//!
//! See [`fsload`] for the library driving this binary.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

fn main() -> anyhow::Result<()> {
    fsload::cli::execute()
}
