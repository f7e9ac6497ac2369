//! Installation of the global `tracing` subscriber.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

use crate::config::{LogFormat, Logging};

/// Installs the global tracing subscriber, writing to stdout.
///
/// `RUST_LOG` takes precedence over the configured level if it is set.
pub fn init_tracing(logging: &Logging) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let format = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false);

    let format: Box<dyn Layer<Registry> + Send + Sync> = match logging.format {
        LogFormat::Auto if io::stdout().is_terminal() => format.pretty().boxed(),
        LogFormat::Pretty => format.pretty().boxed(),
        LogFormat::Auto | LogFormat::Simplified => format.with_ansi(false).compact().boxed(),
        LogFormat::Json => format.json().flatten_event(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(format)
        .with(env_filter)
        .init();
}
