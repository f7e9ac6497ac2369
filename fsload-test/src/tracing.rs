use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set: only fsload's own events, at every level.
const DEFAULT_FILTER: &str = "ERROR,fsload=TRACE";

/// Initialize the logger for testing.
///
/// This logs to the stdout captured by the Rust test runner. Thread names are included since
/// worker tasks hop between runtime threads. Calling this more than once is harmless.
///
/// # Example
///
/// ```
/// fsload_test::tracing::init();
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .with_thread_names(true)
        .compact()
        .try_init()
        .ok();
}
