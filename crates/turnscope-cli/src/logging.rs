use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// An explicit level wins over `RUST_LOG`; with neither, only warnings and
/// errors are shown so stdout stays machine-readable.
pub fn init(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // a second init (e.g. from tests in one process) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
