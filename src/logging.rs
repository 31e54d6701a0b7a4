use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Uses `RUST_LOG` for filtering if present, `info` otherwise.
/// Logs go to stderr so that stdout stays free for lookup results.
/// Calling it more than once is harmless.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
