use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output always goes to stderr: launched ranks
/// use stdout for their contribution frame.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .init();

    debug!("city-stats started with verbosity level: {}", verbose);
}
