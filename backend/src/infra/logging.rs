use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber, writing to stderr.
///
/// `MYPICS_LOG` takes an `EnvFilter` directive (`debug`, `mypics=trace`, ...);
/// without it `default_level` applies.
pub fn init(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_env("MYPICS_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
