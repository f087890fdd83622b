use tracing_subscriber::EnvFilter;

/// Sends tracing output to stderr so stdout stays parseable.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `-v`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "deskview=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. from tests) is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
