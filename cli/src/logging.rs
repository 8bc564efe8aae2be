//! Stderr logging for the CLI: `RUST_LOG` when set, else `info` (or `debug` with `-v`).

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default = if verbose {
        "info,locator=debug,locator::trace=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
