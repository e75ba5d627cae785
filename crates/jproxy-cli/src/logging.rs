//! Tracing subscriber setup

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "JPROXY_LOG";

/// Install a stderr subscriber; `JPROXY_LOG` wins over `--verbose`
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(use_ansi)
        .with_target(verbose)
        .with_level(true)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("tracing initialized");
}
