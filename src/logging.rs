//! Structured logging for the `trellis` binary
//!
//! Events go to stderr so stdout stays clean for `--json` output. The filter
//! comes from `TRELLIS_LOG` when set, otherwise from `-v` or the configured
//! verbosity.

use is_terminal::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use trellis::config::Verbosity;

pub const LOG_ENV: &str = "TRELLIS_LOG";

/// Filter directive for a `-v` count, falling back to the configured level
pub fn directive(verbose: u8, configured: Verbosity) -> &'static str {
    match verbose {
        0 => configured.filter_directive(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init(verbose: u8, configured: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(directive(verbose, configured)));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose >= 2)
            .with_ansi(std::io::stderr().is_terminal())
            .with_filter(filter),
    );

    if subscriber.try_init().is_err() {
        tracing::debug!("Global tracing subscriber already initialized");
    }
}
