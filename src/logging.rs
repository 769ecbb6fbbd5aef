//! Tracing setup
//!
//! Logs go to stderr so they never interleave with table output on stdout.
//!
//! ```text
//! emptrack --debug                 # every statement issued, at debug level
//! RUST_LOG=emptrack=trace emptrack # fine-grained control, overrides --debug
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::{Result, TrackerError};

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "emptrack=debug"
    } else {
        "warn"
    }
}

/// Install the global `fmt` subscriber
pub fn init_tracing(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|e| TrackerError::config_error(format!("Could not initialise logging: {e}")))
}
