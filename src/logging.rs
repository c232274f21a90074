//! Tracing setup. Diagnostics go to stderr so they never mix with pipeline output.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LOG_ENV};

/// Install the global subscriber. `PIPESH_LOG` wins over `-v` when set.
pub fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2)
        .init();

    debug!("pipesh started with verbosity level: {}", config.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
