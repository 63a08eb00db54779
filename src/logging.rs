//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `pbtc=debug`.
pub const LOG_ENV_VAR: &str = "PBTC_LOG";

/// Initialise the global [`tracing`] subscriber.
///
/// Events go to stderr so that stdout carries only command listings.
/// `PBTC_LOG` overrides the level chosen by `verbose`.
pub fn init_subscriber(verbose: bool) {
	let default_level = if verbose { "debug" } else { "info" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

	// Ignore the error if a subscriber is already installed (tests, embedding)
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.try_init();
}
