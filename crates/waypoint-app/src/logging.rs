//! Logging initialisation.
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! the application's job.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "waypoint=info,waypoint_router=info,waypoint_app=info";

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), TryInitError> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| DEFAULT_FILTER.into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.try_init()
}
