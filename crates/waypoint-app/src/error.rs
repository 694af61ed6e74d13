//! Application errors.

use waypoint_router::{ConfigError, RouterError};

/// Error type for application start-up and router access.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	/// A router is already installed for this page session.
	#[error("A router is already installed")]
	AlreadyInstalled,
	/// No router has been installed yet.
	#[error("No router is installed")]
	NotInstalled,
	/// Building or navigating the router failed.
	#[error(transparent)]
	Router(#[from] RouterError),
	/// The router configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
