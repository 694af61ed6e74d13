//! The application's route table.

use crate::pages;
use waypoint_router::{RouteTable, Router, RouterConfig, RouterError};

/// Name of the landing route.
pub const HOME: &str = "home";

/// Returns the route table: the landing page at `/`, loaded on first visit.
pub fn routes() -> RouteTable {
	RouteTable::new().register("/", HOME, pages::home::load)
}

/// Builds the application router with the configured history strategy.
///
/// No page module is loaded here.
pub fn create_router(config: &RouterConfig) -> Result<Router, RouterError> {
	Router::from_config(routes(), config)
}
