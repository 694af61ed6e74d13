//! # Waypoint App
//!
//! The application wiring: a single `"home"` route at `/` whose page module
//! is loaded on first navigation, bound to hash history by default.
//!
//! ```ignore
//! waypoint_app::init_logging().ok();
//! let router = waypoint_app::start(&RouterConfig::default()).await?;
//! assert_eq!(router.current_route_name().get().as_deref(), Some("home"));
//! ```

pub mod app;
pub mod error;
pub mod logging;
pub mod pages;
pub mod routes;

pub use app::{install, is_installed, router, start, start_router, uninstall, with_router};
pub use error::AppError;
pub use logging::{DEFAULT_FILTER, init_logging};
pub use pages::HomePage;
pub use routes::{HOME, create_router, routes};
