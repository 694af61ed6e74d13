//! Client-side router for Waypoint.
//!
//! Maps URL paths to lazily loaded page components and drives navigation
//! through a history strategy:
//!
//! - [`route`]: the declarative [`RouteTable`]
//! - [`pattern`]: `{param}` / `{param:*}` path patterns
//! - [`loader`]: cached async component loaders
//! - [`history`]: hash, web and in-memory history
//! - [`core`]: [`build_router`] and the [`Router`] itself
//! - [`components`]: [`Link`] and [`RouterOutlet`]
//! - [`config`]: TOML router configuration
//!
//! ```ignore
//! use waypoint_router::{HashHistory, RouteTable, build_router};
//!
//! let table = RouteTable::new()
//!     .register("/", "home", || async { Ok(ComponentModule::new(HomePage)) });
//! let router = build_router(table, Box::new(HashHistory::default()))?;
//! let location = router.push("/").await?;
//! assert_eq!(location.name.as_deref(), Some("home"));
//! assert_eq!(location.href, "#/");
//! ```

pub mod components;
pub mod config;
pub mod core;
pub mod error;
pub mod history;
pub mod loader;
pub mod pattern;
pub mod route;

pub use components::{Link, RouterOutlet};
pub use config::{ConfigError, HistoryConfig, NavigationConfig, RouterConfig};
pub use core::{DEFAULT_MAX_REDIRECTS, Route, RouteLocation, RouteMatch, Router, build_router};
pub use error::{HistoryError, LoadError, PatternError, RouterError};
pub use history::{
	HashHistory, History, HistoryListener, HistoryMode, ListenerId, MemoryHistory,
	NavigationType, WebHistory, create_history,
};
pub use loader::{ComponentLoader, LazyComponent, LoadFuture, lazy};
pub use pattern::PathPattern;
pub use route::{RouteDescriptor, RouteGuard, RouteTable, RouteTarget};

pub use waypoint_core::component::ComponentModule;
