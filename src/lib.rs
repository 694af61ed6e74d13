//! # Waypoint
//!
//! Client-side navigation for single-page web applications.
//!
//! A route table maps URL paths to page components that are loaded on first
//! navigation; the router writes the current route into the URL through a
//! history strategy (hash-based by default, so the server only ever serves
//! the page hosting the application).
//!
//! ## Feature Flags
//!
//! - `router` - route tables, path patterns, history strategies and the router
//! - `app` - the shipped application: a single `home` route at `/`
//! - `full` (default) - everything
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use waypoint::prelude::*;
//!
//! let router = waypoint::app::start(&RouterConfig::default()).await?;
//! let location = router.push("/").await?;
//! assert_eq!(location.name.as_deref(), Some("home"));
//! assert!(location.href.contains('#'));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "app")]
#[cfg_attr(docsrs, doc(cfg(feature = "app")))]
pub mod app;
#[cfg(feature = "router")]
#[cfg_attr(docsrs, doc(cfg(feature = "router")))]
pub mod router;

pub use waypoint_core::{Component, IntoPage, Page, PageElement, Signal};

/// Commonly used types.
pub mod prelude {
	pub use waypoint_core::{Component, IntoPage, Page, PageElement, Signal};

	#[cfg(feature = "router")]
	pub use waypoint_router::{
		ComponentModule, HistoryMode, Link, LoadError, RouteLocation, RouteTable, Router,
		RouterConfig, RouterError, RouterOutlet, build_router, lazy,
	};

	#[cfg(feature = "app")]
	pub use waypoint_app::{AppError, HomePage};
}
