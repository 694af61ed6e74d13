//! Client-side routing
//!
//! This module provides access to waypoint-router: route tables, lazily
//! loaded components, hash/web/memory history and the router itself.

pub use waypoint_router::*;
