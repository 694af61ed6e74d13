//! The application wiring
//!
//! This module provides access to waypoint-app: the `home` route table,
//! router start-up and installation, and logging initialisation.

pub use waypoint_app::*;
