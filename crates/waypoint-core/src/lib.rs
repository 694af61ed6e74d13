//! # Waypoint Core
//!
//! Core building blocks shared by the Waypoint crates:
//!
//! - [`page`] - the `Page` view tree produced by components
//! - [`component`] - the object-safe [`Component`] trait that lazily loaded
//!   page modules implement
//! - [`reactive`] - [`Signal`], the single-threaded reactive cell the router
//!   uses to publish its current location

pub mod component;
pub mod page;
pub mod reactive;

pub use component::Component;
pub use page::{IntoPage, Page, PageElement};
pub use reactive::Signal;
