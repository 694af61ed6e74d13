//! Reactive state.
//!
//! Waypoint does not ship an effect scheduler. A [`Signal`] is a shared,
//! single-threaded cell whose subscribers are called synchronously after
//! every write, which is all a router needs to publish its current location
//! to outlets and links.

mod signal;

pub use signal::{Signal, SubscriptionId};
