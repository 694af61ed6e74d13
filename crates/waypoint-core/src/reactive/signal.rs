//! Signal - shared reactive cell.
//!
//! ## Example
//!
//! ```ignore
//! use waypoint_core::Signal;
//!
//! let count = Signal::new(0);
//! let id = count.subscribe(|n| println!("count is now {n}"));
//!
//! count.set(42);
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//!
//! count.unsubscribe(id);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Subscribers<T> {
	next_id: Cell<u64>,
	entries: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
}

/// A reactive signal that holds a value and notifies subscribers on change.
///
/// `Signal<T>` implements `Clone`; all clones share the same value and the
/// same subscriber list.
pub struct Signal<T: 'static> {
	value: Rc<RefCell<T>>,
	subscribers: Rc<Subscribers<T>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			subscribers: Rc::clone(&self.subscribers),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value.
	pub fn new(value: T) -> Self {
		Self {
			value: Rc::new(RefCell::new(value)),
			subscribers: Rc::new(Subscribers {
				next_id: Cell::new(0),
				entries: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Get a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Borrow the current value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Set the signal to a new value and notify subscribers.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		self.notify();
	}

	/// Set the value without notifying subscribers.
	///
	/// Pair with [`Signal::notify`] when several signals must change together
	/// before anyone observes them.
	pub fn set_untracked(&self, value: T) {
		*self.value.borrow_mut() = value;
	}

	/// Update the value in place and notify subscribers once.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut *self.value.borrow_mut());
		self.notify();
	}

	/// Registers a callback invoked after every `set`/`update`.
	///
	/// The callback runs while the value is borrowed; it must not write back
	/// to this signal.
	pub fn subscribe<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&T) + 'static,
	{
		let id = SubscriptionId(self.subscribers.next_id.get());
		self.subscribers.next_id.set(id.0 + 1);
		self.subscribers
			.entries
			.borrow_mut()
			.push((id, Rc::new(f)));
		id
	}

	/// Removes a subscriber. Returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut entries = self.subscribers.entries.borrow_mut();
		let before = entries.len();
		entries.retain(|(sid, _)| *sid != id);
		entries.len() != before
	}

	/// Returns the number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.entries.borrow().len()
	}

	/// Calls every subscriber with the current value.
	pub fn notify(&self) {
		// Snapshot first: a subscriber may subscribe/unsubscribe re-entrantly.
		let snapshot: Vec<Subscriber<T>> = self
			.subscribers
			.entries
			.borrow()
			.iter()
			.map(|(_, f)| Rc::clone(f))
			.collect();
		let value = self.value.borrow();
		for f in snapshot {
			f(&value);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("value", &*self.value.borrow())
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_signal_set() {
		let signal = Signal::new(0);
		assert_eq!(signal.get(), 0);

		signal.set(100);
		assert_eq!(signal.get(), 100);
	}

	#[test]
	fn test_signal_update() {
		let signal = Signal::new(0);

		signal.update(|n| *n += 1);
		assert_eq!(signal.get(), 1);

		signal.update(|n| *n *= 2);
		assert_eq!(signal.get(), 2);
	}

	#[test]
	fn test_signal_clone_shares_value() {
		let signal1 = Signal::new(42);
		let signal2 = signal1.clone();

		signal1.set(100);
		assert_eq!(signal2.get(), 100);
	}

	#[test]
	fn test_subscribers_see_new_value() {
		let signal = Signal::new(String::from("/"));
		let seen = Rc::new(RefCell::new(Vec::new()));

		let sink = Rc::clone(&seen);
		signal.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

		signal.set("/about".to_string());
		signal.update(|v| v.push('/'));

		assert_eq!(*seen.borrow(), vec!["/about", "/about/"]);
	}

	#[test]
	fn test_unsubscribe() {
		let signal = Signal::new(0);
		let calls = Rc::new(Cell::new(0));

		let counter = Rc::clone(&calls);
		let id = signal.subscribe(move |_| counter.set(counter.get() + 1));
		signal.set(1);
		assert!(signal.unsubscribe(id));
		assert!(!signal.unsubscribe(id));
		signal.set(2);

		assert_eq!(calls.get(), 1);
		assert_eq!(signal.subscriber_count(), 0);
	}

	#[test]
	fn test_set_untracked_defers_notification() {
		let path = Signal::new(String::from("/"));
		let name = Signal::new(None::<String>);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let sink = Rc::clone(&seen);
		let other = name.clone();
		path.subscribe(move |p: &String| sink.borrow_mut().push((p.clone(), other.get())));

		path.set_untracked("/about/".to_string());
		name.set_untracked(Some("about".to_string()));
		assert!(seen.borrow().is_empty());

		path.notify();
		assert_eq!(
			*seen.borrow(),
			vec![("/about/".to_string(), Some("about".to_string()))]
		);
	}

	#[test]
	fn test_reentrant_subscribe_during_notify() {
		let signal = Signal::new(0);
		let inner = signal.clone();
		signal.subscribe(move |_| {
			inner.subscribe(|_| {});
		});

		signal.set(1);
		assert_eq!(signal.subscriber_count(), 2);
	}
}
