//! History strategies.
//!
//! A history strategy decides how the current route is reflected in the URL
//! and how entries are stacked:
//!
//! - [`HashHistory`] keeps the route in the URL fragment (`/app/#/users/`), so
//!   the server only ever sees the page that hosts the application.
//! - [`WebHistory`] writes the route as the URL path (`/app/users/`).
//! - [`MemoryHistory`] never touches a browser; it is what tests and
//!   non-browser targets use.
//!
//! On `wasm32`, `HashHistory` and `WebHistory` drive `window.history` and read
//! `window.location`. On other targets they fall back to the same in-memory
//! entry stack as `MemoryHistory`, so their URL semantics stay testable.

use crate::error::HistoryError;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The kind of history a router is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
	/// Route encoded after `#`.
	#[default]
	Hash,
	/// Route encoded as the URL path.
	Web,
	/// No URL at all.
	Memory,
}

impl std::fmt::Display for HistoryMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Hash => write!(f, "hash"),
			Self::Web => write!(f, "web"),
			Self::Memory => write!(f, "memory"),
		}
	}
}

/// Navigation kinds recorded by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
	/// A new entry is pushed.
	Push,
	/// The current entry is replaced.
	Replace,
	/// The user moved through existing entries (back/forward).
	Pop,
}

/// Callback notified with the new location after a traversal.
pub type HistoryListener = Rc<dyn Fn(&str)>;

/// Handle returned by [`History::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A history strategy.
///
/// Locations are route paths including any query string (`/search?q=x`),
/// never full URLs. [`History::href`] turns a location into the URL the
/// strategy writes.
pub trait History {
	/// Which strategy this is.
	fn mode(&self) -> HistoryMode;

	/// The prefix prepended to every generated URL.
	fn base(&self) -> &str;

	/// The current location.
	fn location(&self) -> String;

	/// The URL written for `location`.
	fn href(&self, location: &str) -> String;

	/// Appends an entry, discarding any forward entries.
	fn push(&self, location: &str) -> Result<(), HistoryError>;

	/// Overwrites the current entry.
	fn replace(&self, location: &str) -> Result<(), HistoryError>;

	/// Moves `delta` entries through the stack.
	///
	/// Out-of-range moves are ignored. Listeners are notified after a move.
	fn go(&self, delta: isize) -> Result<(), HistoryError>;

	/// Registers a traversal listener.
	fn listen(&self, listener: HistoryListener) -> ListenerId;

	/// Removes a traversal listener. Returns `false` if it was not registered.
	fn unlisten(&self, id: ListenerId) -> bool;

	/// Whether `go` completes later (through a listener) instead of
	/// immediately. True only for browser-backed strategies on `wasm32`.
	fn is_traversal_async(&self) -> bool {
		false
	}

	/// Moves one entry back.
	fn back(&self) -> Result<(), HistoryError> {
		self.go(-1)
	}

	/// Moves one entry forward.
	fn forward(&self) -> Result<(), HistoryError> {
		self.go(1)
	}

	/// The URL of the current entry.
	fn current_url(&self) -> String {
		self.href(&self.location())
	}
}

/// In-memory entry stack with listeners, shared by all strategies.
#[derive(Default)]
struct EntryStack {
	entries: RefCell<Vec<String>>,
	index: Cell<usize>,
	listeners: RefCell<Vec<(ListenerId, HistoryListener)>>,
	next_listener: Cell<u64>,
}

impl EntryStack {
	fn starting_at(location: &str) -> Self {
		let stack = Self::default();
		stack.entries.borrow_mut().push(normalize_location(location));
		stack
	}

	fn location(&self) -> String {
		self.entries
			.borrow()
			.get(self.index.get())
			.cloned()
			.unwrap_or_else(|| "/".to_string())
	}

	fn push(&self, location: &str) {
		let mut entries = self.entries.borrow_mut();
		entries.truncate(self.index.get() + 1);
		entries.push(normalize_location(location));
		self.index.set(entries.len() - 1);
	}

	fn replace(&self, location: &str) {
		let mut entries = self.entries.borrow_mut();
		let location = normalize_location(location);
		match entries.get_mut(self.index.get()) {
			Some(entry) => *entry = location,
			None => entries.push(location),
		}
	}

	fn go(&self, delta: isize) {
		let Some(target) = self.index.get().checked_add_signed(delta) else {
			return;
		};
		if delta == 0 || target >= self.len() {
			return;
		}
		self.index.set(target);
		self.notify(&self.location());
	}

	fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	fn listen(&self, listener: HistoryListener) -> ListenerId {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.listeners.borrow_mut().push((id, listener));
		id
	}

	fn unlisten(&self, id: ListenerId) -> bool {
		let mut listeners = self.listeners.borrow_mut();
		let before = listeners.len();
		listeners.retain(|(lid, _)| *lid != id);
		listeners.len() != before
	}

	fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	fn notify(&self, location: &str) {
		let snapshot: Vec<HistoryListener> = self
			.listeners
			.borrow()
			.iter()
			.map(|(_, l)| Rc::clone(l))
			.collect();
		for listener in snapshot {
			listener(location);
		}
	}
}

impl std::fmt::Debug for EntryStack {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EntryStack")
			.field("entries", &self.entries.borrow())
			.field("index", &self.index.get())
			.field("listeners", &self.listener_count())
			.finish()
	}
}

/// Ensures a location starts with `/`.
fn normalize_location(location: &str) -> String {
	if location.is_empty() {
		"/".to_string()
	} else if location.starts_with('/') {
		location.to_string()
	} else {
		format!("/{}", location)
	}
}

/// Extracts the route location from a URL fragment (`#/users/` -> `/users/`).
pub fn location_from_hash(hash: &str) -> String {
	normalize_location(hash.strip_prefix('#').unwrap_or(hash))
}

/// Strips `base` from a URL path (`/app/users/` with base `/app` -> `/users/`).
pub fn location_from_path(path: &str, base: &str) -> String {
	let base = base.trim_end_matches('/');
	let stripped = if base.is_empty() {
		path
	} else {
		path.strip_prefix(base).unwrap_or(path)
	};
	normalize_location(stripped)
}

/// Attaches the single `popstate` handler of a browser-backed history.
///
/// The handler reads the new location and dispatches it to the stack's
/// listeners. It is attached once, on the first `listen`.
#[cfg(target_arch = "wasm32")]
fn follow_popstate(
	slot: &RefCell<Option<browser::PopstateListener>>,
	stack: &Rc<EntryStack>,
	read_location: impl Fn() -> Option<String> + 'static,
) {
	if slot.borrow().is_some() {
		return;
	}
	let stack = Rc::downgrade(stack);
	let attached = browser::PopstateListener::attach(move || {
		if let (Some(stack), Some(location)) = (stack.upgrade(), read_location()) {
			stack.notify(&location);
		}
	});
	match attached {
		Ok(listener) => *slot.borrow_mut() = Some(listener),
		Err(err) => tracing::warn!("Failed to register popstate listener: {}", err),
	}
}

/// Hash-based history: the route lives after `#` in the URL.
#[derive(Debug)]
pub struct HashHistory {
	base: String,
	stack: Rc<EntryStack>,
	#[cfg(target_arch = "wasm32")]
	popstate: RefCell<Option<browser::PopstateListener>>,
}

impl HashHistory {
	/// Creates a hash history whose URLs start with `base` (usually empty).
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into();
		let initial = Self::initial_location();
		Self {
			base,
			stack: Rc::new(EntryStack::starting_at(&initial)),
			#[cfg(target_arch = "wasm32")]
			popstate: RefCell::new(None),
		}
	}

	#[cfg(target_arch = "wasm32")]
	fn initial_location() -> String {
		browser::hash()
			.map(|h| location_from_hash(&h))
			.unwrap_or_else(|_| "/".to_string())
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn initial_location() -> String {
		"/".to_string()
	}

	/// Number of entries recorded in the in-memory stack.
	pub fn len(&self) -> usize {
		self.stack.len()
	}

	/// Whether the in-memory stack is empty (never true after construction).
	pub fn is_empty(&self) -> bool {
		self.stack.len() == 0
	}
}

impl Default for HashHistory {
	fn default() -> Self {
		Self::new("")
	}
}

impl History for HashHistory {
	fn mode(&self) -> HistoryMode {
		HistoryMode::Hash
	}

	fn base(&self) -> &str {
		&self.base
	}

	fn location(&self) -> String {
		#[cfg(target_arch = "wasm32")]
		if let Ok(hash) = browser::hash() {
			return location_from_hash(&hash);
		}
		self.stack.location()
	}

	fn href(&self, location: &str) -> String {
		format!("{}#{}", self.base, normalize_location(location))
	}

	fn push(&self, location: &str) -> Result<(), HistoryError> {
		#[cfg(target_arch = "wasm32")]
		browser::push_state(&self.href(location))?;
		self.stack.push(location);
		Ok(())
	}

	fn replace(&self, location: &str) -> Result<(), HistoryError> {
		#[cfg(target_arch = "wasm32")]
		browser::replace_state(&self.href(location))?;
		self.stack.replace(location);
		Ok(())
	}

	#[cfg(target_arch = "wasm32")]
	fn go(&self, delta: isize) -> Result<(), HistoryError> {
		browser::go(delta)
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn go(&self, delta: isize) -> Result<(), HistoryError> {
		self.stack.go(delta);
		Ok(())
	}

	fn listen(&self, listener: HistoryListener) -> ListenerId {
		let id = self.stack.listen(listener);
		#[cfg(target_arch = "wasm32")]
		follow_popstate(&self.popstate, &self.stack, || {
			browser::hash().ok().map(|hash| location_from_hash(&hash))
		});
		id
	}

	fn unlisten(&self, id: ListenerId) -> bool {
		let removed = self.stack.unlisten(id);
		#[cfg(target_arch = "wasm32")]
		if self.stack.listener_count() == 0 {
			self.popstate.borrow_mut().take();
		}
		removed
	}

	fn is_traversal_async(&self) -> bool {
		cfg!(target_arch = "wasm32")
	}
}

/// HTML5 history: the route is the URL path below `base`.
#[derive(Debug)]
pub struct WebHistory {
	base: String,
	stack: Rc<EntryStack>,
	#[cfg(target_arch = "wasm32")]
	popstate: RefCell<Option<browser::PopstateListener>>,
}

impl WebHistory {
	/// Creates a web history rooted at `base` (e.g. `/app`).
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into().trim_end_matches('/').to_string();
		let initial = Self::initial_location(&base);
		Self {
			base,
			stack: Rc::new(EntryStack::starting_at(&initial)),
			#[cfg(target_arch = "wasm32")]
			popstate: RefCell::new(None),
		}
	}

	#[cfg(target_arch = "wasm32")]
	fn initial_location(base: &str) -> String {
		browser::path()
			.map(|p| location_from_path(&p, base))
			.unwrap_or_else(|_| "/".to_string())
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn initial_location(_base: &str) -> String {
		"/".to_string()
	}
}

impl Default for WebHistory {
	fn default() -> Self {
		Self::new("")
	}
}

impl History for WebHistory {
	fn mode(&self) -> HistoryMode {
		HistoryMode::Web
	}

	fn base(&self) -> &str {
		&self.base
	}

	fn location(&self) -> String {
		#[cfg(target_arch = "wasm32")]
		if let Ok(path) = browser::path() {
			return location_from_path(&path, &self.base);
		}
		self.stack.location()
	}

	fn href(&self, location: &str) -> String {
		format!("{}{}", self.base, normalize_location(location))
	}

	fn push(&self, location: &str) -> Result<(), HistoryError> {
		#[cfg(target_arch = "wasm32")]
		browser::push_state(&self.href(location))?;
		self.stack.push(location);
		Ok(())
	}

	fn replace(&self, location: &str) -> Result<(), HistoryError> {
		#[cfg(target_arch = "wasm32")]
		browser::replace_state(&self.href(location))?;
		self.stack.replace(location);
		Ok(())
	}

	#[cfg(target_arch = "wasm32")]
	fn go(&self, delta: isize) -> Result<(), HistoryError> {
		browser::go(delta)
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn go(&self, delta: isize) -> Result<(), HistoryError> {
		self.stack.go(delta);
		Ok(())
	}

	fn listen(&self, listener: HistoryListener) -> ListenerId {
		let id = self.stack.listen(listener);
		#[cfg(target_arch = "wasm32")]
		{
			let base = self.base.clone();
			follow_popstate(&self.popstate, &self.stack, move || {
				browser::path().ok().map(|path| location_from_path(&path, &base))
			});
		}
		id
	}

	fn unlisten(&self, id: ListenerId) -> bool {
		let removed = self.stack.unlisten(id);
		#[cfg(target_arch = "wasm32")]
		if self.stack.listener_count() == 0 {
			self.popstate.borrow_mut().take();
		}
		removed
	}

	fn is_traversal_async(&self) -> bool {
		cfg!(target_arch = "wasm32")
	}
}

/// In-memory history, independent of any browser.
#[derive(Debug)]
pub struct MemoryHistory {
	base: String,
	stack: EntryStack,
}

impl MemoryHistory {
	/// Creates a memory history starting at `/`.
	pub fn new() -> Self {
		Self::starting_at("/")
	}

	/// Creates a memory history starting at `location`.
	pub fn starting_at(location: &str) -> Self {
		Self {
			base: String::new(),
			stack: EntryStack::starting_at(location),
		}
	}

	/// Number of recorded entries.
	pub fn len(&self) -> usize {
		self.stack.len()
	}

	/// Whether no entries are recorded (never true after construction).
	pub fn is_empty(&self) -> bool {
		self.stack.len() == 0
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new()
	}
}

impl History for MemoryHistory {
	fn mode(&self) -> HistoryMode {
		HistoryMode::Memory
	}

	fn base(&self) -> &str {
		&self.base
	}

	fn location(&self) -> String {
		self.stack.location()
	}

	fn href(&self, location: &str) -> String {
		normalize_location(location)
	}

	fn push(&self, location: &str) -> Result<(), HistoryError> {
		self.stack.push(location);
		Ok(())
	}

	fn replace(&self, location: &str) -> Result<(), HistoryError> {
		self.stack.replace(location);
		Ok(())
	}

	fn go(&self, delta: isize) -> Result<(), HistoryError> {
		self.stack.go(delta);
		Ok(())
	}

	fn listen(&self, listener: HistoryListener) -> ListenerId {
		self.stack.listen(listener)
	}

	fn unlisten(&self, id: ListenerId) -> bool {
		self.stack.unlisten(id)
	}
}

/// Creates the history strategy for `mode`.
pub fn create_history(mode: HistoryMode, base: &str) -> Box<dyn History> {
	match mode {
		HistoryMode::Hash => Box::new(HashHistory::new(base)),
		HistoryMode::Web => Box::new(WebHistory::new(base)),
		HistoryMode::Memory => Box::new(MemoryHistory::new()),
	}
}

#[cfg(target_arch = "wasm32")]
mod browser {
	//! Thin wrappers over `window.location` and `window.history`.

	use super::HistoryError;
	use wasm_bindgen::closure::Closure;
	use wasm_bindgen::{JsCast, JsValue};

	fn js_err(err: JsValue) -> HistoryError {
		HistoryError::Operation(format!("{:?}", err))
	}

	fn window() -> Result<web_sys::Window, HistoryError> {
		web_sys::window().ok_or_else(|| HistoryError::Unavailable("no window".to_string()))
	}

	fn history() -> Result<web_sys::History, HistoryError> {
		window()?
			.history()
			.map_err(|_| HistoryError::Unavailable("no history object".to_string()))
	}

	pub(super) fn hash() -> Result<String, HistoryError> {
		window()?.location().hash().map_err(js_err)
	}

	pub(super) fn path() -> Result<String, HistoryError> {
		let location = window()?.location();
		let pathname = location.pathname().map_err(js_err)?;
		let search = location.search().map_err(js_err)?;
		Ok(format!("{}{}", pathname, search))
	}

	pub(super) fn push_state(url: &str) -> Result<(), HistoryError> {
		history()?
			.push_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(js_err)
	}

	pub(super) fn replace_state(url: &str) -> Result<(), HistoryError> {
		history()?
			.replace_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(js_err)
	}

	pub(super) fn go(delta: isize) -> Result<(), HistoryError> {
		history()?.go_with_delta(delta as i32).map_err(js_err)
	}

	/// A `popstate` handler on `window`, removed when dropped.
	pub(super) struct PopstateListener {
		closure: Closure<dyn Fn(web_sys::Event)>,
	}

	impl PopstateListener {
		pub(super) fn attach(callback: impl Fn() + 'static) -> Result<Self, HistoryError> {
			let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |_event: web_sys::Event| {
				callback();
			});
			window()?
				.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
				.map_err(js_err)?;
			Ok(Self { closure })
		}
	}

	impl Drop for PopstateListener {
		fn drop(&mut self) {
			if let Ok(window) = window() {
				let removed = window.remove_event_listener_with_callback(
					"popstate",
					self.closure.as_ref().unchecked_ref(),
				);
				if let Err(err) = removed {
					tracing::warn!("Failed to remove popstate listener: {:?}", err);
				}
			}
		}
	}

	impl std::fmt::Debug for PopstateListener {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			f.debug_struct("PopstateListener").finish_non_exhaustive()
		}
	}
}
