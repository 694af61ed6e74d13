//! Route registry.
//!
//! A [`RouteTable`] is the declarative input of a router: an ordered list of
//! [`RouteDescriptor`]s. Registration does no validation; patterns are
//! compiled and uniqueness is checked by [`build_router`](crate::build_router).

use crate::core::RouteMatch;
use crate::error::LoadError;
use crate::loader::LazyComponent;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;
use waypoint_core::component::ComponentModule;

/// Type alias for route guard functions.
pub type RouteGuard = Rc<dyn Fn(&RouteMatch) -> bool>;

/// What a route leads to.
#[derive(Debug, Clone)]
pub enum RouteTarget {
	/// A lazily loaded page component.
	Component(LazyComponent),
	/// Another path; parameters of this route are substituted into it.
	Redirect(String),
}

/// A single entry of a route table.
#[derive(Clone)]
pub struct RouteDescriptor {
	pub(crate) path: String,
	pub(crate) name: Option<String>,
	pub(crate) target: RouteTarget,
	pub(crate) meta: BTreeMap<String, String>,
	pub(crate) guard: Option<RouteGuard>,
}

impl std::fmt::Debug for RouteDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDescriptor")
			.field("path", &self.path)
			.field("name", &self.name)
			.field("target", &self.target)
			.field("meta", &self.meta)
			.field("has_guard", &self.guard.is_some())
			.finish()
	}
}

impl RouteDescriptor {
	/// Creates a named route to a lazily loaded component.
	pub fn new(path: impl Into<String>, name: impl Into<String>, component: LazyComponent) -> Self {
		Self {
			path: path.into(),
			name: Some(name.into()),
			target: RouteTarget::Component(component),
			meta: BTreeMap::new(),
			guard: None,
		}
	}

	/// Creates an unnamed route to a lazily loaded component.
	pub fn unnamed(path: impl Into<String>, component: LazyComponent) -> Self {
		Self {
			path: path.into(),
			name: None,
			target: RouteTarget::Component(component),
			meta: BTreeMap::new(),
			guard: None,
		}
	}

	/// Creates a route that forwards navigation to `to`.
	pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: None,
			target: RouteTarget::Redirect(to.into()),
			meta: BTreeMap::new(),
			guard: None,
		}
	}

	/// Sets or replaces the name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Adds a meta entry.
	pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.meta.insert(key.into(), value.into());
		self
	}

	/// Adds a guard to this route.
	///
	/// A route whose guard returns `false` is skipped during matching.
	pub fn with_guard<G>(mut self, guard: G) -> Self
	where
		G: Fn(&RouteMatch) -> bool + 'static,
	{
		self.guard = Some(Rc::new(guard));
		self
	}

	/// The path pattern as registered.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The route name, if any.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// The route target.
	pub fn target(&self) -> &RouteTarget {
		&self.target
	}

	/// Route meta entries.
	pub fn meta(&self) -> &BTreeMap<String, String> {
		&self.meta
	}

	/// The lazy component, if this route renders one.
	pub fn component(&self) -> Option<&LazyComponent> {
		match &self.target {
			RouteTarget::Component(component) => Some(component),
			RouteTarget::Redirect(_) => None,
		}
	}
}

/// An ordered list of route descriptors. The first matching entry wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	routes: Vec<RouteDescriptor>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a named route whose component is produced by `loader`.
	///
	/// The loader is not invoked here.
	///
	/// # Example
	///
	/// ```ignore
	/// let table = RouteTable::new()
	///     .register("/", "home", || async { Ok(ComponentModule::new(HomePage)) });
	/// ```
	pub fn register<F, Fut>(self, path: &str, name: &str, loader: F) -> Self
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<ComponentModule, LoadError>> + 'static,
	{
		self.add(RouteDescriptor::new(path, name, LazyComponent::new(loader)))
	}

	/// Registers a redirect from `path` to `to`.
	pub fn redirect(self, path: &str, to: &str) -> Self {
		self.add(RouteDescriptor::redirect(path, to))
	}

	/// Appends a descriptor.
	pub fn add(mut self, descriptor: RouteDescriptor) -> Self {
		tracing::debug!(
			path = %descriptor.path,
			name = ?descriptor.name,
			"Registering route"
		);
		self.routes.push(descriptor);
		self
	}

	/// Number of descriptors.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Whether the table has no descriptors.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Iterates descriptors in registration order.
	pub fn iter(&self) -> std::slice::Iter<'_, RouteDescriptor> {
		self.routes.iter()
	}

	/// Finds a descriptor by name.
	pub fn get(&self, name: &str) -> Option<&RouteDescriptor> {
		self.routes.iter().find(|r| r.name() == Some(name))
	}
}

impl IntoIterator for RouteTable {
	type Item = RouteDescriptor;
	type IntoIter = std::vec::IntoIter<RouteDescriptor>;

	fn into_iter(self) -> Self::IntoIter {
		self.routes.into_iter()
	}
}

impl<'a> IntoIterator for &'a RouteTable {
	type Item = &'a RouteDescriptor;
	type IntoIter = std::slice::Iter<'a, RouteDescriptor>;

	fn into_iter(self) -> Self::IntoIter {
		self.routes.iter()
	}
}

impl FromIterator<RouteDescriptor> for RouteTable {
	fn from_iter<I: IntoIterator<Item = RouteDescriptor>>(iter: I) -> Self {
		iter.into_iter().fold(Self::new(), Self::add)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;
	use waypoint_core::{Component, Page};

	struct Blank;

	impl Component for Blank {
		fn render(&self) -> Page {
			Page::Empty
		}

		fn name() -> &'static str {
			"Blank"
		}
	}

	#[rstest]
	fn test_register_does_not_invoke_loader() {
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let table = RouteTable::new().register("/", "home", move || {
			counter.set(counter.get() + 1);
			async { Ok(ComponentModule::new(Blank)) }
		});

		assert_eq!(table.len(), 1);
		assert_eq!(calls.get(), 0);

		let home = table.get("home").unwrap();
		assert_eq!(home.path(), "/");
		assert!(!home.component().unwrap().is_loaded());
	}

	#[rstest]
	fn test_registration_order_is_kept() {
		let table = RouteTable::new()
			.register("/", "home", || async { Ok(ComponentModule::new(Blank)) })
			.redirect("/start", "/")
			.add(RouteDescriptor::unnamed("/about", LazyComponent::ready(Blank)));

		let paths: Vec<&str> = table.iter().map(RouteDescriptor::path).collect();
		assert_eq!(paths, vec!["/", "/start", "/about"]);
		assert!(matches!(
			table.iter().nth(1).unwrap().target(),
			RouteTarget::Redirect(to) if to == "/"
		));
	}

	#[rstest]
	fn test_meta_and_name_builders() {
		let descriptor = RouteDescriptor::unnamed("/admin", LazyComponent::ready(Blank))
			.with_name("admin")
			.with_meta("requires_auth", "true")
			.with_meta("title", "Admin");

		assert_eq!(descriptor.name(), Some("admin"));
		assert_eq!(descriptor.meta().len(), 2);
		assert_eq!(descriptor.meta()["title"], "Admin");
	}

	#[rstest]
	fn test_collect_into_table() {
		let table: RouteTable = vec![
			RouteDescriptor::redirect("/a", "/b"),
			RouteDescriptor::redirect("/b", "/c"),
		]
		.into_iter()
		.collect();
		assert_eq!(table.len(), 2);
		assert!(table.get("a").is_none());
	}
}
