//! Lazy component loading.
//!
//! A route's component is described by a loader: a zero-argument factory
//! returning a future that resolves to a [`ComponentModule`]. The loader is
//! not called when the route is registered or when the router is built, only
//! when navigation to the route happens. The first successful result is
//! cached and shared by every later navigation; a failed load is not cached,
//! so the next navigation calls the loader again.

use crate::error::LoadError;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use tokio::sync::OnceCell;
use waypoint_core::component::ComponentModule;
use waypoint_core::Component;

/// Future returned by a component loader.
pub type LoadFuture = LocalBoxFuture<'static, Result<ComponentModule, LoadError>>;

/// A type-erased component loader.
pub type ComponentLoader = Rc<dyn Fn() -> LoadFuture>;

/// A lazily loaded, cached component.
///
/// Clones share the loader, the cache and the invocation counter.
#[derive(Clone)]
pub struct LazyComponent {
	loader: ComponentLoader,
	cache: Rc<OnceCell<ComponentModule>>,
	invocations: Rc<Cell<usize>>,
}

impl LazyComponent {
	/// Wraps an async loader.
	pub fn new<F, Fut>(loader: F) -> Self
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<ComponentModule, LoadError>> + 'static,
	{
		Self {
			loader: Rc::new(move || loader().boxed_local()),
			cache: Rc::new(OnceCell::new()),
			invocations: Rc::new(Cell::new(0)),
		}
	}

	/// Creates a component that is already loaded.
	///
	/// The loader of a ready component is never invoked.
	pub fn ready<C: Component>(component: C) -> Self {
		let module = ComponentModule::new(component);
		Self {
			loader: Rc::new(|| {
				async { Err(LoadError::new("ready component has no loader")) }.boxed_local()
			}),
			cache: Rc::new(OnceCell::new_with(Some(module))),
			invocations: Rc::new(Cell::new(0)),
		}
	}

	/// Returns the component, invoking the loader if it has not loaded yet.
	///
	/// Concurrent callers share a single in-flight load.
	pub async fn load(&self) -> Result<ComponentModule, LoadError> {
		let module = self
			.cache
			.get_or_try_init(|| {
				self.invocations.set(self.invocations.get() + 1);
				(self.loader)()
			})
			.await?;
		Ok(module.clone())
	}

	/// Returns the component if it has already been loaded.
	pub fn get(&self) -> Option<ComponentModule> {
		self.cache.get().cloned()
	}

	/// Returns whether the component has been loaded.
	pub fn is_loaded(&self) -> bool {
		self.cache.initialized()
	}

	/// Returns how many times the loader has been invoked.
	pub fn invocations(&self) -> usize {
		self.invocations.get()
	}
}

impl std::fmt::Debug for LazyComponent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LazyComponent")
			.field("loaded", &self.is_loaded())
			.field("invocations", &self.invocations.get())
			.finish()
	}
}

/// Shorthand for [`LazyComponent::new`].
///
/// # Example
///
/// ```ignore
/// let home = lazy(|| async { Ok(ComponentModule::new(HomePage)) });
/// ```
pub fn lazy<F, Fut>(loader: F) -> LazyComponent
where
	F: Fn() -> Fut + 'static,
	Fut: Future<Output = Result<ComponentModule, LoadError>> + 'static,
{
	LazyComponent::new(loader)
}
