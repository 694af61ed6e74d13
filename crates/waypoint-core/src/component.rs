//! Component trait definition.

use crate::page::Page;
use std::rc::Rc;

/// Trait for reusable UI components.
///
/// Components are the building blocks of the UI. A routed page is a
/// component whose module is loaded on first navigation.
///
/// # Example
///
/// ```ignore
/// use waypoint_core::{Component, IntoPage, Page};
///
/// struct Greeting {
///     name: String,
/// }
///
/// impl Component for Greeting {
///     fn render(&self) -> Page {
///         Page::element("div")
///             .attr("class", "greeting")
///             .child(format!("Hello, {}!", self.name))
///             .into_page()
///     }
///
///     fn name() -> &'static str {
///         "Greeting"
///     }
/// }
/// ```
pub trait Component: 'static {
	/// Renders the component to a Page.
	fn render(&self) -> Page;

	/// Returns the component's name for debugging.
	fn name() -> &'static str
	where
		Self: Sized;
}

/// A loaded component module, type-erased for dynamic dispatch.
///
/// This is what a lazy route loader resolves to: the component itself plus
/// the name it was registered under. Cloning shares the same instance.
#[derive(Clone)]
pub struct ComponentModule {
	inner: Rc<dyn Component>,
	name: &'static str,
}

impl ComponentModule {
	/// Wraps a component.
	pub fn new<T: Component>(component: T) -> Self {
		Self {
			inner: Rc::new(component),
			name: T::name(),
		}
	}

	/// Returns the component's name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Renders the component.
	pub fn render(&self) -> Page {
		self.inner.render()
	}

	/// Returns whether both handles point at the same component instance.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl std::fmt::Debug for ComponentModule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentModule")
			.field("name", &self.name)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Hello;

	impl Component for Hello {
		fn render(&self) -> Page {
			Page::text("hello")
		}

		fn name() -> &'static str {
			"Hello"
		}
	}

	#[test]
	fn test_component_module_renders_inner() {
		let module = ComponentModule::new(Hello);
		assert_eq!(module.name(), "Hello");
		assert_eq!(module.render().render_to_string(), "hello");
	}

	#[test]
	fn test_component_module_clone_shares_instance() {
		let a = ComponentModule::new(Hello);
		let b = a.clone();
		let c = ComponentModule::new(Hello);
		assert!(a.ptr_eq(&b));
		assert!(!a.ptr_eq(&c));
	}
}
