//! Router components for navigation.
//!
//! [`Link`] renders an anchor whose `href` is written by the router's history
//! strategy, and [`RouterOutlet`] renders the page of the current route.

use crate::core::{RouteLocation, Router};
use crate::error::RouterError;
use std::rc::Rc;
use waypoint_core::{Component, IntoPage, Page, PageElement};

/// A link to a route.
///
/// Renders a plain `<a>`; in hash mode following the `href` only changes
/// the fragment. [`Link::follow`] navigates through the router instead.
///
/// # Example
///
/// ```ignore
/// let link = Link::new(&router, "/users/42/", "View User");
/// assert_eq!(link.href(), "#/users/42/");
/// link.follow(&router).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Link {
	/// The destination route path.
	to: String,
	/// The URL written into `href`.
	href: String,
	/// The link text.
	content: String,
	/// Additional CSS classes.
	class: Option<String>,
	/// Whether to replace the current history entry.
	replace: bool,
	/// Whether the link leaves the application (opens in a new tab).
	external: bool,
	/// Custom attributes.
	attrs: Vec<(String, String)>,
}

impl Link {
	/// Creates a link to a route path, resolving its `href` through `router`.
	pub fn new(router: &Router, to: impl Into<String>, content: impl Into<String>) -> Self {
		let to = to.into();
		Self {
			href: router.href(&to),
			to,
			content: content.into(),
			class: None,
			replace: false,
			external: false,
			attrs: Vec::new(),
		}
	}

	/// Creates a link that leaves the application.
	pub fn external_url(url: impl Into<String>, content: impl Into<String>) -> Self {
		let url = url.into();
		Self {
			href: url.clone(),
			to: url,
			content: content.into(),
			class: None,
			replace: false,
			external: true,
			attrs: Vec::new(),
		}
	}

	/// Sets the CSS class.
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Sets whether to replace the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Adds a custom attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	/// Returns the rendered `href`.
	pub fn href(&self) -> &str {
		&self.href
	}

	/// Returns whether this is a replace navigation.
	pub fn is_replace(&self) -> bool {
		self.replace
	}

	/// Returns whether this is an external link.
	pub fn is_external(&self) -> bool {
		self.external
	}

	/// Navigates `router` to this link's destination, pushing or replacing
	/// the history entry.
	///
	/// External links are not routed; they return `Ok(None)`.
	pub async fn follow(&self, router: &Router) -> Result<Option<RouteLocation>, RouterError> {
		if self.external {
			return Ok(None);
		}
		let location = if self.replace {
			router.replace(&self.to).await?
		} else {
			router.push(&self.to).await?
		};
		Ok(Some(location))
	}
}

impl Component for Link {
	fn render(&self) -> Page {
		let mut el = PageElement::new("a").attr("href", self.href.clone());

		if let Some(ref class) = self.class {
			el = el.attr("class", class.clone());
		}

		if self.external {
			el = el.attr("target", "_blank");
			el = el.attr("rel", "noopener noreferrer");
		}

		for (name, value) in &self.attrs {
			el = el.attr(name.clone(), value.clone());
		}

		el.child(self.content.clone()).into_page()
	}

	fn name() -> &'static str {
		"Link"
	}
}

/// A component that renders the matched route's page.
#[derive(Debug, Clone)]
pub struct RouterOutlet {
	router: Rc<Router>,
	/// The ID attribute for the outlet element.
	id: Option<String>,
	/// CSS class for the outlet element.
	class: Option<String>,
}

impl RouterOutlet {
	/// Creates an outlet for `router`.
	pub fn new(router: Rc<Router>) -> Self {
		Self {
			router,
			id: None,
			class: None,
		}
	}

	/// Sets the ID attribute.
	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Sets the CSS class.
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}
}

impl Component for RouterOutlet {
	fn render(&self) -> Page {
		let mut el = PageElement::new("div").attr("data-router-outlet", "true");

		if let Some(ref id) = self.id {
			el = el.attr("id", id.clone());
		}

		if let Some(ref class) = self.class {
			el = el.attr("class", class.clone());
		}

		if let Some(name) = self.router.current_route_name().get() {
			el = el.attr("data-route", name);
		}

		el.child(self.router.render_current()).into_page()
	}

	fn name() -> &'static str {
		"RouterOutlet"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::build_router;
	use crate::history::{HashHistory, MemoryHistory};
	use crate::loader::LazyComponent;
	use crate::route::{RouteDescriptor, RouteTable};
	use rstest::rstest;

	struct Greeting;

	impl Component for Greeting {
		fn render(&self) -> Page {
			PageElement::new("h1").child("Hello").into_page()
		}

		fn name() -> &'static str {
			"Greeting"
		}
	}

	fn table() -> RouteTable {
		RouteTable::new().add(RouteDescriptor::new(
			"/",
			"home",
			LazyComponent::ready(Greeting),
		))
	}

	#[rstest]
	fn test_link_href_in_hash_mode() {
		let router = build_router(table(), Box::new(HashHistory::default())).unwrap();
		let link = Link::new(&router, "/users/42/", "View User").class("nav");

		assert_eq!(link.to(), "/users/42/");
		assert_eq!(link.href(), "#/users/42/");
		assert_eq!(
			link.render().render_to_string(),
			"<a href=\"#/users/42/\" class=\"nav\">View User</a>"
		);
	}

	#[tokio::test]
	async fn test_link_follow_pushes_entry() {
		let router = build_router(table(), Box::new(MemoryHistory::starting_at("/start"))).unwrap();
		let link = Link::new(&router, "/", "Home");

		let location = link.follow(&router).await.unwrap().unwrap();

		assert_eq!(location.name.as_deref(), Some("home"));
		assert_eq!(
			router.back().await.unwrap_err(),
			RouterError::NotFound("/start".to_string())
		);
	}

	#[tokio::test]
	async fn test_link_follow_replaces_entry() {
		let router = build_router(table(), Box::new(MemoryHistory::starting_at("/start"))).unwrap();
		let link = Link::new(&router, "/", "Home").replace(true);
		assert!(link.is_replace());

		link.follow(&router).await.unwrap();

		assert_eq!(router.history().location(), "/");
		assert!(router.back().await.unwrap().is_none());
		assert_eq!(router.current_path().get(), "/");
	}

	#[rstest]
	fn test_external_link() {
		let link = Link::external_url("https://example.com", "Docs");
		assert!(link.is_external());
		let html = link.render().render_to_string();
		assert!(html.contains("target=\"_blank\""));
		assert_eq!(html.matches("href=").count(), 1);
	}

	#[tokio::test]
	async fn test_external_link_is_not_routed() {
		let router = build_router(table(), Box::new(MemoryHistory::new())).unwrap();
		let link = Link::external_url("https://example.com", "Docs");

		assert!(link.follow(&router).await.unwrap().is_none());
		assert!(router.current_route().is_none());
	}

	#[tokio::test]
	async fn test_outlet_renders_current_page() {
		let router = Rc::new(build_router(table(), Box::new(MemoryHistory::new())).unwrap());
		let outlet = RouterOutlet::new(Rc::clone(&router)).id("app");

		assert_eq!(
			outlet.render().render_to_string(),
			"<div data-router-outlet=\"true\" id=\"app\"></div>"
		);

		router.push("/").await.unwrap();

		assert_eq!(
			outlet.render().render_to_string(),
			"<div data-router-outlet=\"true\" id=\"app\" data-route=\"home\"><h1>Hello</h1></div>"
		);
	}
}
