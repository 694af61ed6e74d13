//! The home page.

use waypoint_core::component::ComponentModule;
use waypoint_core::{Component, IntoPage, Page, PageElement};
use waypoint_router::LoadError;

/// Landing page rendered at `/`.
#[derive(Debug, Clone)]
pub struct HomePage {
	title: String,
}

impl HomePage {
	/// Creates the page with its default title.
	pub fn new() -> Self {
		Self {
			title: "Home".to_string(),
		}
	}

	/// Returns the page title.
	pub fn title(&self) -> &str {
		&self.title
	}
}

impl Default for HomePage {
	fn default() -> Self {
		Self::new()
	}
}

impl Component for HomePage {
	fn render(&self) -> Page {
		PageElement::new("main")
			.attr("class", "home")
			.child(PageElement::new("h1").child(self.title.clone()))
			.child(PageElement::new("p").child("Welcome to Waypoint."))
			.into_page()
	}

	fn name() -> &'static str {
		"HomePage"
	}
}

/// Loads the home page module.
pub async fn load() -> Result<ComponentModule, LoadError> {
	tracing::debug!("Loading home page module");
	Ok(ComponentModule::new(HomePage::new()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_home_page_render() {
		let html = HomePage::new().render().render_to_string();
		assert_eq!(
			html,
			"<main class=\"home\"><h1>Home</h1><p>Welcome to Waypoint.</p></main>"
		);
	}

	#[tokio::test]
	async fn test_load_returns_home_module() {
		let module = load().await.unwrap();
		assert_eq!(module.name(), "HomePage");
	}
}
