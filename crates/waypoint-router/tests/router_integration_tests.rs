//! Integration tests for the client-side router
//!
//! These tests verify:
//! 1. Lazy component loading happens on navigation, once
//! 2. Overlapping navigations (abort, shared loads)
//! 3. Hash history URLs and traversal
//! 4. Configuration-driven construction and components

use futures::poll;
use std::cell::Cell;
use std::rc::Rc;
use std::task::Poll;
use tokio::sync::Notify;
use waypoint_core::{Component, Page};
use waypoint_router::{
	ComponentModule, HashHistory, HistoryMode, LoadError, MemoryHistory, RouteTable, Router,
	RouterConfig, RouterError, RouterOutlet, build_router,
};

struct Label(&'static str);

impl Component for Label {
	fn render(&self) -> Page {
		Page::text(self.0)
	}

	fn name() -> &'static str {
		"Label"
	}
}

fn counting_table(calls: Rc<Cell<usize>>) -> RouteTable {
	RouteTable::new().register("/", "home", move || {
		calls.set(calls.get() + 1);
		async { Ok(ComponentModule::new(Label("home"))) }
	})
}

fn gated_table(gate: Rc<Notify>, calls: Rc<Cell<usize>>) -> RouteTable {
	RouteTable::new()
		.register("/", "home", || async {
			Ok(ComponentModule::new(Label("home")))
		})
		.register("/slow/", "slow", move || {
			calls.set(calls.get() + 1);
			let gate = Rc::clone(&gate);
			async move {
				gate.notified().await;
				Ok(ComponentModule::new(Label("slow")))
			}
		})
}

#[tokio::test]
async fn test_loader_runs_on_first_navigation_only() {
	let calls = Rc::new(Cell::new(0));
	let router = build_router(
		counting_table(Rc::clone(&calls)),
		Box::new(HashHistory::default()),
	)
	.unwrap();

	assert_eq!(calls.get(), 0);
	assert!(!router.is_loaded("home"));

	for _ in 0..3 {
		let location = router.push("/").await.unwrap();
		assert_eq!(location.name.as_deref(), Some("home"));
	}

	assert_eq!(calls.get(), 1);
	assert!(router.is_loaded("home"));
	assert_eq!(router.render_current(), Page::text("home"));
}

#[tokio::test]
async fn test_hash_history_url_has_fragment() {
	let router = build_router(
		counting_table(Rc::new(Cell::new(0))),
		Box::new(HashHistory::default()),
	)
	.unwrap();

	let location = router.push("/").await.unwrap();

	assert!(location.href.contains('#'));
	assert_eq!(router.history().current_url(), "#/");
}

#[tokio::test]
async fn test_failed_load_is_retried_on_next_navigation() {
	let attempts = Rc::new(Cell::new(0));
	let counter = Rc::clone(&attempts);
	let table = RouteTable::new().register("/", "home", move || {
		counter.set(counter.get() + 1);
		let attempt = counter.get();
		async move {
			if attempt == 1 {
				Err(LoadError::new("offline"))
			} else {
				Ok(ComponentModule::new(Label("home")))
			}
		}
	});
	let router = build_router(table, Box::new(MemoryHistory::new())).unwrap();

	let err = router.push("/").await.unwrap_err();
	assert!(matches!(err, RouterError::ComponentLoad { ref route, .. } if route == "home"));
	assert!(router.current_route().is_none());

	let location = router.push("/").await.unwrap();
	assert_eq!(location.name.as_deref(), Some("home"));
	assert_eq!(attempts.get(), 2);
}

#[tokio::test]
async fn test_superseded_navigation_is_aborted() {
	let gate = Rc::new(Notify::new());
	let calls = Rc::new(Cell::new(0));
	let router = build_router(
		gated_table(Rc::clone(&gate), Rc::clone(&calls)),
		Box::new(MemoryHistory::new()),
	)
	.unwrap();

	let slow = router.push("/slow/");
	tokio::pin!(slow);
	assert!(matches!(poll!(&mut slow), Poll::Pending));

	let home = router.push("/").await.unwrap();
	assert_eq!(home.name.as_deref(), Some("home"));

	gate.notify_one();
	let err = slow.await.unwrap_err();

	assert_eq!(err, RouterError::NavigationAborted("/slow/".to_string()));
	assert_eq!(router.current_route_name().get().as_deref(), Some("home"));
	assert_eq!(router.history().location(), "/");
	// The load itself completed and stays cached.
	assert!(router.is_loaded("slow"));
	assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_concurrent_navigations_share_one_load() {
	let gate = Rc::new(Notify::new());
	let calls = Rc::new(Cell::new(0));
	let router = build_router(
		gated_table(Rc::clone(&gate), Rc::clone(&calls)),
		Box::new(MemoryHistory::new()),
	)
	.unwrap();

	let first = router.push("/slow/");
	let second = router.push("/slow/");
	tokio::pin!(first);
	tokio::pin!(second);
	assert!(matches!(poll!(&mut first), Poll::Pending));
	assert!(matches!(poll!(&mut second), Poll::Pending));

	gate.notify_one();
	let first = first.await;
	let second = second.await.unwrap();

	assert_eq!(first.unwrap_err(), RouterError::NavigationAborted("/slow/".to_string()));
	assert_eq!(second.name.as_deref(), Some("slow"));
	assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_router_from_config() {
	let config = RouterConfig::from_toml(
		r#"
[history]
mode = "hash"
base = "/app/"
"#,
	)
	.unwrap();
	let router = Router::from_config(counting_table(Rc::new(Cell::new(0))), &config).unwrap();

	assert_eq!(router.history().mode(), HistoryMode::Hash);
	assert_eq!(router.max_redirects(), 8);

	let location = router.push("/").await.unwrap();
	assert_eq!(location.href, "/app/#/");
}

#[tokio::test]
async fn test_outlet_follows_navigation() {
	let table = RouteTable::new()
		.register("/", "home", || async {
			Ok(ComponentModule::new(Label("home")))
		})
		.register("/about/", "about", || async {
			Ok(ComponentModule::new(Label("about")))
		});
	let router = Rc::new(build_router(table, Box::new(HashHistory::default())).unwrap());
	let outlet = RouterOutlet::new(Rc::clone(&router));

	router.push("/").await.unwrap();
	router.push("/about/").await.unwrap();
	assert!(outlet.render().render_to_string().contains("about"));

	router.back().await.unwrap();
	assert_eq!(
		outlet.render().render_to_string(),
		"<div data-router-outlet=\"true\" data-route=\"home\">home</div>"
	);
}
