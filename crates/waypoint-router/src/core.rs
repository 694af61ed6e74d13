//! Core Router implementation.
//!
//! [`build_router`] compiles a [`RouteTable`] into a [`Router`] bound to a
//! history strategy. Navigation is asynchronous only because a route's
//! component may still have to be loaded; the order is always "resolve, load,
//! write history, commit".

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::history::{History, NavigationType, create_history};
use crate::loader::LazyComponent;
use crate::pattern::{PathPattern, split_target};
use crate::route::{RouteGuard, RouteTable, RouteTarget};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use waypoint_core::Page;
use waypoint_core::component::ComponentModule;
use waypoint_core::reactive::Signal;

/// Default limit on chained redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 8;

#[derive(Clone)]
enum CompiledTarget {
	Component(LazyComponent),
	Redirect(PathPattern),
}

/// A compiled route.
#[derive(Clone)]
pub struct Route {
	pattern: PathPattern,
	name: Option<String>,
	target: CompiledTarget,
	meta: Rc<BTreeMap<String, String>>,
	guard: Option<RouteGuard>,
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let target = match &self.target {
			CompiledTarget::Component(component) => format!("{:?}", component),
			CompiledTarget::Redirect(to) => format!("Redirect({})", to),
		};
		f.debug_struct("Route")
			.field("pattern", &self.pattern.pattern())
			.field("name", &self.name)
			.field("target", &target)
			.field("has_guard", &self.guard.is_some())
			.finish()
	}
}

impl Route {
	/// Returns the route name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the pattern.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// Returns the route meta entries.
	pub fn meta(&self) -> &BTreeMap<String, String> {
		&self.meta
	}

	/// Returns the lazy component, or `None` for a redirect.
	pub fn component(&self) -> Option<&LazyComponent> {
		match &self.target {
			CompiledTarget::Component(component) => Some(component),
			CompiledTarget::Redirect(_) => None,
		}
	}

	/// Returns the redirect target pattern, if this is a redirect.
	pub fn redirect_target(&self) -> Option<&PathPattern> {
		match &self.target {
			CompiledTarget::Redirect(to) => Some(to),
			CompiledTarget::Component(_) => None,
		}
	}

	/// Checks if the guard allows access.
	pub fn check_guard(&self, route_match: &RouteMatch) -> bool {
		self.guard.as_ref().map(|g| g(route_match)).unwrap_or(true)
	}

	fn label(&self) -> String {
		self.name
			.clone()
			.unwrap_or_else(|| self.pattern.pattern().to_string())
	}
}

/// A matched route with extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	/// The matched route.
	pub route: Route,
	/// The matched path (without query string).
	pub path: String,
	/// Extracted path parameters.
	pub params: HashMap<String, String>,
}

/// The result of a committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLocation {
	/// Route path, without query string.
	pub path: String,
	/// Route path with query string.
	pub full_path: String,
	/// Name of the matched route. `None` for unnamed routes and for the
	/// not-found fallback.
	pub name: Option<String>,
	/// Whether a route matched. `false` means the not-found fallback rendered.
	pub matched: bool,
	/// Path parameters.
	pub params: HashMap<String, String>,
	/// Decoded query pairs in order.
	pub query: Vec<(String, String)>,
	/// Meta entries of the matched route.
	pub meta: BTreeMap<String, String>,
	/// URL written by the history strategy.
	pub href: String,
	/// The path originally requested, when redirects were followed.
	pub redirected_from: Option<String>,
}

impl RouteLocation {
	/// Returns the first query value for `key`.
	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns a path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

/// Outcome of resolving a target through redirects.
struct Resolution {
	path: String,
	query: Option<String>,
	route_match: Option<RouteMatch>,
	redirected_from: Option<String>,
}

/// The client-side router.
pub struct Router {
	/// Compiled routes.
	routes: Vec<Route>,
	/// Named routes for reverse lookups.
	named_routes: HashMap<String, usize>,
	/// Bound history strategy.
	history: Box<dyn History>,
	/// Last committed location.
	current: Signal<Option<RouteLocation>>,
	/// Current path signal.
	current_path: Signal<String>,
	/// Current params signal.
	current_params: Signal<HashMap<String, String>>,
	/// Current matched route name signal.
	current_route_name: Signal<Option<String>>,
	/// Component of the committed route.
	current_module: RefCell<Option<ComponentModule>>,
	/// Not found handler.
	not_found: Option<Rc<dyn Fn() -> Page>>,
	/// Incremented whenever a navigation starts.
	navigation_id: Cell<u64>,
	max_redirects: usize,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes_count", &self.routes.len())
			.field(
				"named_routes",
				&self.named_routes.keys().collect::<Vec<_>>(),
			)
			.field("history", &self.history.mode())
			.field("current", &self.current_path.get())
			.finish()
	}
}

/// Compiles `table` into a router bound to `history`.
///
/// No component loader is invoked.
///
/// # Errors
///
/// - [`RouterError::InvalidPattern`] if a route path or redirect target is
///   malformed
/// - [`RouterError::DuplicateRouteName`] if two routes share a name
/// - [`RouterError::DuplicatePath`] if two parameterless routes share a path
/// - [`RouterError::MissingParameter`] if a redirect target uses a parameter
///   its source path does not capture
pub fn build_router(table: RouteTable, history: Box<dyn History>) -> Result<Router, RouterError> {
	let mut routes = Vec::with_capacity(table.len());
	let mut named_routes = HashMap::new();
	let mut static_paths = HashSet::new();

	for descriptor in table {
		let pattern = compile(&descriptor.path)?;

		if let Some(name) = &descriptor.name {
			if named_routes.insert(name.clone(), routes.len()).is_some() {
				return Err(RouterError::DuplicateRouteName(name.clone()));
			}
		}

		if pattern.is_exact() && !static_paths.insert(descriptor.path.clone()) {
			return Err(RouterError::DuplicatePath(descriptor.path));
		}

		let target = match descriptor.target {
			RouteTarget::Component(component) => CompiledTarget::Component(component),
			RouteTarget::Redirect(to) => {
				let to = compile(&to)?;
				if let Some(missing) = to
					.param_names()
					.iter()
					.find(|p| !pattern.param_names().contains(*p))
				{
					return Err(RouterError::MissingParameter(missing.clone()));
				}
				CompiledTarget::Redirect(to)
			}
		};

		routes.push(Route {
			pattern,
			name: descriptor.name,
			target,
			meta: Rc::new(descriptor.meta),
			guard: descriptor.guard,
		});
	}

	tracing::debug!(
		routes = routes.len(),
		history = %history.mode(),
		"Router built"
	);

	Ok(Router {
		routes,
		named_routes,
		history,
		current: Signal::new(None),
		current_path: Signal::new("/".to_string()),
		current_params: Signal::new(HashMap::new()),
		current_route_name: Signal::new(None),
		current_module: RefCell::new(None),
		not_found: None,
		navigation_id: Cell::new(0),
		max_redirects: DEFAULT_MAX_REDIRECTS,
	})
}

fn compile(pattern: &str) -> Result<PathPattern, RouterError> {
	PathPattern::new(pattern).map_err(|source| RouterError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})
}

/// Builds a path from `pattern`, naming the parameter that prevents it.
fn fill_pattern(
	pattern: &PathPattern,
	params: &HashMap<String, String>,
) -> Result<String, RouterError> {
	if let Some(missing) = pattern.missing_param(params) {
		return Err(RouterError::MissingParameter(missing.to_string()));
	}
	if let Some(name) = pattern.invalid_param(params) {
		return Err(RouterError::InvalidParameter {
			name: name.to_string(),
			value: params.get(name).cloned().unwrap_or_default(),
		});
	}
	pattern
		.reverse(params)
		.ok_or_else(|| RouterError::MissingParameter(pattern.pattern().to_string()))
}

fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
	let Some(query) = query else {
		return Vec::new();
	};
	serde_urlencoded::from_str(query).unwrap_or_else(|err| {
		tracing::debug!(query, error = %err, "Ignoring malformed query string");
		Vec::new()
	})
}

impl Router {
	/// Builds a router from configuration, creating its history strategy.
	pub fn from_config(table: RouteTable, config: &RouterConfig) -> Result<Self, RouterError> {
		let history = create_history(config.history.mode, &config.history.base);
		Ok(build_router(table, history)?.with_max_redirects(config.navigation.max_redirects))
	}

	/// Sets the not found handler.
	pub fn with_not_found<F>(mut self, component: F) -> Self
	where
		F: Fn() -> Page + 'static,
	{
		self.not_found = Some(Rc::new(component));
		self
	}

	/// Sets the redirect limit.
	pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;
		self
	}

	/// Returns the bound history strategy.
	pub fn history(&self) -> &dyn History {
		self.history.as_ref()
	}

	/// Returns the compiled routes in matching order.
	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// Returns the number of routes.
	pub fn route_count(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether a route with this name exists.
	pub fn has_route(&self, name: &str) -> bool {
		self.named_routes.contains_key(name)
	}

	/// Returns the redirect limit.
	pub fn max_redirects(&self) -> usize {
		self.max_redirects
	}

	/// Returns whether the named route's component has been loaded.
	pub fn is_loaded(&self, name: &str) -> bool {
		self.named_routes
			.get(name)
			.and_then(|&i| self.routes[i].component())
			.is_some_and(LazyComponent::is_loaded)
	}

	/// Returns the last committed location signal.
	pub fn current(&self) -> &Signal<Option<RouteLocation>> {
		&self.current
	}

	/// Returns the last committed location.
	pub fn current_route(&self) -> Option<RouteLocation> {
		self.current.get()
	}

	/// Returns the current path signal.
	pub fn current_path(&self) -> &Signal<String> {
		&self.current_path
	}

	/// Returns the current params signal.
	pub fn current_params(&self) -> &Signal<HashMap<String, String>> {
		&self.current_params
	}

	/// Returns the current route name signal.
	pub fn current_route_name(&self) -> &Signal<Option<String>> {
		&self.current_route_name
	}

	/// Matches a path against registered routes.
	///
	/// Routes whose guard rejects the match are skipped.
	pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
		for route in &self.routes {
			if let Some(params) = route.pattern.matches(path) {
				let route_match = RouteMatch {
					route: route.clone(),
					path: path.to_string(),
					params,
				};

				if route.check_guard(&route_match) {
					return Some(route_match);
				}
				tracing::debug!(path, route = %route.label(), "Route guard rejected match");
			}
		}
		None
	}

	/// Resolves a navigation target (path with optional query) without
	/// following redirects or loading anything.
	pub fn resolve(&self, target: &str) -> Option<RouteMatch> {
		let (path, _) = split_target(target);
		self.match_path(&path)
	}

	/// Generates a path by route name with parameters.
	///
	/// # Errors
	///
	/// - [`RouterError::InvalidRouteName`] if no route has that name
	/// - [`RouterError::MissingParameter`] if a parameter is not supplied
	/// - [`RouterError::InvalidParameter`] if a value would not match its
	///   segment, e.g. a `/` in a single-segment parameter
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
		let index = self
			.named_routes
			.get(name)
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;

		let pattern = &self.routes[*index].pattern;
		let params_map: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		fill_pattern(pattern, &params_map)
	}

	/// Returns the URL the history strategy writes for `target`.
	pub fn href(&self, target: &str) -> String {
		let (path, query) = split_target(target);
		match query {
			Some(query) => self.history.href(&format!("{}?{}", path, query)),
			None => self.history.href(&path),
		}
	}

	/// Navigates to a path, pushing a history entry.
	pub async fn push(&self, target: &str) -> Result<RouteLocation, RouterError> {
		self.navigate(target, NavigationType::Push).await
	}

	/// Navigates to a path, replacing the current history entry.
	pub async fn replace(&self, target: &str) -> Result<RouteLocation, RouterError> {
		self.navigate(target, NavigationType::Replace).await
	}

	/// Navigates to a named route.
	pub async fn push_named(
		&self,
		name: &str,
		params: &[(&str, &str)],
	) -> Result<RouteLocation, RouterError> {
		let path = self.reverse(name, params)?;
		self.push(&path).await
	}

	/// Re-resolves the history's current location and commits it.
	///
	/// Used for the initial navigation and after back/forward traversal.
	pub async fn sync_from_history(&self) -> Result<RouteLocation, RouterError> {
		let location = self.history.location();
		self.navigate(&location, NavigationType::Pop).await
	}

	/// Moves `delta` entries through history and re-resolves the location.
	///
	/// Returns `Ok(None)` when the traversal completes asynchronously (in a
	/// browser the history listener commits the new location) or when the
	/// move was out of range.
	pub async fn go(&self, delta: isize) -> Result<Option<RouteLocation>, RouterError> {
		let before = self.history.location();
		self.history.go(delta)?;
		if self.history.is_traversal_async() || self.history.location() == before {
			return Ok(None);
		}
		self.sync_from_history().await.map(Some)
	}

	/// Moves one entry back.
	pub async fn back(&self) -> Result<Option<RouteLocation>, RouterError> {
		self.go(-1).await
	}

	/// Moves one entry forward.
	pub async fn forward(&self) -> Result<Option<RouteLocation>, RouterError> {
		self.go(1).await
	}

	/// Renders the current route's component.
	///
	/// Falls back to the not found handler for an unmatched location and to
	/// [`Page::Empty`] before the first navigation.
	pub fn render_current(&self) -> Page {
		match self.current.with(|c| c.as_ref().map(|l| l.matched)) {
			Some(true) => self
				.current_module
				.borrow()
				.as_ref()
				.map(ComponentModule::render)
				.unwrap_or_default(),
			Some(false) => self.not_found.as_ref().map(|f| f()).unwrap_or_default(),
			None => Page::Empty,
		}
	}

	/// Commits history changes from browser traversal (popstate).
	#[cfg(target_arch = "wasm32")]
	pub fn listen_history(self: &Rc<Self>) -> crate::history::ListenerId {
		let weak = Rc::downgrade(self);
		self.history.listen(Rc::new(move |_location: &str| {
			let Some(router) = weak.upgrade() else {
				return;
			};
			wasm_bindgen_futures::spawn_local(async move {
				if let Err(err) = router.sync_from_history().await {
					tracing::warn!("Failed to sync route from history: {}", err);
				}
			});
		}))
	}

	/// Internal navigation implementation.
	async fn navigate(
		&self,
		target: &str,
		nav_type: NavigationType,
	) -> Result<RouteLocation, RouterError> {
		let id = self.navigation_id.get() + 1;
		self.navigation_id.set(id);

		let resolution = self.resolve_target(target)?;

		let module = match &resolution.route_match {
			Some(route_match) => {
				let route = &route_match.route;
				match route.component() {
					Some(component) => {
						let module = component.load().await.map_err(|source| {
							tracing::warn!(
								route = %route.label(),
								error = %source,
								"Component load failed"
							);
							RouterError::ComponentLoad {
								route: route.label(),
								source,
							}
						})?;
						Some(module)
					}
					None => None,
				}
			}
			None if self.not_found.is_some() => None,
			None => {
				tracing::warn!(path = %resolution.path, "No route matched");
				return Err(RouterError::NotFound(resolution.path));
			}
		};

		if self.navigation_id.get() != id {
			tracing::debug!(requested = %target, "Navigation superseded");
			return Err(RouterError::NavigationAborted(target.to_string()));
		}

		let full_path = match &resolution.query {
			Some(query) => format!("{}?{}", resolution.path, query),
			None => resolution.path.clone(),
		};

		match nav_type {
			NavigationType::Push => self.history.push(&full_path)?,
			NavigationType::Replace => self.history.replace(&full_path)?,
			NavigationType::Pop if resolution.redirected_from.is_some() => {
				self.history.replace(&full_path)?
			}
			NavigationType::Pop => {}
		}

		let location = RouteLocation {
			href: self.history.href(&full_path),
			query: parse_query(resolution.query.as_deref()),
			name: resolution
				.route_match
				.as_ref()
				.and_then(|m| m.route.name().map(str::to_string)),
			matched: resolution.route_match.is_some(),
			meta: resolution
				.route_match
				.as_ref()
				.map(|m| m.route.meta().clone())
				.unwrap_or_default(),
			params: resolution
				.route_match
				.map(|m| m.params)
				.unwrap_or_default(),
			path: resolution.path,
			full_path,
			redirected_from: resolution.redirected_from,
		};

		tracing::info!(
			path = %location.full_path,
			name = ?location.name,
			navigation = ?nav_type,
			"Navigated"
		);

		self.commit(location.clone(), module);
		Ok(location)
	}

	/// Resolves `target`, following redirects up to the configured limit.
	fn resolve_target(&self, target: &str) -> Result<Resolution, RouterError> {
		let (mut path, query) = split_target(target);
		let query = query.map(str::to_string);
		let mut redirected_from = None;
		let mut redirects = 0;

		loop {
			let Some(route_match) = self.match_path(&path) else {
				if self.routes.iter().any(|r| r.pattern.is_match(&path)) {
					tracing::warn!(path = %path, "Navigation cancelled by guard");
					return Err(RouterError::NavigationCancelled(path));
				}
				return Ok(Resolution {
					path,
					query,
					route_match: None,
					redirected_from,
				});
			};

			let Some(to) = route_match.route.redirect_target() else {
				return Ok(Resolution {
					path,
					query,
					route_match: Some(route_match),
					redirected_from,
				});
			};

			if redirects == self.max_redirects {
				tracing::warn!(requested = %target, redirects, "Redirect limit reached");
				return Err(RouterError::RedirectLoop(target.to_string()));
			}
			redirects += 1;

			let next = fill_pattern(to, &route_match.params)?;
			tracing::debug!(from = %path, to = %next, "Following redirect");
			if redirected_from.is_none() {
				redirected_from = Some(path);
			}
			path = next;
		}
	}

	fn commit(&self, location: RouteLocation, module: Option<ComponentModule>) {
		*self.current_module.borrow_mut() = module;
		// Write everything before notifying: subscribers of one signal read the others.
		self.current_path.set_untracked(location.path.clone());
		self.current_params.set_untracked(location.params.clone());
		self.current_route_name.set_untracked(location.name.clone());
		self.current.set_untracked(Some(location));

		self.current_path.notify();
		self.current_params.notify();
		self.current_route_name.notify();
		self.current.notify();
	}
}
