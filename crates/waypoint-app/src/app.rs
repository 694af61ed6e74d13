//! The router of the page session.
//!
//! One router is created at start-up and installed for the current thread
//! (the browser's event loop). Route-aware components read it through
//! [`with_router`] or [`router`].

use crate::error::AppError;
use crate::routes::create_router;
use std::cell::RefCell;
use std::rc::Rc;
use waypoint_router::{Router, RouterConfig};

thread_local! {
	static ROUTER: RefCell<Option<Rc<Router>>> = const { RefCell::new(None) };
}

/// Installs `router` as the session router.
///
/// # Errors
///
/// Returns [`AppError::AlreadyInstalled`] if a router is already installed.
pub fn install(router: Router) -> Result<Rc<Router>, AppError> {
	install_shared(Rc::new(router))
}

fn install_shared(router: Rc<Router>) -> Result<Rc<Router>, AppError> {
	ROUTER.with(|slot| {
		let mut slot = slot.borrow_mut();
		if slot.is_some() {
			return Err(AppError::AlreadyInstalled);
		}
		*slot = Some(Rc::clone(&router));
		tracing::debug!(routes = router.route_count(), "Router installed");
		Ok(router)
	})
}

/// Removes the session router, returning it.
pub fn uninstall() -> Option<Rc<Router>> {
	ROUTER.with(|slot| slot.borrow_mut().take())
}

/// Returns whether a router is installed.
pub fn is_installed() -> bool {
	ROUTER.with(|slot| slot.borrow().is_some())
}

/// Returns the session router.
pub fn router() -> Result<Rc<Router>, AppError> {
	ROUTER.with(|slot| slot.borrow().clone().ok_or(AppError::NotInstalled))
}

/// Runs `f` with the session router.
pub fn with_router<F, R>(f: F) -> Result<R, AppError>
where
	F: FnOnce(&Router) -> R,
{
	let router = router()?;
	Ok(f(&router))
}

/// Builds the application router from `config` and starts it.
///
/// See [`start_router`].
pub async fn start(config: &RouterConfig) -> Result<Rc<Router>, AppError> {
	start_router(create_router(config)?).await
}

/// Commits the initial location of `router`, then installs it.
///
/// In a browser this also starts following back/forward traversal.
///
/// # Errors
///
/// Returns [`AppError::AlreadyInstalled`] if a router is already installed,
/// or the router error of the initial navigation. Nothing is installed when
/// the initial navigation fails, so `start` can be retried.
pub async fn start_router(router: Router) -> Result<Rc<Router>, AppError> {
	if is_installed() {
		return Err(AppError::AlreadyInstalled);
	}
	let router = Rc::new(router);

	let location = router.sync_from_history().await.map_err(|err| {
		tracing::warn!(error = %err, "Initial navigation failed");
		err
	})?;
	install_shared(Rc::clone(&router))?;

	#[cfg(target_arch = "wasm32")]
	router.listen_history();

	tracing::info!(
		mode = %router.history().mode(),
		href = %location.href,
		"Application started"
	);
	Ok(router)
}
