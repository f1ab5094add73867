//! Axum router assembly.

use axum::Router;
use axum::routing::post;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use buttonhub_app::ports::SwitchService;

use crate::fatal::PanicResponder;
use crate::press::{not_found, press};
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Binds one `POST` route per registry entry; any other method on a bound
/// path, and any unbound path, falls through to `404 Button not found.`.
/// Panics are caught and escalated through the state's fatal signal, and a
/// [`TraceLayer`] logs each request/response at `DEBUG`.
pub fn build<S: SwitchService>(state: AppState<S>) -> Router {
    let mut router = Router::new();
    for (path, accessory) in state.registry.routes() {
        tracing::debug!(button = %accessory.name(), uri = %path, "route registered");
        router = router.route(path, post(press::<S>).fallback(not_found));
    }

    router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(PanicResponder::new(
            state.fatal.clone(),
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
