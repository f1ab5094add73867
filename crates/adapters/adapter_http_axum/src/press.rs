//! Press handler: validates the event, answers immediately and fires the
//! accessory's trigger in the background.

use std::sync::Arc;

use axum::extract::{MatchedPath, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use buttonhub_app::accessory::ButtonAccessory;
use buttonhub_app::ports::SwitchService;
use buttonhub_domain::press::PressKind;

use crate::error::{DispatchError, NOT_FOUND_BODY, server_error};
use crate::fatal::{FatalSignal, panic_message};
use crate::payload::EventPayload;
use crate::state::AppState;

/// `POST /button-<slug>`
pub(crate) async fn press<S: SwitchService>(
    State(state): State<AppState<S>>,
    path: MatchedPath,
    payload: EventPayload,
) -> Response {
    let event = match payload.validate() {
        Ok(event) => event,
        Err(invalid) => {
            tracing::debug!(
                uri = %path.as_str(),
                value = ?invalid.value,
                "rejecting invalid event"
            );
            return invalid.into_response();
        }
    };

    let Some(accessory) = state.registry.resolve(path.as_str()).map(Arc::clone) else {
        state
            .fatal
            .raise(DispatchError::Unresolved(path.as_str().to_string()));
        return server_error();
    };

    let kind = PressKind::from(event);
    tracing::info!(button = %accessory.name(), %event, %kind, "button pressed");
    dispatch(accessory, kind, state.fatal.clone());

    (StatusCode::OK, "Success.").into_response()
}

/// Fire the trigger detached from the request; failures are escalated.
fn dispatch<S: SwitchService>(
    accessory: Arc<ButtonAccessory<S>>,
    kind: PressKind,
    fatal: FatalSignal,
) {
    let button = accessory.name().to_string();
    let trigger = tokio::spawn(async move { accessory.trigger(kind).await });

    tokio::spawn(async move {
        let fault = match trigger.await {
            Ok(Ok(())) => return,
            Ok(Err(source)) => DispatchError::Trigger { button, source },
            Err(err) if err.is_panic() => {
                DispatchError::Panic(panic_message(err.into_panic().as_ref()))
            }
            // Cancelled by runtime shutdown.
            Err(_) => return,
        };
        fatal.raise(fault);
    });
}

/// Fallback for every unbound path and every non-POST method.
pub(crate) async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::warn!(%method, %uri, "no button bound to request");
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}
