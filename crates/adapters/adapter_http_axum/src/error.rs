//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use buttonhub_domain::error::AccessoryError;

/// Body of every 404 response.
pub(crate) const NOT_FOUND_BODY: &str = "Button not found.";
/// Body of every 500 response.
pub(crate) const SERVER_ERROR_BODY: &str = "Server error.";

/// An unhandled fault while dispatching a press. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A bound route has no accessory behind it.
    #[error("route {0} resolves to no accessory")]
    Unresolved(String),

    /// The accessory rejected or failed the trigger.
    #[error("trigger failed for button {button:?}")]
    Trigger {
        button: String,
        #[source]
        source: AccessoryError,
    },

    /// A handler or trigger task panicked.
    #[error("panic while dispatching: {0}")]
    Panic(String),
}

/// The response sent for any unhandled fault.
pub(crate) fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY).into_response()
}

/// One entry of a validation failure body.
#[derive(Debug, Serialize)]
struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    msg: &'static str,
    param: &'static str,
    location: &'static str,
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    errors: Vec<FieldError>,
}

/// The request body did not carry a recognised `event`.
#[derive(Debug)]
pub(crate) struct InvalidEvent {
    /// What the caller sent, if anything.
    pub value: Option<serde_json::Value>,
}

impl IntoResponse for InvalidEvent {
    fn into_response(self) -> Response {
        let body = ValidationBody {
            errors: vec![FieldError {
                value: self.value,
                msg: "Invalid value",
                param: "event",
                location: "body",
            }],
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_render_validation_error_with_value_when_present() {
        let response = InvalidEvent {
            value: Some(serde_json::json!("nonsense")),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "errors": [{
                    "value": "nonsense",
                    "msg": "Invalid value",
                    "param": "event",
                    "location": "body",
                }]
            })
        );
    }

    #[tokio::test]
    async fn should_omit_value_when_event_missing() {
        let response = InvalidEvent { value: None }.into_response();

        let body = body_json(response).await;
        assert!(body["errors"][0].get("value").is_none());
        assert_eq!(body["errors"][0]["param"], "event");
    }

    #[tokio::test]
    async fn should_answer_plain_text_server_error() {
        let response = server_error();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], SERVER_ERROR_BODY.as_bytes());
    }
}
