//! Press request body: JSON or form-encoded, carrying an `event` field.

use std::convert::Infallible;
use std::str::FromStr;

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::Value;

use buttonhub_domain::press::ButtonEvent;

use crate::error::InvalidEvent;

#[derive(Deserialize)]
struct JsonBody {
    event: Option<Value>,
}

#[derive(Deserialize)]
struct FormBody {
    event: Option<String>,
}

/// The unvalidated `event` field of a press request.
///
/// Extraction never rejects: an unreadable body is treated as a body
/// without `event`, so it fails validation with a 422 like any other.
#[derive(Debug, Default)]
pub(crate) struct EventPayload {
    event: Option<Value>,
}

impl EventPayload {
    /// Check the event against the recognised literals.
    pub(crate) fn validate(self) -> Result<ButtonEvent, InvalidEvent> {
        let parsed = self
            .event
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|raw| ButtonEvent::from_str(raw).ok());

        match parsed {
            Some(event) => Ok(event),
            None => Err(InvalidEvent { value: self.event }),
        }
    }
}

impl<S> FromRequest<S> for EventPayload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));

        let event = if is_json {
            Json::<JsonBody>::from_request(req, state)
                .await
                .ok()
                .and_then(|Json(body)| body.event)
        } else {
            Form::<FormBody>::from_request(req, state)
                .await
                .ok()
                .and_then(|Form(body)| body.event.map(Value::String))
        };

        Ok(Self { event })
    }
}
