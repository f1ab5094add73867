//! # buttonhub-adapter-http-axum
//!
//! HTTP dispatcher built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Bind one `POST` route per registered accessory, at the path derived
//!   from its button name (`/button-<slug>`)
//! - Validate the `event` field of JSON or form-encoded bodies (422 on failure)
//! - Answer `200 Success.` and fire the accessory's trigger in the background
//! - Answer `404 Button not found.` for every other path or method
//! - Turn handler panics and trigger failures into `500 Server error.` and a
//!   fatal signal for the process
//!
//! ## Dependency rule
//! Depends on `buttonhub-app` (for the registry and port traits) and
//! `buttonhub-domain` (for event classification). Never leaks axum types
//! into the domain.

mod error;
mod fatal;
mod payload;
mod press;
pub mod router;
mod state;

#[cfg(test)]
mod test_support;

pub use error::DispatchError;
pub use fatal::{FatalReceiver, FatalSignal, PanicResponder};
pub use state::AppState;
