//! # buttonhub-domain
//!
//! Pure domain model for the buttonhub HTTP-to-button bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **button events** (`click`, `double-press`, …) and the
//!   **press kinds** they classify into
//! - Define the **route namer** that turns a button name into its URL path
//! - Define the **accessory descriptors** that are persisted and restored
//! - Define **press events** published to the host when a button fires
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod event;
pub mod press;
pub mod route;
