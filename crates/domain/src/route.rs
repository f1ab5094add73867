//! Route namer: derives the HTTP path a button listens on.

/// Prefix shared by every button route.
pub const ROUTE_PREFIX: &str = "/button-";

/// Derive the route path for the button called `name`.
///
/// The name is lowercased and every character outside `[a-z0-9]` becomes a
/// single `-`. The result is recomputed on demand and never stored, so fresh
/// and restored accessories resolve to the same path.
///
/// An empty name yields the bare prefix `/button-` (the unnamed route).
/// Distinct names can share a path (`"A b"` and `"a-b"`); callers that bind
/// routes must detect that themselves.
#[must_use]
pub fn route_path(name: &str) -> String {
    let mut path = String::with_capacity(ROUTE_PREFIX.len() + name.len());
    path.push_str(ROUTE_PREFIX);
    path.extend(name.chars().flat_map(char::to_lowercase).map(|c| {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        }
    }));
    path
}
