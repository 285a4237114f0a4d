//! Bearer prefix handling for the raw header value.

/// Case-sensitive transport prefix, including the single trailing space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Returns the token carried by a raw header value.
///
/// Only a leading `"Bearer "` is removed; anything else is returned as-is,
/// so a bare token passes through untouched.
pub fn strip_bearer_prefix(raw: &str) -> &str {
    raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw)
}
