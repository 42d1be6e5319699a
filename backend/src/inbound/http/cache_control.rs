//! Shared cache-control policies for HTTP handlers.

/// Webhook replies may be reused for one second.
pub const WEBHOOK_CACHE_CONTROL: &str = "max-age=1";

/// Health probes must never be cached.
pub const NO_STORE: &str = "no-store";

/// Build the cache-control header tuple for webhook replies.
pub const fn webhook_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", WEBHOOK_CACHE_CONTROL)
}
