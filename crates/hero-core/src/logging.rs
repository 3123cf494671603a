#![forbid(unsafe_code)]

//! Structured logging.
//!
//! Library code logs through the `tracing` macros re-exported here. Binaries
//! and test harnesses that want output install a subscriber with
//! [`try_init`] (requires the `tracing-subscriber` feature); the filter is
//! read from `HERO_LOG`, then `RUST_LOG`, then defaults to `info`. With the
//! `tracing-json` feature the subscriber emits one JSON object per event.

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable consulted before `RUST_LOG`.
pub const ENV_LOG: &str = "HERO_LOG";

/// Resolve the filter directive from a custom variable lookup.
#[must_use]
pub fn filter_directive_with<F>(get: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get(ENV_LOG)
        .or_else(|| get("RUST_LOG"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Install the global subscriber. Returns an error if one is already set.
#[cfg(feature = "tracing-subscriber")]
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let directive = filter_directive_with(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(feature = "tracing-json")]
    let fmt_layer = tracing_subscriber::fmt::layer().json();
    #[cfg(not(feature = "tracing-json"))]
    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
