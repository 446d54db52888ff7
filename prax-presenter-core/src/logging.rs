//! Logging setup for Prax presenters.
//!
//! Presenters log through `tracing`. Gating decisions (which requested
//! collections were whitelisted, which preload hints were issued) are logged
//! at `debug`, association traversal at `trace`, and condition failures at
//! `warn`. Nothing is printed unless a subscriber is installed, either by the
//! application or through [`init`].
//!
//! # Environment Variables
//!
//! - `PRAX_PRESENTER_DEBUG=true|1|yes` - Enable debug logging
//! - `PRAX_PRESENTER_LOG_LEVEL=debug|info|warn|error|trace` - Set a specific log level
//! - `PRAX_PRESENTER_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use prax_presenter_core::logging;
//!
//! // Call once at startup
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "PRAX_PRESENTER_DEBUG";
const LEVEL_VAR: &str = "PRAX_PRESENTER_LOG_LEVEL";
const FORMAT_VAR: &str = "PRAX_PRESENTER_LOG_FORMAT";

/// Check if debug logging is enabled via `PRAX_PRESENTER_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `PRAX_PRESENTER_LOG_LEVEL`.
///
/// Defaults to "debug" if debug logging is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };

    match env::var(LEVEL_VAR) {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `PRAX_PRESENTER_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var(FORMAT_VAR)
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize presenter logging.
///
/// Subsequent calls are no-ops. Without the `tracing-subscriber` feature this
/// only records that initialization happened; the application is expected to
/// install its own subscriber.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "prax_presenter={level},prax_presenter_core={level},prax_presenter_axum={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "Prax presenter logging initialized"
                );
            }
        }
    });
}
