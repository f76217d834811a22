//! Fallback tracing initialization.
//!
//! This crate is a library: host applications normally install their own
//! subscriber, and every diagnostic here goes through `tracing` macros
//! (cache hits at debug, refreshes at info, degraded fetches at warn).
//! This bootstrap exists for test runs and ad hoc embedding where nobody
//! else set one up.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the fallback subscriber. Safe to call repeatedly, and a no-op
/// when the host already installed one — its choice wins.
pub fn init() {
    INIT.call_once(|| {
        // Quiet by default, but keep this crate's refresh/degradation
        // diagnostics visible; RUST_LOG overrides the whole filter.
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,interior_rules=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
    });
}
