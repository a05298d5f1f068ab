//! Logging utilities for planx
//!
//! Library code only emits `tracing` events. Binaries, benches and tests
//! install a subscriber through these helpers; without the `logging` feature
//! they compile to no-ops.

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::PlannerConfig;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "planx_core=info";

/// Filter that surfaces per-rule plan dumps.
pub const TRACE_RULES_FILTER: &str = "planx_core=debug";

/// Filter matching a planner configuration.
pub fn filter_for(config: &PlannerConfig) -> &'static str {
    if config.trace_rules {
        TRACE_RULES_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize logging with [`DEFAULT_FILTER`]
///
/// # Environment Variables
/// - `RUST_LOG` - overrides the filter
///
/// Returns `false` if a global subscriber was already installed.
///
/// # Example
/// ```rust
/// planx_core::logging::init();
/// ```
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

/// Initialize logging for a planner configuration
pub fn init_for(config: &PlannerConfig) -> bool {
    init_with_filter(filter_for(config))
}

/// Initialize logging with a specific filter directive
#[cfg(feature = "logging")]
pub fn init_with_filter(directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .is_ok()
}

/// Initialize logging for tests
///
/// Everything planx emits, captured by the test harness.
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("planx_core=trace"))
        .with_test_writer()
        .try_init();
}

// Stub implementations when logging feature is disabled
#[cfg(not(feature = "logging"))]
pub fn init_with_filter(_directive: &str) -> bool {
    false
}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
