//! Tracing subscriber bootstrap for binaries using the default
//! [`TracingBackend`](crate::TracingBackend).
//!
//! The facade itself never configures outputs or level thresholds (that is
//! the backend's territory), but applications need *some* subscriber
//! installed before tracing events go anywhere. This is the conventional
//! env-filtered setup.

/// Initializes a global `tracing` subscriber with environment-based
/// filtering.
///
/// Log verbosity is controlled through `RUST_LOG`:
/// - `RUST_LOG=info`: info and above
/// - `RUST_LOG=debug`: debug and above
/// - `RUST_LOG=myapp=debug`: per-crate filtering
///
/// Call once at startup; panics if a global subscriber is already set.
///
/// # Example
///
/// ```ignore
/// logscope::setup_tracing();
/// let log = logscope::root("app", &[]);
/// log.info(&[&"started"]);
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
