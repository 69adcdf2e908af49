//! # Backend Adapter
//!
//! The minimal capability seam between scope nodes and whatever actually
//! writes log lines. A scope never talks to an output sink directly: it asks
//! its configured [`LogBackend`] whether a severity is enabled, and if so
//! hands over already-prefixed arguments. Everything about destinations,
//! formatting, and global level thresholds belongs to the backend.
//!
//! # Architecture Note
//! Why a trait instead of calling `tracing` directly?
//! The tree/registry logic is written *once* against this contract, and the
//! production backend ([`TracingBackend`]), the recording backend used by
//! tests ([`RecordingBackend`](crate::mock::RecordingBackend)), and any
//! caller-supplied sink all plug in without the core changing.

use std::fmt::{self, Write as _};

/// The five severities a scope can emit at, each independently
/// enable-checkable on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    /// Emission at this severity is expected to terminate abnormally; the
    /// termination comes from the backend, never from the core.
    Panic,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Panic => "panic",
        };
        f.write_str(name)
    }
}

/// Contract a leveled logging sink must satisfy to back a scope tree.
///
/// Implementations receive arguments that already include the scope's
/// rendered prefix (as the first value, or folded into the template for the
/// formatted shape). The three emission shapes mirror the plain /
/// newline-terminated / formatted triple of classic leveled loggers.
pub trait LogBackend: Send + Sync {
    /// Whether `severity` is currently enabled. Scopes call this before
    /// doing any rendering work, so it should be cheap.
    fn enabled(&self, severity: Severity) -> bool;

    /// Emit `values` at `severity`.
    fn log(&self, severity: Severity, values: &[&dyn fmt::Display]);

    /// Emit `values` at `severity` in the newline-terminated form.
    fn logln(&self, severity: Severity, values: &[&dyn fmt::Display]);

    /// Emit at `severity` after performing one combined substitution of
    /// `values` into the `{}` placeholders of `template`.
    fn logf(&self, severity: Severity, template: &str, values: &[&dyn fmt::Display]);
}

/// Joins displayable values with single spaces.
pub(crate) fn join_display(values: &[&dyn fmt::Display]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{value}");
    }
    out
}

/// Substitutes `values`, in order, into the `{}` placeholders of `template`.
///
/// Placeholders without a matching value are left verbatim; surplus values
/// are ignored. This is the runtime counterpart of `format!` for templates
/// that are not known at compile time (user-configured error formats, the
/// formatted emission shape).
pub(crate) fn interpolate(template: &str, values: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut values = values.iter();
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        match values.next() {
            Some(value) => {
                let _ = write!(out, "{value}");
            }
            None => out.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

/// Production backend that forwards to the `tracing` ecosystem.
///
/// Severity mapping: `Debug`/`Info`/`Warn`/`Error` map to the tracing levels
/// of the same name. `Panic` has no tracing counterpart; it is emitted as an
/// error-level event and then the backend panics with the same message,
/// preserving the "log, then terminate" contract of panic-level loggers.
/// The plain and line shapes are identical here since tracing events are
/// line-oriented already.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl TracingBackend {
    pub fn new() -> Self {
        Self
    }

    fn dispatch(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{}", message),
            Severity::Info => tracing::info!("{}", message),
            Severity::Warn => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
            Severity::Panic => {
                tracing::error!("{}", message);
                panic!("{}", message);
            }
        }
    }
}

impl LogBackend for TracingBackend {
    fn enabled(&self, severity: Severity) -> bool {
        use tracing::Level;
        match severity {
            Severity::Debug => tracing::enabled!(Level::DEBUG),
            Severity::Info => tracing::enabled!(Level::INFO),
            Severity::Warn => tracing::enabled!(Level::WARN),
            Severity::Error | Severity::Panic => tracing::enabled!(Level::ERROR),
        }
    }

    fn log(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        self.dispatch(severity, &join_display(values));
    }

    fn logln(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        self.dispatch(severity, &join_display(values));
    }

    fn logf(&self, severity: Severity, template: &str, values: &[&dyn fmt::Display]) {
        self.dispatch(severity, &interpolate(template, values));
    }
}
