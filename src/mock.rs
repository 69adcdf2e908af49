//! # Mock Backend
//!
//! A recording [`LogBackend`] for testing scope behavior in isolation.
//!
//! This module is compiled into the library (not `#[cfg(test)]`) so it works
//! from integration tests and from downstream crates testing their own
//! logging wiring. Attach a [`RecordingBackend`] to a scope with
//! [`with_backend`](crate::options::with_backend), drive the scope, then
//! inspect the recorded calls:
//!
//! ```rust
//! use logscope::{with_backend, CallShape, RecordingBackend, Registry, Severity};
//!
//! let backend = RecordingBackend::new();
//! let registry = Registry::new();
//! let scope = registry.root("app", &[with_backend(backend.clone())]);
//!
//! scope.info(&[&"up"]);
//!
//! let call = backend.last().unwrap();
//! assert_eq!(call.severity, Severity::Info);
//! assert_eq!(call.shape, CallShape::Plain);
//! assert_eq!(call.message, "[app] up");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::{interpolate, join_display, LogBackend, Severity};

/// Which emission shape a recorded call came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    Plain,
    Line,
    Formatted,
}

/// One emission observed by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub severity: Severity,
    pub shape: CallShape,
    /// The fully rendered message: values space-joined for the plain and
    /// line shapes, the template interpolated for the formatted shape.
    pub message: String,
}

/// A backend that records every call instead of writing anywhere.
///
/// All severities start enabled; flip individual ones with
/// [`disable`](RecordingBackend::disable) to test short-circuiting. Unlike
/// [`TracingBackend`](crate::backend::TracingBackend), panic-severity calls
/// are recorded like any other and never terminate, so tests can assert on
/// them.
pub struct RecordingBackend {
    enabled: Mutex<HashSet<Severity>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBackend {
    /// A fresh backend with every severity enabled, ready to share between
    /// a scope and the test inspecting it.
    pub fn new() -> Arc<Self> {
        let all = [
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Panic,
        ];
        Arc::new(Self {
            enabled: Mutex::new(all.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Disables `severity`; subsequent checks report it off.
    pub fn disable(&self, severity: Severity) {
        self.enabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&severity);
    }

    /// Re-enables `severity`.
    pub fn enable(&self, severity: Severity) {
        self.enabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(severity);
    }

    /// Every call recorded so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The most recent call, if any.
    pub fn last(&self) -> Option<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Rendered messages only, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|call| call.message.clone())
            .collect()
    }

    fn record(&self, severity: Severity, shape: CallShape, message: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                severity,
                shape,
                message,
            });
    }
}

impl LogBackend for RecordingBackend {
    fn enabled(&self, severity: Severity) -> bool {
        self.enabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&severity)
    }

    fn log(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        self.record(severity, CallShape::Plain, join_display(values));
    }

    fn logln(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        self.record(severity, CallShape::Line, join_display(values));
    }

    fn logf(&self, severity: Severity, template: &str, values: &[&dyn fmt::Display]) {
        self.record(severity, CallShape::Formatted, interpolate(template, values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_shape_severity_and_message() {
        let backend = RecordingBackend::new();
        let values: [&dyn fmt::Display; 2] = [&"a", &1];
        backend.log(Severity::Debug, &values);
        backend.logln(Severity::Error, &values);
        backend.logf(Severity::Warn, "{}={}", &values);

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].shape, CallShape::Plain);
        assert_eq!(calls[0].message, "a 1");
        assert_eq!(calls[1].severity, Severity::Error);
        assert_eq!(calls[1].shape, CallShape::Line);
        assert_eq!(calls[2].message, "a=1");
    }

    #[test]
    fn disable_and_enable_toggle_checks() {
        let backend = RecordingBackend::new();
        assert!(backend.enabled(Severity::Info));
        backend.disable(Severity::Info);
        assert!(!backend.enabled(Severity::Info));
        assert!(backend.enabled(Severity::Debug));
        backend.enable(Severity::Info);
        assert!(backend.enabled(Severity::Info));
    }

    #[test]
    fn panic_severity_is_recorded_not_raised() {
        let backend = RecordingBackend::new();
        let values: [&dyn fmt::Display; 1] = [&"fatal"];
        backend.log(Severity::Panic, &values);
        assert_eq!(backend.last().unwrap().severity, Severity::Panic);
    }
}
