//! Error types produced by scope nodes.
//!
//! Scopes do not *return* errors from logging calls; the only errors this
//! crate creates are the ones callers explicitly ask a scope to synthesize
//! (see [`Scope::err_with_msgs`](crate::Scope::err_with_msgs) and friends).
//! Those constructors exist so that an error raised deep inside a subsystem
//! carries the subsystem's rendered prefix without the caller re-stating it.

use thiserror::Error;

/// An error value stamped with the prefix of the scope that built it.
///
/// The message already contains the scope's rendered prefix, applied through
/// the scope's configured error-format template, so `to_string()` yields the
/// complete display form (e.g. `-> [app.worker]: connect failed`).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ScopeError {
    message: String,
}

impl ScopeError {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }

    /// The full message, prefix head included.
    pub fn message(&self) -> &str {
        &self.message
    }
}
