//! # Scope Configuration & Overrides
//!
//! A scope's behavior is a value bundle of three things: which backend it
//! emits through, the template used when synthesizing prefixed errors, and
//! the function that renders its segment path into a display prefix.
//!
//! # Design Note: Inherit, Then Diverge
//! Configuration is deliberately a plain value type. A child scope receives a
//! field-by-field *copy* of its parent's configuration at creation time and
//! then applies its own overrides; nothing is shared by reference between
//! nodes. A parent reconfiguring itself after a child exists therefore never
//! retroactively changes the child. Overrides are modeled as a small variant
//! type ([`ScopeOption`]) applied in sequence to a mutable configuration
//! before the node is frozen, which keeps creation-call signatures variadic
//! in spirit without builder boilerplate.

use std::fmt;
use std::sync::Arc;

use crate::backend::{LogBackend, TracingBackend};

/// Name given to a root scope created with an empty name.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Default error-format template. Must contain exactly one `{}` placeholder,
/// which receives the scope's rendered prefix.
pub const DEFAULT_ERR_FORMAT: &str = "-> {}:";

/// A prefix renderer: maps the ordered segment path to a display string.
///
/// Renderers must be pure and deterministic. The rendered string is both the
/// memoized display prefix and the registry's deduplication key, so a
/// renderer that folds in volatile data (timestamps, counters) breaks both
/// contracts. Nothing prevents it; everything discourages it.
pub type PrefixRenderer = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// The default renderer: segments dot-joined and wrapped in brackets.
///
/// `["app", "worker"]` renders as `[app.worker]`.
pub fn default_renderer(segments: &[String]) -> String {
    format!("[{}]", segments.join("."))
}

/// The configuration snapshot owned by a single scope node.
///
/// Cloning is cheap (two handle bumps and a string) and is exactly the
/// copy-on-create semantics child scopes rely on: the clone shares the
/// *backend instance* with the parent but is otherwise an independent value.
#[derive(Clone)]
pub struct ScopeConfig {
    pub(crate) backend: Arc<dyn LogBackend>,
    pub(crate) err_format: String,
    pub(crate) renderer: PrefixRenderer,
}

impl ScopeConfig {
    /// The backend handle this scope emits through.
    pub fn backend(&self) -> &Arc<dyn LogBackend> {
        &self.backend
    }

    /// The error-format template used by the error-synthesis helpers.
    pub fn err_format(&self) -> &str {
        &self.err_format
    }

    /// The prefix renderer.
    pub fn renderer(&self) -> &PrefixRenderer {
        &self.renderer
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            backend: Arc::new(TracingBackend::new()),
            err_format: DEFAULT_ERR_FORMAT.to_string(),
            renderer: Arc::new(default_renderer),
        }
    }
}

impl fmt::Debug for ScopeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeConfig")
            .field("backend", &"<dyn LogBackend>")
            .field("err_format", &self.err_format)
            .field("renderer", &"<fn>")
            .finish()
    }
}

/// Field-for-field equality: the backend and renderer compare by handle
/// identity (they are opaque behind their traits), the template by value.
impl PartialEq for ScopeConfig {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
            && self.err_format == other.err_format
            && Arc::ptr_eq(&self.renderer, &other.renderer)
    }
}

/// A single configuration override, applied on top of either the process
/// defaults (root creation) or the parent's copied configuration (child
/// creation). Later options win over earlier ones.
#[derive(Clone)]
pub enum ScopeOption {
    /// Replace the backend handle.
    Backend(Arc<dyn LogBackend>),
    /// Replace the error-format template (one `{}` placeholder). The
    /// placeholder count is not validated here; a malformed template shows
    /// up as a malformed string at error-construction time.
    ErrFormat(String),
    /// Replace the prefix renderer.
    Renderer(PrefixRenderer),
}

impl ScopeOption {
    pub(crate) fn apply(&self, config: &mut ScopeConfig) {
        match self {
            ScopeOption::Backend(backend) => config.backend = backend.clone(),
            ScopeOption::ErrFormat(template) => config.err_format = template.clone(),
            ScopeOption::Renderer(renderer) => config.renderer = renderer.clone(),
        }
    }
}

impl fmt::Debug for ScopeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeOption::Backend(_) => f.write_str("ScopeOption::Backend(..)"),
            ScopeOption::ErrFormat(template) => {
                write!(f, "ScopeOption::ErrFormat({template:?})")
            }
            ScopeOption::Renderer(_) => f.write_str("ScopeOption::Renderer(..)"),
        }
    }
}

/// Override the backend for the scope being created.
pub fn with_backend(backend: Arc<dyn LogBackend>) -> ScopeOption {
    ScopeOption::Backend(backend)
}

/// Override the error-format template for the scope being created.
pub fn with_err_format(template: impl Into<String>) -> ScopeOption {
    ScopeOption::ErrFormat(template.into())
}

/// Override the prefix renderer for the scope being created.
pub fn with_renderer(renderer: impl Fn(&[String]) -> String + Send + Sync + 'static) -> ScopeOption {
    ScopeOption::Renderer(Arc::new(renderer))
}
