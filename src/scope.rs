//! # Scope Node
//!
//! The tree entity of the facade. A [`Scope`] owns its segment path, a
//! memoized rendered prefix, a back-reference to its parent, its children,
//! and its own [`ScopeConfig`] snapshot. All leveled emission and error
//! synthesis happens through methods on this type; scope *creation* goes
//! through the [`Registry`](crate::Registry) so that every rendered path maps
//! to at most one node.
//!
//! # Architecture Note
//! Scopes are handed out as `Arc<Scope>` and never cloned as values: the
//! whole point of the registry is that two call sites asking for
//! `app.worker` receive the *same* node. The prefix cache is a `OnceLock`
//! because the segment path is immutable and renderers are required to be
//! pure, so the first rendering is permanently valid and later reads are
//! lock-free. High-frequency logging therefore touches no shared registry
//! state at all.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock, Weak};

use paste::paste;
use serde::Serialize;

use crate::backend::{interpolate, LogBackend, Severity};
use crate::error::ScopeError;
use crate::options::{PrefixRenderer, ScopeConfig, ScopeOption};
use crate::registry::Registry;

/// Sentinel substituted when an error-wrapping call receives no error.
const NIL_ERR_TEXT: &str = "err=nil";

/// A named point in the logging hierarchy.
///
/// Obtain roots from [`Registry::root`] (or the process-wide
/// [`root`](crate::root) convenience) and children from [`Scope::sub`]; both
/// are idempotent per rendered path.
pub struct Scope {
    /// Path from the tree root to this node, inclusive. Never changes after
    /// construction; the prefix memoization depends on that.
    segments: Vec<String>,
    /// Rendered prefix, populated eagerly for roots and on first request for
    /// children. Write-once.
    prefix: OnceLock<String>,
    parent: Weak<Scope>,
    children: Mutex<Vec<Arc<Scope>>>,
    /// This node's own configuration snapshot. Only this node mutates it
    /// (via [`Scope::configure`]); children copy it at creation time.
    config: RwLock<ScopeConfig>,
    /// The registry this scope was created in. Held strongly: the registry
    /// is process-lifetime state, and `sub` must always be able to dedup.
    registry: Arc<Registry>,
}

impl Scope {
    pub(crate) fn new_node(
        segments: Vec<String>,
        parent: Weak<Scope>,
        config: ScopeConfig,
        registry: Arc<Registry>,
    ) -> Arc<Self> {
        Arc::new(Self {
            segments,
            prefix: OnceLock::new(),
            parent,
            children: Mutex::new(Vec::new()),
            config: RwLock::new(config),
            registry,
        })
    }

    /// Looks up or creates the child scope named `name` under this node.
    ///
    /// The candidate path (this node's segments plus `name`) is rendered with
    /// *this node's* current renderer and deduplicated against the registry
    /// under the registry lock. An existing node is returned as-is and
    /// `opts` are silently ignored; otherwise the child starts from a copy
    /// of this node's configuration with `opts` applied on top.
    ///
    /// Note: if `opts` replace the renderer, the child's registry key (built
    /// with the parent's renderer) and the child's own rendered prefix can
    /// diverge. That timing is part of the inheritance contract; see
    /// [`Registry::get`].
    pub fn sub(self: &Arc<Self>, name: &str, opts: &[ScopeOption]) -> Arc<Scope> {
        self.registry.sub(self, name, opts)
    }

    /// The rendered prefix of this scope, e.g. `[app.worker]`.
    ///
    /// Rendered at most once with the renderer configured at first call,
    /// then cached for the life of the node.
    pub fn prefix(&self) -> &str {
        self.prefix.get_or_init(|| {
            let renderer = self.renderer_snapshot();
            renderer(&self.segments)
        })
    }

    /// The path from the tree root to this scope, inclusive.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The parent scope, if this is not a root and the parent is still
    /// alive. Diagnostics and traversal only.
    pub fn parent(&self) -> Option<Arc<Scope>> {
        self.parent.upgrade()
    }

    /// Snapshot of this scope's children at the time of the call.
    pub fn children(&self) -> Vec<Arc<Scope>> {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A copy of this scope's current configuration.
    pub fn config(&self) -> ScopeConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `opts` to this scope's own configuration.
    ///
    /// Children that already exist keep their copies; the prefix cache, once
    /// populated, is not re-rendered by a renderer change.
    pub fn configure(&self, opts: &[ScopeOption]) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        for opt in opts {
            opt.apply(&mut config);
        }
    }

    pub(crate) fn adopt(&self, child: Arc<Scope>) {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(child);
    }

    pub(crate) fn renderer_snapshot(&self) -> PrefixRenderer {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .renderer
            .clone()
    }

    fn backend(&self) -> Arc<dyn LogBackend> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .backend
            .clone()
    }

    fn err_format(&self) -> String {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .err_format
            .clone()
    }

    // --- Emission plumbing. Every shape checks `enabled` before rendering
    // --- anything, so disabled severities cost one virtual call.

    fn emit(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        let backend = self.backend();
        if !backend.enabled(severity) {
            return;
        }
        let prefix = self.prefix();
        let mut args: Vec<&dyn fmt::Display> = Vec::with_capacity(values.len() + 1);
        args.push(&prefix);
        args.extend_from_slice(values);
        backend.log(severity, &args);
    }

    fn emitln(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        let backend = self.backend();
        if !backend.enabled(severity) {
            return;
        }
        let prefix = self.prefix();
        let mut args: Vec<&dyn fmt::Display> = Vec::with_capacity(values.len() + 1);
        args.push(&prefix);
        args.extend_from_slice(values);
        backend.logln(severity, &args);
    }

    fn emitf(&self, severity: Severity, template: &str, values: &[&dyn fmt::Display]) {
        let backend = self.backend();
        if !backend.enabled(severity) {
            return;
        }
        // Prefix goes onto the template, not the rendered output: the
        // backend performs one combined substitution.
        let template = format!("{} {}", self.prefix(), template);
        backend.logf(severity, &template, values);
    }

    fn emit_json<T>(&self, severity: Severity, label: &str, payload: &T)
    where
        T: Serialize + ?Sized,
    {
        let backend = self.backend();
        if !backend.enabled(severity) {
            return;
        }
        // Serialization failure degrades to an empty payload; a logging
        // call must never surface an error.
        let json = serde_json::to_string(payload).unwrap_or_default();
        let label = format!("{label}:");
        let prefix = self.prefix();
        let args: [&dyn fmt::Display; 3] = [&prefix, &label, &json];
        backend.logln(severity, &args);
    }

    fn emit_wrapped_err(&self, severity: Severity, template: &str, err: Option<&dyn Error>) {
        let backend = self.backend();
        if !backend.enabled(severity) {
            return;
        }
        let text = match err {
            Some(err) => err.to_string(),
            None => NIL_ERR_TEXT.to_string(),
        };
        let template = format!("{} {}", self.prefix(), template);
        backend.logf(severity, &template, &[&text]);
    }

    /// Wraps an error at warn severity: `template` has its `{}` placeholder
    /// filled with the error's display form, `None` with `err=nil`.
    pub fn warn_err(&self, template: &str, err: Option<&dyn Error>) {
        self.emit_wrapped_err(Severity::Warn, template, err);
    }

    /// Wraps an error at error severity. See [`Scope::warn_err`].
    pub fn error_err(&self, template: &str, err: Option<&dyn Error>) {
        self.emit_wrapped_err(Severity::Error, template, err);
    }

    // --- Error synthesis. These build error values carrying this scope's
    // --- prefix; they never touch the backend or the enabled-check.

    fn err_head(&self) -> String {
        let err_format = self.err_format();
        let prefix = self.prefix();
        interpolate(&err_format, &[&prefix])
    }

    /// Builds a [`ScopeError`] from message fragments, space-joined after
    /// the prefix head.
    pub fn err_with_msgs(&self, fragments: &[&str]) -> ScopeError {
        let mut parts = Vec::with_capacity(fragments.len() + 1);
        parts.push(self.err_head());
        parts.extend(fragments.iter().map(|s| s.to_string()));
        ScopeError::new(parts.join(" "))
    }

    /// Builds a [`ScopeError`] from a `{}`-placeholder template and values.
    pub fn err_with_format(&self, template: &str, values: &[&dyn fmt::Display]) -> ScopeError {
        let body = interpolate(template, values);
        ScopeError::new(format!("{} {}", self.err_head(), body))
    }

    /// Builds a [`ScopeError`] from a base message plus existing errors,
    /// each error's display form appended as a further fragment.
    pub fn err_with_errs(&self, message: &str, errs: &[&dyn Error]) -> ScopeError {
        let mut parts = Vec::with_capacity(errs.len() + 2);
        parts.push(self.err_head());
        parts.push(message.to_string());
        parts.extend(errs.iter().map(|e| e.to_string()));
        ScopeError::new(parts.join(" "))
    }
}

/// Generates the four emission shapes for one severity.
macro_rules! leveled_methods {
    ($($name:ident => $sev:ident),* $(,)?) => {
        impl Scope {
            paste! {
                $(
                    #[doc = concat!("Emits `values`, prefix first, at ", stringify!($name), " severity.")]
                    #[doc = ""]
                    #[doc = "No-op (and no rendering cost) when the severity is disabled."]
                    pub fn $name(&self, values: &[&dyn fmt::Display]) {
                        self.emit(Severity::$sev, values);
                    }

                    #[doc = concat!("Like [`Scope::", stringify!($name), "`], through the backend's newline-terminated form.")]
                    pub fn [<$name ln>](&self, values: &[&dyn fmt::Display]) {
                        self.emitln(Severity::$sev, values);
                    }

                    #[doc = concat!("Emits at ", stringify!($name), " severity with `values` substituted into the `{}` placeholders of `template`. The prefix is prepended to the template before substitution.")]
                    pub fn [<$name f>](&self, template: &str, values: &[&dyn fmt::Display]) {
                        self.emitf(Severity::$sev, template, values);
                    }

                    #[doc = concat!("Emits `label: <json payload>` at ", stringify!($name), " severity. Serialization failures degrade to an empty payload, never an error.")]
                    pub fn [<$name _json>]<T>(&self, label: &str, payload: &T)
                    where
                        T: Serialize + ?Sized,
                    {
                        self.emit_json(Severity::$sev, label, payload);
                    }
                )*
            }
        }
    };
}

leveled_methods! {
    debug => Debug,
    info => Info,
    warn => Warn,
    error => Error,
    panic => Panic,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Scope>: {}", self.prefix())
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("segments", &self.segments)
            .field("prefix", &self.prefix.get())
            .finish_non_exhaustive()
    }
}
