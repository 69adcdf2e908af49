#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # logscope
//!
//! > **Hierarchical, prefix-annotated logging scopes.**
//!
//! This crate lets you create named "scoped" loggers arranged in a tree
//! (`app` → `app.worker` → `app.worker.retry`). Every line emitted through a
//! scope is tagged with the rendered dotted path of that scope, and scopes
//! are memoized: asking for the same path twice, from any call site,
//! returns the identical instance with identical configuration.
//!
//! ## Core Concepts
//!
//! - **Scope** ([`Scope`]): a named point in the hierarchy. Exposes the
//!   leveled emission shapes (plain, line, formatted, JSON-payload) across
//!   five severities, plus helpers that synthesize error values carrying the
//!   scope's prefix.
//! - **Registry** ([`Registry`]): the deduplicating store. Root and child
//!   creation are atomic lookup-or-create operations under one lock, so at
//!   most one node ever exists per rendered path. A process-wide registry
//!   backs the [`root`] / [`default_root`] conveniences; tests build their
//!   own with [`Registry::new`].
//! - **Configuration** ([`ScopeConfig`]): a value bundle of backend handle,
//!   error-format template, and prefix renderer. Children copy the parent's
//!   configuration at creation and may override pieces of it; nothing is
//!   shared by reference, so later parent changes never leak into children.
//! - **Backend** ([`LogBackend`]): the seam to the actual sink. The default
//!   is [`TracingBackend`] (the `tracing` ecosystem); tests use the shipped
//!   [`RecordingBackend`].
//!
//! ## Quick Start
//!
//! ```rust
//! use logscope::Registry;
//! use std::fmt::Display;
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! let app = registry.root("app", &[]);
//! let worker = app.sub("worker", &[]);
//! assert_eq!(worker.prefix(), "[app.worker]");
//!
//! // Same path, same instance, from anywhere in the process.
//! let again = app.sub("worker", &[]);
//! assert!(Arc::ptr_eq(&worker, &again));
//!
//! // Leveled emission, prefix attached automatically.
//! let port = 8080;
//! let values: [&dyn Display; 2] = [&"listening on", &port];
//! worker.info(&values);
//! worker.infof("bound to port {}", &[&port]);
//!
//! // Errors that carry their origin.
//! let err = worker.err_with_msgs(&["connect refused"]);
//! assert_eq!(err.to_string(), "-> [app.worker]: connect refused");
//! ```
//!
//! ## Configuration Inheritance
//!
//! Overrides are passed at creation time and apply on top of the inherited
//! snapshot:
//!
//! ```rust
//! use logscope::{with_err_format, Registry};
//!
//! let registry = Registry::new();
//! let app = registry.root("app", &[]);
//! let strict = app.sub("strict", &[with_err_format("ERROR {} ::")]);
//!
//! assert_eq!(
//!     strict.err_with_msgs(&["no"]).to_string(),
//!     "ERROR [app.strict] :: no"
//! );
//! // The parent is untouched.
//! assert_eq!(app.err_with_msgs(&["no"]).to_string(), "-> [app]: no");
//! ```
//!
//! Creation calls for an existing path return the existing node and ignore
//! the overrides: idempotence wins over reconfiguration.
//!
//! ## Concurrency Model
//!
//! A passive library: no tasks, no channels, no internal scheduling. The
//! only shared mutable state is the registry map behind a single
//! reader/writer lock held across each whole lookup-or-create sequence.
//! Logging calls never touch the registry; a scope's rendered prefix is
//! computed once and then read lock-free.
//!
//! ## Module Tour
//!
//! - [`scope`]: the tree node and all emission / error-synthesis methods.
//! - [`registry`]: deduplication, the process-wide registry.
//! - [`options`]: [`ScopeConfig`], [`ScopeOption`] overrides, renderers.
//! - [`backend`]: the [`LogBackend`] seam and [`TracingBackend`].
//! - [`error`]: [`ScopeError`], the synthesized error type.
//! - [`mock`]: [`RecordingBackend`] for tests.
//! - [`setup_tracing`]: subscriber bootstrap for applications.

pub mod backend;
pub mod error;
pub mod mock;
pub mod options;
pub mod registry;
pub mod scope;
pub mod tracing;

// Re-export the working surface for convenience
pub use backend::{LogBackend, Severity, TracingBackend};
pub use error::ScopeError;
pub use mock::{CallShape, RecordedCall, RecordingBackend};
pub use options::{
    default_renderer, with_backend, with_err_format, with_renderer, PrefixRenderer, ScopeConfig,
    ScopeOption, DEFAULT_ERR_FORMAT, DEFAULT_ROOT_NAME,
};
pub use registry::{default_root, global, root, Registry};
pub use scope::Scope;
pub use self::tracing::setup_tracing;
