//! # Scope Registry
//!
//! Process-wide mapping from rendered prefix to scope node. The registry is
//! the single source of truth for "does a scope with this exact rendered
//! path already exist": root and child creation are lookup-or-create
//! sequences performed entirely under one write lock, so two threads racing
//! to create the same scope can never both succeed.
//!
//! # Design Note: Injected, Not Ambient
//! The registry is an explicit object rather than a hidden global. Library
//! code that wants process-wide sharing goes through [`global`] (or the
//! [`root`] / [`default_root`] conveniences built on it); tests build a fresh
//! registry per case with [`Registry::new`] and stay fully isolated. The map
//! grows monotonically for the registry's lifetime; scopes are named after
//! subsystems, not requests, so there is no eviction.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};

use crate::options::{default_renderer, ScopeConfig, ScopeOption, DEFAULT_ROOT_NAME};
use crate::scope::Scope;

/// Deduplicating store of every scope created through it, keyed by rendered
/// path.
pub struct Registry {
    by_prefix: RwLock<HashMap<String, Arc<Scope>>>,
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// Returned as `Arc` because every scope keeps a handle to its registry
    /// so that `sub` can deduplicate later.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            by_prefix: RwLock::new(HashMap::new()),
        })
    }

    /// Looks up or creates the root scope named `name`.
    ///
    /// An empty name maps to [`DEFAULT_ROOT_NAME`]. The lookup key is the
    /// *default* renderer applied to `[name]`: at lookup time the node's
    /// own renderer is not known yet, and the key must be stable across
    /// calls regardless of per-call overrides. If the scope already exists
    /// it is returned and `opts` are silently ignored; creation is therefore
    /// idempotent per name. New roots render and cache their prefix eagerly
    /// with their own (possibly overridden) renderer.
    pub fn root(self: &Arc<Self>, name: &str, opts: &[ScopeOption]) -> Arc<Scope> {
        let mut map = self
            .by_prefix
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let name = if name.is_empty() { DEFAULT_ROOT_NAME } else { name };
        let segments = vec![name.to_string()];
        let key = default_renderer(&segments);
        if let Some(existing) = map.get(&key) {
            return existing.clone();
        }

        let mut config = ScopeConfig::default();
        for opt in opts {
            opt.apply(&mut config);
        }
        let scope = Scope::new_node(segments, Weak::new(), config, self.clone());
        let _ = scope.prefix();
        map.insert(key, scope.clone());
        scope
    }

    /// Lookup-or-create for a child of `parent` named `name`. Called through
    /// [`Scope::sub`].
    pub(crate) fn sub(
        self: &Arc<Self>,
        parent: &Arc<Scope>,
        name: &str,
        opts: &[ScopeOption],
    ) -> Arc<Scope> {
        let mut map = self
            .by_prefix
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut segments = parent.segments().to_vec();
        segments.push(name.to_string());

        // Keyed with the parent's renderer: the child's overrides have not
        // been applied yet at lookup time.
        let render = parent.renderer_snapshot();
        let key = render(&segments);
        if let Some(existing) = map.get(&key) {
            return existing.clone();
        }

        let mut config = parent.config();
        for opt in opts {
            opt.apply(&mut config);
        }
        let scope = Scope::new_node(segments, Arc::downgrade(parent), config, self.clone());
        parent.adopt(scope.clone());
        map.insert(key, scope.clone());
        scope
    }

    /// The scope registered under `rendered`, if any.
    ///
    /// `rendered` is the *registration* key: for a scope created with a
    /// renderer override, that is the path as rendered by its parent's (or
    /// the default) renderer, which can differ from the scope's own
    /// [`prefix`](Scope::prefix).
    pub fn get(&self, rendered: &str) -> Option<Arc<Scope>> {
        self.by_prefix
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(rendered)
            .cloned()
    }

    /// Number of registered scopes.
    pub fn len(&self) -> usize {
        self.by_prefix
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide registry behind [`root`] and [`default_root`].
pub fn global() -> Arc<Registry> {
    static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new).clone()
}

/// Looks up or creates a root scope in the process-wide registry.
pub fn root(name: &str, opts: &[ScopeOption]) -> Arc<Scope> {
    global().root(name, opts)
}

/// The process-wide default root scope (named [`DEFAULT_ROOT_NAME`]).
pub fn default_root() -> Arc<Scope> {
    root("", &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingBackend;
    use crate::options::{with_backend, with_err_format, with_renderer};

    #[test]
    fn root_creation_is_idempotent_per_name() {
        let registry = Registry::new();
        let first = registry.root("app", &[]);
        let second = registry.root("app", &[]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn second_root_call_ignores_overrides() {
        let registry = Registry::new();
        let first = registry.root("app", &[with_err_format("first {}")]);
        let second = registry.root("app", &[with_err_format("second {}")]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.config().err_format(), "first {}");
    }

    #[test]
    fn empty_name_maps_to_default_root() {
        let registry = Registry::new();
        let anon = registry.root("", &[]);
        let named = registry.root(DEFAULT_ROOT_NAME, &[]);
        assert!(Arc::ptr_eq(&anon, &named));
        assert_eq!(anon.prefix(), "[root]");
    }

    #[test]
    fn roots_render_eagerly_and_register_under_default_rendering() {
        let registry = Registry::new();
        let scope = registry.root("app", &[]);
        assert_eq!(scope.prefix(), "[app]");
        let found = registry.get("[app]").expect("registered under [app]");
        assert!(Arc::ptr_eq(&scope, &found));
    }

    #[test]
    fn sub_creation_is_idempotent_per_name() {
        let registry = Registry::new();
        let root = registry.root("app", &[]);
        let first = root.sub("worker", &[]);
        let second = root.sub("worker", &[with_err_format("ignored {}")]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            second.config().err_format(),
            crate::options::DEFAULT_ERR_FORMAT
        );
    }

    #[test]
    fn sub_links_parent_and_children() {
        let registry = Registry::new();
        let root = registry.root("app", &[]);
        let child = root.sub("worker", &[]);
        let grandchild = child.sub("retry", &[]);

        assert_eq!(grandchild.prefix(), "[app.worker.retry]");
        assert_eq!(grandchild.segments(), &["app", "worker", "retry"]);
        assert!(Arc::ptr_eq(&grandchild.parent().unwrap(), &child));
        assert!(root.children().iter().any(|c| Arc::ptr_eq(c, &child)));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn sub_registers_under_parents_rendering() {
        let registry = Registry::new();
        let root = registry.root("app", &[]);
        let child = root.sub("worker", &[]);
        let found = registry.get("[app.worker]").expect("registered");
        assert!(Arc::ptr_eq(&child, &found));
    }

    #[test]
    fn child_config_copies_parent_then_overrides() {
        let registry = Registry::new();
        let backend = RecordingBackend::new();
        let root = registry.root(
            "app",
            &[with_backend(backend.clone()), with_err_format("p {}")],
        );

        let plain_child = root.sub("same", &[]);
        assert_eq!(plain_child.config(), root.config());

        let overridden = root.sub("diff", &[with_err_format("c {}")]);
        assert_eq!(overridden.config().err_format(), "c {}");
        // Backend handle still inherited.
        assert!(Arc::ptr_eq(
            overridden.config().backend(),
            root.config().backend()
        ));
    }

    #[test]
    fn later_parent_mutation_does_not_reach_child() {
        let registry = Registry::new();
        let root = registry.root("app", &[]);
        let child = root.sub("worker", &[]);

        root.configure(&[with_err_format("changed {}")]);
        assert_eq!(
            child.config().err_format(),
            crate::options::DEFAULT_ERR_FORMAT
        );
    }

    #[test]
    fn renderer_override_key_divergence_is_preserved() {
        let registry = Registry::new();
        let root = registry.root("app", &[]);
        // The child overrides its renderer, but its registry key was
        // computed with the parent's (default) renderer.
        let child = root.sub(
            "worker",
            &[with_renderer(|segments: &[String]| segments.join("/"))],
        );

        assert_eq!(child.prefix(), "app/worker");
        let by_parent_key = registry.get("[app.worker]").expect("keyed by parent render");
        assert!(Arc::ptr_eq(&child, &by_parent_key));
        assert!(registry.get("app/worker").is_none());

        // And lookups keep deduplicating on the parent-rendered key.
        let again = root.sub("worker", &[]);
        assert!(Arc::ptr_eq(&child, &again));
    }

    #[test]
    fn custom_parent_renderer_keys_children() {
        let registry = Registry::new();
        let root = registry.root(
            "app",
            &[with_renderer(|segments: &[String]| segments.join(":"))],
        );
        // Root was registered under the default rendering, but renders its
        // own prefix with the override.
        assert_eq!(root.prefix(), "app");
        assert!(registry.get("[app]").is_some());

        let child = root.sub("worker", &[]);
        assert_eq!(child.prefix(), "app:worker");
        let found = registry.get("app:worker").expect("keyed by parent renderer");
        assert!(Arc::ptr_eq(&child, &found));
    }

    #[test]
    fn global_registry_is_shared_across_call_sites() {
        // Unique names: the global registry is process-wide state shared
        // with every other test in this binary.
        let a = root("registry-test-global-a", &[]);
        let b = root("registry-test-global-a", &[]);
        assert!(Arc::ptr_eq(&a, &b));

        let anon = default_root();
        assert_eq!(anon.segments(), &[DEFAULT_ROOT_NAME]);
    }
}
