// vivify-core - Reference registry for opaque values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The reference registry: pre-declared identities for opaque values.
//!
//! Values the serializer cannot decompose (functions, host symbols, or
//! anything the caller wants carried by name) are registered under a
//! caller-chosen string key. The parser emits such values as opaque
//! lookups, and the evaluated expression resolves them through a global
//! table the host exposes under [`GLOBAL_REFS`].
//!
//! Bindings are write-once per key and live for the life of the thread.
//! A process-wide default instance backs the free functions
//! [`register`], [`lookup_by_key`], and [`lookup_by_value`]; hosts
//! without ambient globals can thread an explicit
//! [`ReferenceRegistry`] handle instead.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;
use vivify_value::{JsValue, RefIdentity};

use crate::error::{Error, Result};

/// Global name the emitted code uses to reach the host-side table.
///
/// The host must install an object under this name whose `get` method
/// maps a registered key to its value before evaluating emitted code.
pub const GLOBAL_REFS: &str = "$R";

#[derive(Default)]
struct RegistryInner {
    by_key: HashMap<String, JsValue>,
    by_value: HashMap<RefIdentity, String>,
}

/// Bidirectional table between string keys and reference-typed values.
#[derive(Clone, Default)]
pub struct ReferenceRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ReferenceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`.
    ///
    /// Fails when the key is already bound, when the value is already
    /// registered under another key, or when the value is a primitive
    /// (primitives have no identity to register).
    pub fn register(&self, key: impl Into<String>, value: JsValue) -> Result<()> {
        let key = key.into();
        let identity = value
            .ref_identity()
            .ok_or_else(|| Error::unsupported_because(value.type_name(), "primitives cannot be registered"))?;

        let mut inner = self.inner.borrow_mut();
        if inner.by_key.contains_key(&key) {
            return Err(Error::DuplicateReference(key));
        }
        if inner.by_value.contains_key(&identity) {
            return Err(Error::DuplicateReference(key));
        }
        debug!(key = %key, "registering reference");
        inner.by_value.insert(identity, key.clone());
        inner.by_key.insert(key, value);
        Ok(())
    }

    /// The key under which `value` was registered, if any.
    #[must_use]
    pub fn lookup_by_value(&self, value: &JsValue) -> Option<String> {
        let identity = value.ref_identity()?;
        self.inner.borrow().by_value.get(&identity).cloned()
    }

    /// The value registered under `key`, if any.
    #[must_use]
    pub fn lookup_by_key(&self, key: &str) -> Option<JsValue> {
        self.inner.borrow().by_key.get(key).cloned()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().by_key.len()
    }

    /// True when no bindings exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().by_key.is_empty()
    }
}

thread_local! {
    static DEFAULT_REGISTRY: ReferenceRegistry = ReferenceRegistry::new();
}

/// Bind `key` to `value` in the default registry.
pub fn register(key: impl Into<String>, value: JsValue) -> Result<()> {
    DEFAULT_REGISTRY.with(|r| r.register(key, value))
}

/// Look up a key in the default registry.
#[must_use]
pub fn lookup_by_key(key: &str) -> Option<JsValue> {
    DEFAULT_REGISTRY.with(|r| r.lookup_by_key(key))
}

/// Look up a value's key in the default registry.
#[must_use]
pub fn lookup_by_value(value: &JsValue) -> Option<String> {
    DEFAULT_REGISTRY.with(|r| r.lookup_by_value(value))
}

/// Run `f` against the default registry.
pub(crate) fn with_default<R>(f: impl FnOnce(&ReferenceRegistry) -> R) -> R {
    DEFAULT_REGISTRY.with(|r| f(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivify_value::JsFunction;

    #[test]
    fn register_and_lookup() {
        let registry = ReferenceRegistry::new();
        let func = JsValue::Function(JsFunction::new("callback"));
        registry.register("app/cb", func.clone()).unwrap();

        assert_eq!(registry.lookup_by_value(&func).as_deref(), Some("app/cb"));
        assert!(registry.lookup_by_key("app/cb").is_some());
        assert!(registry.lookup_by_key("missing").is_none());
    }

    #[test]
    fn duplicate_key_rejected() {
        let registry = ReferenceRegistry::new();
        registry
            .register("k", JsValue::Function(JsFunction::new("a")))
            .unwrap();
        let err = registry
            .register("k", JsValue::Function(JsFunction::new("b")))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateReference(_)));
    }

    #[test]
    fn duplicate_value_rejected() {
        let registry = ReferenceRegistry::new();
        let func = JsValue::Function(JsFunction::new("a"));
        registry.register("first", func.clone()).unwrap();
        let err = registry.register("second", func).unwrap_err();
        assert!(matches!(err, Error::DuplicateReference(_)));
    }

    #[test]
    fn primitives_rejected() {
        let registry = ReferenceRegistry::new();
        let err = registry.register("n", JsValue::Number(1.0)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
    }
}
