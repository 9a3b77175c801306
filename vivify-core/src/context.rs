// vivify-core - Parser context
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Per-parse state: the identity table, the feature gate, and the
//! marked-reference set.
//!
//! Identities are allocated in encounter order and are unique within one
//! parse. The table keeps a clone of every interned value so that the
//! backing allocations stay alive for the whole parse; an address that
//! was freed and reused mid-parse would otherwise alias two distinct
//! subjects under one id.

use std::collections::{HashMap, HashSet};

use vivify_value::{JsValue, RefIdentity};

use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::ir::NodeId;

/// State owned by one parse.
pub struct ParserContext {
    features: Feature,
    ids: HashMap<RefIdentity, NodeId>,
    encountered: Vec<JsValue>,
    marked: HashSet<NodeId>,
}

impl ParserContext {
    /// Create a context with the given feature gate.
    #[must_use]
    pub fn new(features: Feature) -> Self {
        ParserContext {
            features,
            ids: HashMap::new(),
            encountered: Vec::new(),
            marked: HashSet::new(),
        }
    }

    /// The feature gate for this parse.
    #[inline]
    #[must_use]
    pub fn features(&self) -> Feature {
        self.features
    }

    /// Fail unless `feature` is enabled.
    pub fn require(&self, feature: Feature, name: &'static str, type_name: &'static str) -> Result<()> {
        if self.features.contains(feature) {
            Ok(())
        } else {
            Err(Error::feature_missing(name, type_name))
        }
    }

    /// Return the id for a reference-typed value, allocating on first
    /// encounter. The flag is true when the id is fresh.
    pub fn intern(&mut self, value: &JsValue) -> Result<(NodeId, bool)> {
        let identity = value
            .ref_identity()
            .ok_or_else(|| Error::assertion(format!("interned a primitive {}", value.type_name())))?;
        if let Some(&id) = self.ids.get(&identity) {
            return Ok((id, false));
        }
        let id = NodeId::try_from(self.encountered.len())
            .map_err(|_| Error::assertion("id space exhausted"))?;
        self.ids.insert(identity, id);
        self.encountered.push(value.clone());
        Ok((id, true))
    }

    /// Mark an id for hoisting into a variable.
    pub fn mark(&mut self, id: NodeId) {
        self.marked.insert(id);
    }

    /// True when the id is marked.
    #[must_use]
    pub fn is_marked(&self, id: NodeId) -> bool {
        self.marked.contains(&id)
    }

    /// The marked ids, ascending.
    #[must_use]
    pub fn marked_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.marked.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Consume the context into its marked set.
    #[must_use]
    pub fn into_marked(self) -> HashSet<NodeId> {
        self.marked
    }

    /// Number of identities allocated so far.
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.encountered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivify_value::JsObject;

    #[test]
    fn interning_is_stable() {
        let mut ctx = ParserContext::new(Feature::LATEST);
        let obj = JsValue::Object(JsObject::new());
        let (first, fresh) = ctx.intern(&obj).unwrap();
        assert!(fresh);
        let (second, fresh) = ctx.intern(&obj).unwrap();
        assert!(!fresh);
        assert_eq!(first, second);
    }

    #[test]
    fn ids_follow_encounter_order() {
        let mut ctx = ParserContext::new(Feature::LATEST);
        let a = JsValue::Object(JsObject::new());
        let b = JsValue::Object(JsObject::new());
        assert_eq!(ctx.intern(&a).unwrap().0, 0);
        assert_eq!(ctx.intern(&b).unwrap().0, 1);
        assert_eq!(ctx.id_count(), 2);
    }

    #[test]
    fn interning_a_primitive_is_a_bug() {
        let mut ctx = ParserContext::new(Feature::LATEST);
        let err = ctx.intern(&JsValue::Number(1.0)).unwrap_err();
        assert!(matches!(err, Error::AssertionFailed(_)));
    }

    #[test]
    fn marking() {
        let mut ctx = ParserContext::new(Feature::LATEST);
        ctx.mark(3);
        ctx.mark(1);
        ctx.mark(3);
        assert!(ctx.is_marked(1));
        assert!(!ctx.is_marked(0));
        assert_eq!(ctx.marked_ids(), vec![1, 3]);
    }
}
