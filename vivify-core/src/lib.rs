// vivify-core - Graph parser, code emitter, and JSON envelope
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # vivify-core
//!
//! Serialize a live value graph into a single self-evaluating source
//! expression that reconstructs an isomorphic graph, shared references
//! and cycles included, in any host that can evaluate it. An
//! intermediate JSON envelope splits the pipeline for transport.
//!
//! # Quick Start
//!
//! ```
//! use vivify_core::serialize;
//! use vivify_value::{JsObject, JsValue};
//!
//! // A direct cycle: a.self === a
//! let a = JsObject::new();
//! a.set("self", JsValue::Object(a.clone()));
//!
//! let code = serialize(&JsValue::Object(a)).unwrap();
//! assert_eq!(code, "((v0)=>(v0={},v0.self=v0,v0))()");
//! ```
//!
//! # Core Components
//!
//! - [`serialize`] / [`serialize_async`] - value graph to expression
//! - [`to_json`] / [`compile_json`] - the envelope split
//! - [`deserialize`] / [`from_json`] - reconstruction through a host
//!   [`Evaluator`]
//! - [`register`] - pre-declare identities for opaque values
//! - [`Feature`] / [`Options`] - the feature gate

pub mod context;
pub mod emit;
pub mod envelope;
pub mod error;
pub mod eval;
pub mod feature;
pub mod ir;
pub mod parse;
pub mod registry;

use tracing::debug;
use vivify_value::JsValue;

pub use context::ParserContext;
pub use emit::Emitter;
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use eval::Evaluator;
pub use feature::Feature;
pub use ir::{ConstantCode, Node, NodeId, NodeKind, RecordKeys, RecordNode};
pub use parse::{AsyncParser, SyncParser};
pub use registry::{
    lookup_by_key, lookup_by_value, register, ReferenceRegistry, GLOBAL_REFS,
};

// Re-export the value model; callers build inputs from it.
pub use vivify_value as value;

// ============================================================================
// Options
// ============================================================================

/// Serialization options. The one recognized knob is the set of
/// features to remove from the default gate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Features subtracted from [`Feature::LATEST`].
    pub disabled_features: Feature,
}

impl Options {
    /// Options with nothing disabled.
    #[must_use]
    pub fn new() -> Self {
        Options {
            disabled_features: Feature::empty(),
        }
    }

    /// Disable a feature (builder style).
    #[must_use]
    pub fn disable(mut self, feature: Feature) -> Self {
        self.disabled_features = self.disabled_features | feature;
        self
    }

    /// The effective gate.
    #[must_use]
    pub fn features(&self) -> Feature {
        Feature::LATEST - self.disabled_features
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a value graph to a self-evaluating expression.
pub fn serialize(value: &JsValue) -> Result<String> {
    serialize_with(value, &Options::new())
}

/// [`serialize`] with explicit options.
pub fn serialize_with(value: &JsValue, options: &Options) -> Result<String> {
    let mut parser = SyncParser::new(options.features());
    let root = parser.parse(value)?;
    emit_parsed(root, parser.into_context())
}

/// Serialize a value graph, settling promises along the way.
pub async fn serialize_async(value: &JsValue) -> Result<String> {
    serialize_async_with(value, &Options::new()).await
}

/// [`serialize_async`] with explicit options.
pub async fn serialize_async_with(value: &JsValue, options: &Options) -> Result<String> {
    let mut parser = AsyncParser::new(options.features());
    let root = parser.parse(value).await?;
    emit_parsed(root, parser.into_context())
}

fn emit_parsed(root: Node, ctx: ParserContext) -> Result<String> {
    let features = ctx.features();
    let root_id = root.i;
    let root_is_object = root.t.emits_object_literal();
    let mut emitter = Emitter::new(features, ctx.into_marked());
    let body = emitter.serialize(&root)?;
    let out = emitter.finalize(root_id, root_is_object, body)?;
    debug!(len = out.len(), "serialized value graph");
    Ok(out)
}

// ============================================================================
// Envelope entry points
// ============================================================================

/// Parse a value graph and encode it as a JSON envelope.
pub fn to_json(value: &JsValue) -> Result<String> {
    to_json_with(value, &Options::new())
}

/// [`to_json`] with explicit options.
pub fn to_json_with(value: &JsValue, options: &Options) -> Result<String> {
    let mut parser = SyncParser::new(options.features());
    let root = parser.parse(value)?;
    Envelope::from_parse(root, &parser.into_context()).to_json()
}

/// Async counterpart of [`to_json`].
pub async fn to_json_async(value: &JsValue) -> Result<String> {
    to_json_async_with(value, &Options::new()).await
}

/// [`to_json_async`] with explicit options.
pub async fn to_json_async_with(value: &JsValue, options: &Options) -> Result<String> {
    let mut parser = AsyncParser::new(options.features());
    let root = parser.parse(value).await?;
    Envelope::from_parse(root, &parser.into_context()).to_json()
}

/// Compile a JSON envelope into the expression the direct path would
/// have produced.
pub fn compile_json(json: &str) -> Result<String> {
    Envelope::from_json(json)?.compile()
}

// ============================================================================
// Reconstruction
// ============================================================================

/// Evaluate emitted source through the host evaluator.
pub fn deserialize(code: &str, evaluator: &dyn Evaluator) -> Result<JsValue> {
    evaluator.evaluate(code).map_err(Error::evaluation)
}

/// Compile a JSON envelope and evaluate the result.
pub fn from_json(json: &str, evaluator: &dyn Evaluator) -> Result<JsValue> {
    let code = compile_json(json)?;
    deserialize(&code, evaluator)
}
