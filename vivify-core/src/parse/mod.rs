// vivify-core - Graph parsers
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Graph parsers: value graph in, IR tree out.
//!
//! Two parsers share one dispatch shape. [`sync::SyncParser`] walks a
//! fully-synchronous graph and refuses anything that would suspend;
//! [`awaited::AsyncParser`] additionally settles promises at their node.
//! Everything that does not recurse (primitives, buffers, dates, URLs)
//! lives here and is used by both.
//!
//! Children of objects and maps are split into *eager* (non-iterable)
//! and *deferred* (iterable) groups. Eager children parse first in
//! insertion order, deferred children afterwards in insertion order, so
//! a single-shot iterable is never drained before its eager siblings
//! have been walked. Nested deferred iterables drain depth-first.

pub mod awaited;
pub mod sync;

use std::rc::Rc;

use vivify_value::{
    escape_string, JsArrayBuffer, JsBigIntTypedArray, JsDate, JsError, JsHeaders, JsRegExp,
    JsSymbol, JsTypedArray, JsUrl, JsUrlSearchParams, JsValue, WellKnownSymbol,
};

use crate::context::ParserContext;
use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::ir::{ConstantCode, Node, NodeId, NodeKind};
use crate::registry;

pub use awaited::AsyncParser;
pub use sync::SyncParser;

/// Outcome of the identity step for a reference-typed value.
pub(crate) enum Prior {
    /// The value short-circuits to a finished node (back-reference or
    /// registry lookup).
    Done(Node),
    /// First encounter; the caller decomposes the value under this id.
    Fresh(NodeId),
}

/// Intern a reference-typed value and apply the two short-circuits:
/// second encounters become marked back-references, registered values
/// become opaque lookups.
pub(crate) fn enter(ctx: &mut ParserContext, value: &JsValue) -> Result<Prior> {
    let (id, fresh) = ctx.intern(value)?;
    if !fresh {
        ctx.mark(id);
        return Ok(Prior::Done(Node::indexed(id)));
    }
    if let Some(key) = registry::with_default(|r| r.lookup_by_value(value)) {
        let mut node = Node::new(NodeKind::Reference);
        node.i = Some(id);
        node.s = Some(escape_string(&key));
        return Ok(Prior::Done(node));
    }
    Ok(Prior::Fresh(id))
}

/// Parse a primitive; `None` when the value is reference-typed.
pub(crate) fn parse_primitive(ctx: &ParserContext, value: &JsValue) -> Result<Option<Node>> {
    let node = match value {
        JsValue::Undefined => Node::constant(ConstantCode::Undefined),
        JsValue::Null => Node::constant(ConstantCode::Null),
        JsValue::Bool(true) => Node::constant(ConstantCode::True),
        JsValue::Bool(false) => Node::constant(ConstantCode::False),
        JsValue::Number(n) => number_node(*n),
        JsValue::BigInt(n) => {
            ctx.require(Feature::BIGINT, "BigInt", "bigint")?;
            let mut node = Node::new(NodeKind::BigInt);
            node.s = Some(n.to_string());
            node
        }
        JsValue::String(s) => string_node(s),
        _ => return Ok(None),
    };
    Ok(Some(node))
}

/// Number node, folding the non-finite and negative-zero cases into
/// their singleton constants.
pub(crate) fn number_node(value: f64) -> Node {
    if value.is_nan() {
        return Node::constant(ConstantCode::Nan);
    }
    if value == f64::INFINITY {
        return Node::constant(ConstantCode::PositiveInfinity);
    }
    if value == f64::NEG_INFINITY {
        return Node::constant(ConstantCode::NegativeInfinity);
    }
    if value == 0.0 && value.is_sign_negative() {
        return Node::constant(ConstantCode::NegativeZero);
    }
    let mut node = Node::new(NodeKind::Number);
    node.s = Some(value.to_string());
    node
}

/// String node; the payload is stored escaped.
pub(crate) fn string_node(value: &str) -> Node {
    let mut node = Node::new(NodeKind::String);
    node.s = Some(escape_string(value));
    node
}

/// True for values whose parse is deferred behind their eager siblings.
pub(crate) fn is_deferred(value: &JsValue) -> bool {
    matches!(value, JsValue::Iterable(_))
}

pub(crate) fn date_node(id: NodeId, date: &JsDate) -> Node {
    let mut node = Node::new(NodeKind::Date);
    node.i = Some(id);
    node.s = Some(date.to_iso_string());
    node
}

pub(crate) fn regexp_node(id: NodeId, regexp: &JsRegExp) -> Node {
    let mut node = Node::new(NodeKind::RegExp);
    node.i = Some(id);
    node.s = Some(regexp.source().to_string());
    node.m = Some(regexp.flags().to_string());
    node
}

pub(crate) fn array_buffer_node(ctx: &ParserContext, id: NodeId, buffer: &JsArrayBuffer) -> Result<Node> {
    ctx.require(Feature::TYPED_ARRAY, "TypedArray", "ArrayBuffer")?;
    let mut node = Node::new(NodeKind::ArrayBuffer);
    node.i = Some(id);
    let bytes = buffer.bytes();
    node.l = Some(bytes.len() as u64);
    node.a = Some(
        bytes
            .into_iter()
            .map(|byte| Some(number_node(f64::from(byte))))
            .collect(),
    );
    Ok(node)
}

pub(crate) fn typed_array_node(ctx: &ParserContext, id: NodeId, array: &JsTypedArray) -> Result<Node> {
    ctx.require(Feature::TYPED_ARRAY, "TypedArray", array.kind().constructor_name())?;
    let mut node = Node::new(NodeKind::TypedArray);
    node.i = Some(id);
    node.c = Some(array.kind().constructor_name().to_string());
    let elements = array.elements();
    node.l = Some(elements.len() as u64);
    node.a = Some(elements.into_iter().map(|el| Some(number_node(el))).collect());
    if array.byte_offset() > 0 {
        node.b = Some(array.byte_offset() as i64);
    }
    Ok(node)
}

pub(crate) fn bigint_typed_array_node(
    ctx: &ParserContext,
    id: NodeId,
    array: &JsBigIntTypedArray,
) -> Result<Node> {
    let name = array.kind().constructor_name();
    ctx.require(Feature::BIGINT, "BigInt", name)?;
    ctx.require(Feature::BIGINT_TYPED_ARRAY, "BigIntTypedArray", name)?;
    let mut node = Node::new(NodeKind::BigIntTypedArray);
    node.i = Some(id);
    node.c = Some(name.to_string());
    let elements = array.elements();
    node.l = Some(elements.len() as u64);
    node.a = Some(
        elements
            .into_iter()
            .map(|el| {
                let mut child = Node::new(NodeKind::BigInt);
                child.s = Some(el.to_string());
                Some(child)
            })
            .collect(),
    );
    if array.byte_offset() > 0 {
        node.b = Some(array.byte_offset() as i64);
    }
    Ok(node)
}

pub(crate) fn url_node(ctx: &ParserContext, id: NodeId, url: &JsUrl) -> Result<Node> {
    ctx.require(Feature::WEB_API, "WebAPI", "URL")?;
    let mut node = Node::new(NodeKind::Url);
    node.i = Some(id);
    node.s = Some(escape_string(url.href()));
    Ok(node)
}

pub(crate) fn url_search_params_node(
    ctx: &ParserContext,
    id: NodeId,
    params: &JsUrlSearchParams,
) -> Result<Node> {
    ctx.require(Feature::WEB_API, "WebAPI", "URLSearchParams")?;
    let mut node = Node::new(NodeKind::UrlSearchParams);
    node.i = Some(id);
    node.s = Some(escape_string(&params.to_query_string()));
    Ok(node)
}

pub(crate) fn headers_node(ctx: &ParserContext, id: NodeId, headers: &JsHeaders) -> Result<Node> {
    ctx.require(Feature::WEB_API, "WebAPI", "Headers")?;
    let entries = headers.entries();
    let mut keys = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        keys.push(escape_string(&name));
        values.push(string_node(&value));
    }
    let mut node = Node::new(NodeKind::Headers);
    node.i = Some(id);
    node.d = Some(Box::new(crate::ir::RecordNode {
        s: keys.len() as u64,
        k: crate::ir::RecordKeys::Props(keys),
        v: values,
    }));
    Ok(node)
}

pub(crate) fn symbol_node(ctx: &ParserContext, id: NodeId, symbol: &JsSymbol) -> Result<Node> {
    ctx.require(Feature::SYMBOL, "Symbol", "symbol")?;
    match symbol {
        JsSymbol::WellKnown(ws) => Ok(well_known_symbol_node(id, *ws)),
        // Registered symbols were already short-circuited to Reference
        // nodes; anything left is opaque.
        JsSymbol::Custom(_) => Err(Error::unsupported_because(
            "symbol",
            "host symbols must be pre-registered",
        )),
    }
}

pub(crate) fn well_known_symbol_node(id: NodeId, ws: WellKnownSymbol) -> Node {
    let mut node = Node::new(NodeKind::WellKnownSymbol);
    node.i = Some(id);
    node.b = Some(i64::from(ws.code()));
    node
}

/// Extra own properties of an error, stack included when the gate
/// allows it. Keys come back escaped.
pub(crate) fn error_extras(ctx: &ParserContext, error: &JsError) -> Vec<(Rc<str>, JsValue)> {
    let mut extras: Vec<(Rc<str>, JsValue)> = Vec::new();
    if ctx.features().contains(Feature::ERROR_PROTOTYPE_STACK) {
        if let Some(stack) = error.stack() {
            extras.push((Rc::from("stack"), JsValue::String(stack)));
        }
    }
    extras.extend(error.props());
    extras
}

/// Mark `id` when its extra fields will need manual patches: without
/// `Object.assign` the emitter can only decorate through a variable.
pub(crate) fn mark_for_manual_assign(ctx: &mut ParserContext, id: NodeId, field_count: usize) {
    if field_count > 0 && !ctx.features().contains(Feature::OBJECT_ASSIGN) {
        ctx.mark(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_singletons() {
        assert_eq!(number_node(f64::NAN).t, NodeKind::Constant);
        assert_eq!(number_node(f64::INFINITY).t, NodeKind::Constant);
        assert_eq!(number_node(-0.0).t, NodeKind::Constant);
        // Positive zero is an ordinary number.
        let zero = number_node(0.0);
        assert_eq!(zero.t, NodeKind::Number);
        assert_eq!(zero.s.as_deref(), Some("0"));
    }

    #[test]
    fn integral_numbers_have_no_fraction() {
        assert_eq!(number_node(3.0).s.as_deref(), Some("3"));
        assert_eq!(number_node(-12.5).s.as_deref(), Some("-12.5"));
    }

    #[test]
    fn strings_are_stored_escaped() {
        let node = string_node("a\"b");
        assert_eq!(node.s.as_deref(), Some("a\\\"b"));
    }
}
