// vivify-core - Synchronous graph parser
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The synchronous parser.
//!
//! Walks a fully-synchronous value graph into IR. Anything that would
//! require suspension (a pending promise) is refused; an
//! already-settled promise parses like any other container.

use tracing::trace;
use vivify_value::{
    escape_string, JsAggregateError, JsArray, JsBlob, JsDataView, JsError, JsFile, JsFormData,
    JsIterable, JsMap, JsObject, JsPromise, JsSet, JsValue, PromiseSnapshot,
};

use crate::context::ParserContext;
use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::ir::{Node, NodeId, NodeKind, RecordKeys, RecordNode};

use super::{
    array_buffer_node, bigint_typed_array_node, date_node, enter, error_extras, headers_node,
    is_deferred, mark_for_manual_assign, parse_primitive, regexp_node, symbol_node,
    typed_array_node, url_node, url_search_params_node, Prior,
};

/// Recursive synchronous parser. One instance serves one parse.
pub struct SyncParser {
    ctx: ParserContext,
}

impl SyncParser {
    /// Create a parser over a fresh context with the given gate.
    #[must_use]
    pub fn new(features: Feature) -> Self {
        SyncParser {
            ctx: ParserContext::new(features),
        }
    }

    /// Parse a value graph into its IR root.
    pub fn parse(&mut self, value: &JsValue) -> Result<Node> {
        trace!(input = value.type_name(), "sync parse");
        let root = self.parse_value(value)?;
        trace!(
            ids = self.ctx.id_count(),
            marked = self.ctx.marked_ids().len(),
            "sync parse finished"
        );
        Ok(root)
    }

    /// Recover the context (marked set, feature gate) after parsing.
    #[must_use]
    pub fn into_context(self) -> ParserContext {
        self.ctx
    }

    fn parse_value(&mut self, value: &JsValue) -> Result<Node> {
        if let Some(node) = parse_primitive(&self.ctx, value)? {
            return Ok(node);
        }
        match enter(&mut self.ctx, value)? {
            Prior::Done(node) => Ok(node),
            Prior::Fresh(id) => self.parse_fresh(id, value),
        }
    }

    fn parse_fresh(&mut self, id: NodeId, value: &JsValue) -> Result<Node> {
        match value {
            JsValue::Array(arr) => self.parse_array(id, arr),
            JsValue::Object(obj) => self.parse_object(id, obj),
            JsValue::Map(map) => self.parse_map(id, map),
            JsValue::Set(set) => self.parse_set(id, set),
            JsValue::Date(date) => Ok(date_node(id, date)),
            JsValue::RegExp(regexp) => Ok(regexp_node(id, regexp)),
            JsValue::Error(error) => self.parse_error(id, error),
            JsValue::AggregateError(error) => self.parse_aggregate_error(id, error),
            JsValue::ArrayBuffer(buffer) => array_buffer_node(&self.ctx, id, buffer),
            JsValue::TypedArray(array) => typed_array_node(&self.ctx, id, array),
            JsValue::BigIntTypedArray(array) => bigint_typed_array_node(&self.ctx, id, array),
            JsValue::DataView(view) => self.parse_data_view(id, view),
            JsValue::Blob(blob) => self.parse_blob(id, blob),
            JsValue::File(file) => self.parse_file(id, file),
            JsValue::Url(url) => url_node(&self.ctx, id, url),
            JsValue::UrlSearchParams(params) => url_search_params_node(&self.ctx, id, params),
            JsValue::Headers(headers) => headers_node(&self.ctx, id, headers),
            JsValue::FormData(form) => self.parse_form_data(id, form),
            JsValue::Iterable(iterable) => self.parse_iterable(id, iterable),
            JsValue::Promise(promise) => self.parse_promise(id, promise),
            JsValue::Symbol(symbol) => symbol_node(&self.ctx, id, symbol),
            JsValue::Function(_) => Err(Error::unsupported_because(
                "function",
                "functions must be pre-registered",
            )),
            _ => Err(Error::assertion("primitive reached reference dispatch")),
        }
    }

    fn parse_array(&mut self, id: NodeId, arr: &JsArray) -> Result<Node> {
        let slots = arr.slots();
        let mut children = Vec::with_capacity(slots.len());
        for slot in &slots {
            match slot {
                Some(value) => children.push(Some(self.parse_value(value)?)),
                None => children.push(None),
            }
        }
        let mut node = Node::new(NodeKind::Array);
        node.i = Some(id);
        node.l = Some(slots.len() as u64);
        node.a = Some(children);
        Ok(node)
    }

    fn parse_object(&mut self, id: NodeId, obj: &JsObject) -> Result<Node> {
        let entries = obj.entries();
        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        let mut deferred = Vec::new();
        for (key, value) in entries {
            if is_deferred(&value) {
                deferred.push((key, value));
            } else {
                keys.push(escape_string(&key));
                values.push(self.parse_value(&value)?);
            }
        }
        for (key, value) in deferred {
            keys.push(escape_string(&key));
            values.push(self.parse_value(&value)?);
        }

        let null_proto = obj.is_null_proto();
        if null_proto {
            mark_for_manual_assign(&mut self.ctx, id, keys.len());
        }
        let mut node = Node::new(if null_proto {
            NodeKind::NullConstructor
        } else {
            NodeKind::Object
        });
        node.i = Some(id);
        node.d = Some(Box::new(RecordNode {
            s: keys.len() as u64,
            k: RecordKeys::Props(keys),
            v: values,
        }));
        Ok(node)
    }

    fn parse_map(&mut self, id: NodeId, map: &JsMap) -> Result<Node> {
        self.ctx.require(Feature::MAP, "Map", "Map")?;
        let entries = map.entries();
        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        let mut deferred = Vec::new();
        for (key, value) in entries {
            if is_deferred(&key) || is_deferred(&value) {
                deferred.push((key, value));
            } else {
                keys.push(self.parse_value(&key)?);
                values.push(self.parse_value(&value)?);
            }
        }
        for (key, value) in deferred {
            keys.push(self.parse_value(&key)?);
            values.push(self.parse_value(&value)?);
        }

        let mut node = Node::new(NodeKind::Map);
        node.i = Some(id);
        node.d = Some(Box::new(RecordNode {
            s: keys.len() as u64,
            k: RecordKeys::Nodes(keys),
            v: values,
        }));
        Ok(node)
    }

    fn parse_set(&mut self, id: NodeId, set: &JsSet) -> Result<Node> {
        self.ctx.require(Feature::SET, "Set", "Set")?;
        let values = set.values();
        let mut children = Vec::with_capacity(values.len());
        for value in &values {
            children.push(Some(self.parse_value(value)?));
        }
        let mut node = Node::new(NodeKind::Set);
        node.i = Some(id);
        node.l = Some(values.len() as u64);
        node.a = Some(children);
        Ok(node)
    }

    fn parse_error(&mut self, id: NodeId, error: &JsError) -> Result<Node> {
        let extras = error_extras(&self.ctx, error);
        mark_for_manual_assign(&mut self.ctx, id, extras.len());

        let mut node = Node::new(NodeKind::Error);
        node.i = Some(id);
        node.c = Some(error.kind().constructor_name().to_string());
        node.m = Some(escape_string(&error.message()));
        if !extras.is_empty() {
            let mut keys = Vec::with_capacity(extras.len());
            let mut values = Vec::with_capacity(extras.len());
            for (key, value) in extras {
                keys.push(escape_string(&key));
                values.push(self.parse_value(&value)?);
            }
            node.d = Some(Box::new(RecordNode {
                s: keys.len() as u64,
                k: RecordKeys::Props(keys),
                v: values,
            }));
        }
        Ok(node)
    }

    fn parse_aggregate_error(&mut self, id: NodeId, error: &JsAggregateError) -> Result<Node> {
        self.ctx
            .require(Feature::AGGREGATE_ERROR, "AggregateError", "AggregateError")?;
        let errors = error.errors();
        let mut children = Vec::with_capacity(errors.len());
        for child in &errors {
            children.push(Some(self.parse_value(child)?));
        }

        let extras = error.props();
        mark_for_manual_assign(&mut self.ctx, id, extras.len());

        let mut node = Node::new(NodeKind::AggregateError);
        node.i = Some(id);
        node.m = Some(escape_string(&error.message()));
        node.l = Some(errors.len() as u64);
        node.a = Some(children);
        if !extras.is_empty() {
            let mut keys = Vec::with_capacity(extras.len());
            let mut values = Vec::with_capacity(extras.len());
            for (key, value) in extras {
                keys.push(escape_string(&key));
                values.push(self.parse_value(&value)?);
            }
            node.d = Some(Box::new(RecordNode {
                s: keys.len() as u64,
                k: RecordKeys::Props(keys),
                v: values,
            }));
        }
        Ok(node)
    }

    fn parse_data_view(&mut self, id: NodeId, view: &JsDataView) -> Result<Node> {
        self.ctx.require(Feature::TYPED_ARRAY, "TypedArray", "DataView")?;
        let buffer = self.parse_value(&JsValue::ArrayBuffer(view.buffer()))?;
        let mut node = Node::new(NodeKind::DataView);
        node.i = Some(id);
        node.f = Some(Box::new(buffer));
        node.l = Some(view.byte_length() as u64);
        if view.byte_offset() > 0 {
            node.b = Some(view.byte_offset() as i64);
        }
        Ok(node)
    }

    fn parse_blob(&mut self, id: NodeId, blob: &JsBlob) -> Result<Node> {
        self.ctx.require(Feature::WEB_API, "WebAPI", "Blob")?;
        let payload = self.parse_value(&JsValue::ArrayBuffer(blob.buffer()))?;
        let mut node = Node::new(NodeKind::Blob);
        node.i = Some(id);
        node.c = Some(escape_string(blob.content_type()));
        node.f = Some(Box::new(payload));
        Ok(node)
    }

    fn parse_file(&mut self, id: NodeId, file: &JsFile) -> Result<Node> {
        self.ctx.require(Feature::WEB_API, "WebAPI", "File")?;
        let payload = self.parse_value(&JsValue::ArrayBuffer(file.buffer()))?;
        let mut node = Node::new(NodeKind::File);
        node.i = Some(id);
        node.c = Some(escape_string(file.content_type()));
        node.m = Some(escape_string(file.name()));
        node.b = Some(file.last_modified());
        node.f = Some(Box::new(payload));
        Ok(node)
    }

    fn parse_form_data(&mut self, id: NodeId, form: &JsFormData) -> Result<Node> {
        self.ctx.require(Feature::WEB_API, "WebAPI", "FormData")?;
        let entries = form.entries();
        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            keys.push(escape_string(&name));
            values.push(self.parse_value(&entry.to_value())?);
        }
        let mut node = Node::new(NodeKind::FormData);
        node.i = Some(id);
        node.d = Some(Box::new(RecordNode {
            s: keys.len() as u64,
            k: RecordKeys::Props(keys),
            v: values,
        }));
        Ok(node)
    }

    fn parse_iterable(&mut self, id: NodeId, iterable: &JsIterable) -> Result<Node> {
        // Emission wraps the items behind Symbol.iterator.
        self.ctx.require(Feature::SYMBOL, "Symbol", "iterable")?;
        let items = iterable.drain().ok_or_else(|| {
            Error::unsupported_because("iterable", "single-shot iterable already drained")
        })?;
        let mut children = Vec::with_capacity(items.len());
        for item in &items {
            children.push(Some(self.parse_value(item)?));
        }
        let mut node = Node::new(NodeKind::Iterable);
        node.i = Some(id);
        node.l = Some(items.len() as u64);
        node.a = Some(children);
        Ok(node)
    }

    fn parse_promise(&mut self, id: NodeId, promise: &JsPromise) -> Result<Node> {
        self.ctx.require(Feature::PROMISE, "Promise", "Promise")?;
        match promise.snapshot() {
            PromiseSnapshot::Resolved(value) => {
                let child = self.parse_value(&value)?;
                let mut node = Node::new(NodeKind::Promise);
                node.i = Some(id);
                node.f = Some(Box::new(child));
                Ok(node)
            }
            PromiseSnapshot::Rejected(_) => Err(Error::unsupported_because(
                "Promise",
                "rejected promises are not representable",
            )),
            PromiseSnapshot::Pending => Err(Error::unsupported_because(
                "Promise",
                "pending promise in a synchronous parse",
            )),
        }
    }
}
