// vivify-core - Code emitter
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The emitter: IR tree in, one self-evaluating expression out.
//!
//! Traversal is depth-first over the tree the parser produced. Three
//! pieces of state drive cycle handling:
//!
//! 1. a variable allocator that gives each hoisted id a short name
//!    (`v` plus the id in base 36);
//! 2. a stack of ancestor ids, so a back-reference to an ancestor (a
//!    cycle still being built) is recognized at the point of use;
//! 3. the deferred assignment list, where cyclic edges become patches
//!    that run after the root expression has produced every binding.
//!
//! A node whose id is hoisted (marked by the parser, or referenced by a
//! patch during emission) is bound inline as `vN=<expr>` at its
//! introducing occurrence; every other occurrence is the bare name.
//! The emitter is total over well-formed IR; missing slots surface as
//! assertion failures.

mod assignment;

use std::collections::{BTreeMap, HashSet};

use tracing::debug;
use vivify_value::WellKnownSymbol;

use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::ir::{ConstantCode, Node, NodeId, NodeKind, RecordKeys, RecordNode};
use crate::registry::GLOBAL_REFS;

use self::assignment::Assignment;

/// True when `key` is usable bare in property positions.
pub(crate) fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// True when `key` is a canonical non-negative integer literal.
/// Leading-zero forms ("01") are not canonical and stay quoted.
pub(crate) fn is_index_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key.len() == 1 || !key.starts_with('0'))
}

/// IR-to-source emitter. One instance serves one tree.
pub struct Emitter {
    features: Feature,
    marked: HashSet<NodeId>,
    vars: BTreeMap<NodeId, String>,
    stack: Vec<NodeId>,
    assignments: Vec<Assignment>,
}

impl Emitter {
    /// Create an emitter for a tree whose parse observed `features` and
    /// marked `marked`.
    #[must_use]
    pub fn new(features: Feature, marked: HashSet<NodeId>) -> Self {
        Emitter {
            features,
            marked,
            vars: BTreeMap::new(),
            stack: Vec::new(),
            assignments: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Variable allocation
    // ------------------------------------------------------------------

    /// The variable name for an id, allocating on first use.
    fn ref_param(&mut self, id: NodeId) -> String {
        if let Some(name) = self.vars.get(&id) {
            return name.clone();
        }
        let name = format!("v{}", base36(id));
        self.vars.insert(id, name.clone());
        name
    }

    /// Bind the expression to its variable when the id is hoisted.
    fn wrap_binding(&mut self, id: NodeId, expr: String) -> String {
        if self.marked.contains(&id) || self.vars.contains_key(&id) {
            let name = self.ref_param(id);
            format!("{}={}", name, expr)
        } else {
            expr
        }
    }

    /// A back-reference to an ancestor still being built.
    fn is_cyclic(&self, node: &Node) -> bool {
        node.is_indexed() && node.i.is_some_and(|id| self.stack.contains(&id))
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Emit the expression for one node.
    pub fn serialize(&mut self, node: &Node) -> Result<String> {
        match node.t {
            NodeKind::Number => Ok(want_s(node)?.to_string()),
            NodeKind::String => Ok(format!("\"{}\"", want_s(node)?)),
            NodeKind::Constant => {
                let code = node
                    .b
                    .and_then(ConstantCode::from_code)
                    .ok_or_else(|| Error::assertion("constant node without a known code"))?;
                Ok(code.lexeme().to_string())
            }
            NodeKind::BigInt => Ok(format!("{}n", want_s(node)?)),
            NodeKind::Date => {
                let id = want_id(node)?;
                let expr = format!("new Date(\"{}\")", want_s(node)?);
                Ok(self.wrap_binding(id, expr))
            }
            NodeKind::RegExp => {
                let id = want_id(node)?;
                let flags = node.m.as_deref().unwrap_or("");
                let expr = format!("/{}/{}", want_s(node)?, flags);
                Ok(self.wrap_binding(id, expr))
            }
            NodeKind::Array => self.serialize_array(node),
            NodeKind::Object => self.serialize_object(node),
            NodeKind::NullConstructor => self.serialize_null_constructor(node),
            NodeKind::Set => self.serialize_set(node),
            NodeKind::Map => self.serialize_map(node),
            NodeKind::Error => self.serialize_error(node),
            NodeKind::AggregateError => self.serialize_aggregate_error(node),
            NodeKind::TypedArray | NodeKind::BigIntTypedArray => self.serialize_typed_array(node),
            NodeKind::ArrayBuffer => self.serialize_array_buffer(node),
            NodeKind::DataView => self.serialize_data_view(node),
            NodeKind::Blob => self.serialize_blob(node),
            NodeKind::File => self.serialize_file(node),
            NodeKind::Url => {
                let id = want_id(node)?;
                let expr = format!("new URL(\"{}\")", want_s(node)?);
                Ok(self.wrap_binding(id, expr))
            }
            NodeKind::UrlSearchParams => {
                let id = want_id(node)?;
                let query = want_s(node)?;
                let expr = if query.is_empty() {
                    "new URLSearchParams".to_string()
                } else {
                    format!("new URLSearchParams(\"{}\")", query)
                };
                Ok(self.wrap_binding(id, expr))
            }
            NodeKind::Headers => self.serialize_headers(node),
            NodeKind::FormData => self.serialize_form_data(node),
            NodeKind::Iterable => self.serialize_iterable(node),
            NodeKind::Promise => self.serialize_promise(node),
            NodeKind::Reference => {
                let id = want_id(node)?;
                let expr = format!("{}.get(\"{}\")", GLOBAL_REFS, want_s(node)?);
                Ok(self.wrap_binding(id, expr))
            }
            NodeKind::IndexedValue => {
                let id = want_id(node)?;
                Ok(self.ref_param(id))
            }
            NodeKind::WellKnownSymbol => {
                let id = want_id(node)?;
                let ws = node
                    .b
                    .and_then(|code| u8::try_from(code).ok())
                    .and_then(WellKnownSymbol::from_code)
                    .ok_or_else(|| Error::assertion("symbol node without a known code"))?;
                Ok(self.wrap_binding(id, ws.expression().to_string()))
            }
        }
    }

    // ------------------------------------------------------------------
    // Composites
    // ------------------------------------------------------------------

    fn serialize_array(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let children = want_children(node)?;
        self.stack.push(id);
        let mut parts: Vec<String> = Vec::with_capacity(children.len());
        for (index, slot) in children.iter().enumerate() {
            match slot {
                None => parts.push(String::new()),
                Some(child) if self.is_cyclic(child) => {
                    let child_id = want_id(child)?;
                    let source = self.ref_param(id);
                    let value = self.ref_param(child_id);
                    self.assignments.push(Assignment::Index {
                        target: format!("{}[{}]", source, index),
                        value,
                    });
                    parts.push(String::new());
                }
                Some(child) => {
                    let rendered = self.serialize(child)?;
                    parts.push(rendered);
                }
            }
        }
        self.stack.pop();

        let expr = format!("[{}]", join_with_trailing_hole(&parts));
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_object(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let record = want_record(node)?;
        self.stack.push(id);
        let body = self.serialize_properties(id, record)?;
        self.stack.pop();
        let expr = format!("{{{}}}", body);
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_null_constructor(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let base = "Object.create(null)".to_string();
        let expr = match node.d.as_deref() {
            None => base,
            Some(record) if record.s == 0 => base,
            Some(record) => {
                self.stack.push(id);
                let out = if self.features.contains(Feature::OBJECT_ASSIGN) {
                    let body = self.serialize_properties(id, record)?;
                    format!("Object.assign({},{{{}}})", base, body)
                } else {
                    self.push_property_assignments(id, record)?;
                    base
                };
                self.stack.pop();
                out
            }
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_set(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let children = want_children(node)?;
        self.stack.push(id);
        let mut parts: Vec<String> = Vec::with_capacity(children.len());
        for slot in children {
            let child = slot
                .as_ref()
                .ok_or_else(|| Error::assertion("set node with a hole"))?;
            if self.is_cyclic(child) {
                let child_id = want_id(child)?;
                let source = self.ref_param(id);
                let value = self.ref_param(child_id);
                self.assignments.push(Assignment::Add { source, value });
            } else {
                let rendered = self.serialize(child)?;
                parts.push(rendered);
            }
        }
        self.stack.pop();

        let expr = if parts.is_empty() {
            "new Set".to_string()
        } else {
            format!("new Set([{}])", parts.join(","))
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_map(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let record = want_record(node)?;
        let mut parts: Vec<String> = Vec::with_capacity(record.v.len());
        if record.s > 0 {
            let RecordKeys::Nodes(keys) = &record.k else {
                return Err(Error::assertion("map record without node keys"));
            };
            self.stack.push(id);
            for (key, value) in keys.iter().zip(&record.v) {
                if self.is_cyclic(key) || self.is_cyclic(value) {
                    let key_expr = if self.is_cyclic(key) {
                        let key_id = want_id(key)?;
                        self.ref_param(key_id)
                    } else {
                        self.serialize(key)?
                    };
                    let value_expr = if self.is_cyclic(value) {
                        let value_id = want_id(value)?;
                        self.ref_param(value_id)
                    } else {
                        self.serialize(value)?
                    };
                    let source = self.ref_param(id);
                    self.assignments.push(Assignment::Set {
                        source,
                        key: key_expr,
                        value: value_expr,
                    });
                } else {
                    let key_expr = self.serialize(key)?;
                    let value_expr = self.serialize(value)?;
                    parts.push(format!("[{},{}]", key_expr, value_expr));
                }
            }
            self.stack.pop();
        }

        let expr = if parts.is_empty() {
            "new Map".to_string()
        } else {
            format!("new Map([{}])", parts.join(","))
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_error(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let ctor = want_c(node)?;
        let message = node.m.as_deref().unwrap_or("");
        let base = format!("new {}(\"{}\")", ctor, message);
        let expr = match node.d.as_deref() {
            None => base,
            Some(record) if record.s == 0 => base,
            Some(record) => {
                self.stack.push(id);
                let out = if self.features.contains(Feature::OBJECT_ASSIGN) {
                    let body = self.serialize_properties(id, record)?;
                    format!("Object.assign({},{{{}}})", base, body)
                } else {
                    self.push_property_assignments(id, record)?;
                    base
                };
                self.stack.pop();
                out
            }
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_aggregate_error(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let message = node.m.as_deref().unwrap_or("");
        let children = want_children(node)?;
        self.stack.push(id);
        let mut parts: Vec<String> = Vec::with_capacity(children.len());
        for (index, slot) in children.iter().enumerate() {
            let child = slot
                .as_ref()
                .ok_or_else(|| Error::assertion("aggregate error with a hole"))?;
            if self.is_cyclic(child) {
                let child_id = want_id(child)?;
                let source = self.ref_param(id);
                let value = self.ref_param(child_id);
                self.assignments.push(Assignment::Index {
                    target: format!("{}.errors[{}]", source, index),
                    value,
                });
                parts.push(String::new());
            } else {
                let rendered = self.serialize(child)?;
                parts.push(rendered);
            }
        }
        let mut expr = format!(
            "new AggregateError([{}],\"{}\")",
            join_with_trailing_hole(&parts),
            message
        );
        if let Some(record) = node.d.as_deref() {
            if record.s > 0 {
                if self.features.contains(Feature::OBJECT_ASSIGN) {
                    let body = self.serialize_properties(id, record)?;
                    expr = format!("Object.assign({},{{{}}})", expr, body);
                } else {
                    self.push_property_assignments(id, record)?;
                }
            }
        }
        self.stack.pop();
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_typed_array(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let ctor = want_c(node)?.to_string();
        let children = want_children(node)?;
        let mut parts: Vec<String> = Vec::with_capacity(children.len());
        for slot in children {
            let child = slot
                .as_ref()
                .ok_or_else(|| Error::assertion("typed array with a hole"))?;
            let rendered = self.serialize(child)?;
            parts.push(rendered);
        }
        let expr = if parts.is_empty() {
            format!("new {}", ctor)
        } else {
            match node.b {
                Some(offset) if offset > 0 => {
                    format!("new {}([{}],{})", ctor, parts.join(","), offset)
                }
                _ => format!("new {}([{}])", ctor, parts.join(",")),
            }
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_array_buffer(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let children = want_children(node)?;
        let mut parts: Vec<String> = Vec::with_capacity(children.len());
        for slot in children {
            let child = slot
                .as_ref()
                .ok_or_else(|| Error::assertion("array buffer with a hole"))?;
            let rendered = self.serialize(child)?;
            parts.push(rendered);
        }
        let expr = if parts.is_empty() {
            "new ArrayBuffer(0)".to_string()
        } else {
            format!("new Uint8Array([{}]).buffer", parts.join(","))
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_data_view(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let buffer = self.serialize(want_f(node)?)?;
        let byte_length = node.l.unwrap_or(0);
        let byte_offset = node.b.unwrap_or(0);
        let expr = format!("new DataView({},{},{})", buffer, byte_offset, byte_length);
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_blob(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let payload = self.serialize(want_f(node)?)?;
        let content_type = want_c(node)?;
        let expr = format!("new Blob([{}],{{type:\"{}\"}})", payload, content_type);
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_file(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let payload = self.serialize(want_f(node)?)?;
        let content_type = want_c(node)?;
        let name = node
            .m
            .as_deref()
            .ok_or_else(|| Error::assertion("file node without a name"))?;
        let last_modified = node
            .b
            .ok_or_else(|| Error::assertion("file node without a timestamp"))?;
        let expr = format!(
            "new File([{}],\"{}\",{{type:\"{}\",lastModified:{}}})",
            payload, name, content_type, last_modified
        );
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_headers(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let record = want_record(node)?;
        let expr = if record.s == 0 {
            "new Headers".to_string()
        } else {
            let RecordKeys::Props(keys) = &record.k else {
                return Err(Error::assertion("headers record without string keys"));
            };
            let mut parts: Vec<String> = Vec::with_capacity(keys.len());
            for (key, value) in keys.iter().zip(&record.v) {
                let rendered = self.serialize(value)?;
                parts.push(format!("[\"{}\",{}]", key, rendered));
            }
            format!("new Headers([{}])", parts.join(","))
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_form_data(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let record = want_record(node)?;
        let expr = if record.s == 0 {
            "new FormData".to_string()
        } else {
            let RecordKeys::Props(keys) = &record.k else {
                return Err(Error::assertion("form data record without string keys"));
            };
            let mut calls = String::new();
            for (key, value) in keys.iter().zip(&record.v) {
                let rendered = self.serialize(value)?;
                calls.push_str(&format!("f.append(\"{}\",{}),", key, rendered));
            }
            if self.features.contains(Feature::ARROW_FUNCTION) {
                format!("((f)=>({}f))(new FormData())", calls)
            } else {
                format!("(function(f){{return {}f}})(new FormData())", calls)
            }
        };
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_iterable(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let children = want_children(node)?;
        self.stack.push(id);
        let mut parts: Vec<String> = Vec::with_capacity(children.len());
        for slot in children {
            let child = slot
                .as_ref()
                .ok_or_else(|| Error::assertion("iterable with a hole"))?;
            // A cyclic edge inside a single-shot iterable cannot be
            // patched after materialization; the name reads as undefined.
            let rendered = if self.is_cyclic(child) {
                let child_id = want_id(child)?;
                self.ref_param(child_id)
            } else {
                self.serialize(child)?
            };
            parts.push(rendered);
        }
        self.stack.pop();
        let array_expr = format!("[{}]", parts.join(","));
        let expr = self.iterable_expr(&array_expr);
        Ok(self.wrap_binding(id, expr))
    }

    fn serialize_promise(&mut self, node: &Node) -> Result<String> {
        let id = want_id(node)?;
        let child = want_f(node)?;
        let expr = if self.is_cyclic(child) {
            // Defer reading the name until the ancestor exists.
            let child_id = want_id(child)?;
            let name = self.ref_param(child_id);
            if self.features.contains(Feature::ARROW_FUNCTION) {
                format!("Promise.resolve().then(()=>{})", name)
            } else {
                format!("Promise.resolve().then(function(){{return {}}})", name)
            }
        } else {
            let rendered = self.serialize(child)?;
            format!("Promise.resolve({})", rendered)
        };
        Ok(self.wrap_binding(id, expr))
    }

    // ------------------------------------------------------------------
    // Property records
    // ------------------------------------------------------------------

    /// Render a property record as a literal body, deferring cyclic
    /// values into patches against the owner. Call with the owner on
    /// the ancestor stack.
    fn serialize_properties(&mut self, owner: NodeId, record: &RecordNode) -> Result<String> {
        let RecordKeys::Props(keys) = &record.k else {
            return Err(Error::assertion("property record without string keys"));
        };
        let mut parts: Vec<String> = Vec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(&record.v) {
            if self.is_cyclic(value) {
                let value_id = want_id(value)?;
                let rendered = self.ref_param(value_id);
                let target = self.property_target(owner, key);
                self.assignments.push(Assignment::Index {
                    target,
                    value: rendered,
                });
            } else {
                let rendered = self.serialize(value)?;
                parts.push(format!("{}:{}", render_key(key), rendered));
            }
        }
        Ok(parts.join(","))
    }

    /// Turn every record entry into a deferred patch against the owner.
    fn push_property_assignments(&mut self, owner: NodeId, record: &RecordNode) -> Result<()> {
        let RecordKeys::Props(keys) = &record.k else {
            return Err(Error::assertion("property record without string keys"));
        };
        for (key, value) in keys.iter().zip(&record.v) {
            let rendered = if self.is_cyclic(value) {
                let value_id = want_id(value)?;
                self.ref_param(value_id)
            } else {
                self.serialize(value)?
            };
            let target = self.property_target(owner, key);
            self.assignments.push(Assignment::Index {
                target,
                value: rendered,
            });
        }
        Ok(())
    }

    fn property_target(&mut self, owner: NodeId, key: &str) -> String {
        let source = self.ref_param(owner);
        if is_identifier(key) {
            format!("{}.{}", source, key)
        } else {
            format!("{}[\"{}\"]", source, key)
        }
    }

    // ------------------------------------------------------------------
    // Iterator wrappers
    // ------------------------------------------------------------------

    fn iterator_body(&self, array_expr: &str) -> String {
        if self.features.contains(Feature::ARRAY_PROTOTYPE_VALUES) {
            format!("{}.values()", array_expr)
        } else if self.features.contains(Feature::ARROW_FUNCTION) {
            format!(
                "((s,i)=>({{next:()=>({{done:i>=s.length,value:s[i++]}})}}))({},0)",
                array_expr
            )
        } else {
            format!(
                "(function(s,i){{return{{next:function(){{return{{done:i>=s.length,value:s[i++]}}}}}}}})({},0)",
                array_expr
            )
        }
    }

    fn iterable_expr(&self, array_expr: &str) -> String {
        let body = self.iterator_body(array_expr);
        if self.features.contains(Feature::ARROW_FUNCTION) {
            format!("{{[Symbol.iterator]:()=>{}}}", body)
        } else if self.features.contains(Feature::METHOD_SHORTHAND) {
            format!("{{[Symbol.iterator](){{return {}}}}}", body)
        } else {
            format!("{{[Symbol.iterator]:function(){{return {}}}}}", body)
        }
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Assemble the final expression from the root's rendered body.
    pub fn finalize(
        &mut self,
        root_id: Option<NodeId>,
        root_is_object: bool,
        body: String,
    ) -> Result<String> {
        let patches = assignment::resolve(std::mem::take(&mut self.assignments));

        if self.vars.is_empty() && patches.is_none() {
            // A bare object literal would parse as a block.
            return Ok(if root_is_object {
                format!("({})", body)
            } else {
                body
            });
        }

        let main = match patches {
            Some(patches) => {
                let id =
                    root_id.ok_or_else(|| Error::assertion("patches against an id-less root"))?;
                let root_var = self.ref_param(id);
                let bound = if body.starts_with(&format!("{}=", root_var)) {
                    body
                } else {
                    format!("{}={}", root_var, body)
                };
                format!("{},{},{}", bound, patches, root_var)
            }
            None => body,
        };

        let params: Vec<&str> = self.vars.values().map(String::as_str).collect();
        debug!(vars = params.len(), "finalizing emitted expression");
        let out = if self.features.contains(Feature::ARROW_FUNCTION) {
            format!("(({})=>({}))()", params.join(","), main)
        } else {
            format!("(function({}){{return {}}})()", params.join(","), main)
        };
        Ok(out)
    }
}

// ----------------------------------------------------------------------
// Slot accessors (missing slots are emitter bugs or malformed envelopes)
// ----------------------------------------------------------------------

fn want_id(node: &Node) -> Result<NodeId> {
    node.i
        .ok_or_else(|| Error::assertion(format!("{:?} node without an id", node.t)))
}

fn want_s(node: &Node) -> Result<&str> {
    node.s
        .as_deref()
        .ok_or_else(|| Error::assertion(format!("{:?} node without a payload", node.t)))
}

fn want_c(node: &Node) -> Result<&str> {
    node.c
        .as_deref()
        .ok_or_else(|| Error::assertion(format!("{:?} node without a constructor", node.t)))
}

fn want_record(node: &Node) -> Result<&RecordNode> {
    node.d
        .as_deref()
        .ok_or_else(|| Error::assertion(format!("{:?} node without a record", node.t)))
}

fn want_children(node: &Node) -> Result<&[Option<Node>]> {
    node.a
        .as_deref()
        .ok_or_else(|| Error::assertion(format!("{:?} node without children", node.t)))
}

fn want_f(node: &Node) -> Result<&Node> {
    node.f
        .as_deref()
        .ok_or_else(|| Error::assertion(format!("{:?} node without a child", node.t)))
}

// Join array slots, keeping a trailing comma when the final slot is a
// hole so the evaluated length includes it.
fn join_with_trailing_hole(parts: &[String]) -> String {
    let mut out = parts.join(",");
    if parts.last().is_some_and(|p| p.is_empty()) {
        out.push(',');
    }
    out
}

fn base36(mut id: NodeId) -> String {
    if id == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while id > 0 {
        let digit = (id % 36) as u32;
        digits.push(char::from_digit(digit, 36).expect("digit below radix"));
        id /= 36;
    }
    digits.iter().rev().collect()
}

/// Render an object-literal key: bare for identifiers and canonical
/// indices, computed for `__proto__` (a bare or quoted form would set
/// the prototype), quoted otherwise.
fn render_key(key: &str) -> String {
    if key == "__proto__" {
        return "[\"__proto__\"]".to_string();
    }
    if is_identifier(key) || is_index_key(key) {
        key.to_string()
    } else {
        format!("\"{}\"", key)
    }
}
