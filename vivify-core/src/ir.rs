// vivify-core - Intermediate representation of parsed value graphs
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The intermediate representation: a compact tagged tree.
//!
//! Every node is one [`Node`] record: an integer tag plus a fixed frame
//! of optional slots. Which slots are populated depends on the tag; the
//! emitter dispatches on the tag alone, there is no trait hierarchy.
//! The shape is serialization-stable: encoding a tree through the JSON
//! envelope and decoding it reproduces an identical structure, with
//! unpopulated slots omitted from the wire form.
//!
//! Slot meanings:
//!
//! | slot | used for |
//! |------|----------|
//! | `t` | variant tag (always present) |
//! | `i` | identity id of reference-typed subjects |
//! | `s` | literal payload text (number text, bigint digits, regex source, escaped string, URL href) |
//! | `l` | array length, set size, data-view byte length |
//! | `c` | constructor name (errors, typed arrays) or MIME content type |
//! | `m` | message (errors), file name, regex flags |
//! | `d` | child record: keys, values, arity |
//! | `a` | ordered child nodes (arrays, sets, iterable and error lists, byte/element lists) |
//! | `f` | single child node (promise value, binary payload, data-view buffer) |
//! | `b` | auxiliary numeric (constant code, symbol code, byte offset, last-modified) |

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Per-parse identity of a reference-typed subject.
pub type NodeId = u32;

// ============================================================================
// Tags
// ============================================================================

/// The node tags. Discriminants are stable wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeKind {
    Number = 0,
    String = 1,
    Constant = 2,
    BigInt = 3,
    Date = 4,
    RegExp = 5,
    Array = 6,
    Object = 7,
    NullConstructor = 8,
    Set = 9,
    Map = 10,
    Error = 11,
    AggregateError = 12,
    TypedArray = 13,
    BigIntTypedArray = 14,
    ArrayBuffer = 15,
    DataView = 16,
    Blob = 17,
    File = 18,
    Url = 19,
    UrlSearchParams = 20,
    Headers = 21,
    FormData = 22,
    Iterable = 23,
    Promise = 24,
    Reference = 25,
    IndexedValue = 26,
    WellKnownSymbol = 27,
}

impl NodeKind {
    /// True for nodes whose emitted expression is a bare object
    /// literal, which a host evaluator would otherwise parse as a
    /// block statement.
    #[must_use]
    pub fn emits_object_literal(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Iterable)
    }

    /// Reverse of the wire discriminant.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<NodeKind> {
        match tag {
            0 => Some(NodeKind::Number),
            1 => Some(NodeKind::String),
            2 => Some(NodeKind::Constant),
            3 => Some(NodeKind::BigInt),
            4 => Some(NodeKind::Date),
            5 => Some(NodeKind::RegExp),
            6 => Some(NodeKind::Array),
            7 => Some(NodeKind::Object),
            8 => Some(NodeKind::NullConstructor),
            9 => Some(NodeKind::Set),
            10 => Some(NodeKind::Map),
            11 => Some(NodeKind::Error),
            12 => Some(NodeKind::AggregateError),
            13 => Some(NodeKind::TypedArray),
            14 => Some(NodeKind::BigIntTypedArray),
            15 => Some(NodeKind::ArrayBuffer),
            16 => Some(NodeKind::DataView),
            17 => Some(NodeKind::Blob),
            18 => Some(NodeKind::File),
            19 => Some(NodeKind::Url),
            20 => Some(NodeKind::UrlSearchParams),
            21 => Some(NodeKind::Headers),
            22 => Some(NodeKind::FormData),
            23 => Some(NodeKind::Iterable),
            24 => Some(NodeKind::Promise),
            25 => Some(NodeKind::Reference),
            26 => Some(NodeKind::IndexedValue),
            27 => Some(NodeKind::WellKnownSymbol),
            _ => None,
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = u8::deserialize(deserializer)?;
        NodeKind::from_tag(tag).ok_or_else(|| de::Error::custom(format!("unknown node tag {}", tag)))
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Codes for the singleton primitive nodes, carried in the `b` slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstantCode {
    True,
    False,
    Undefined,
    Null,
    Nan,
    PositiveInfinity,
    NegativeInfinity,
    NegativeZero,
}

impl ConstantCode {
    /// The fixed lexeme emitted for this constant.
    #[must_use]
    pub fn lexeme(self) -> &'static str {
        match self {
            ConstantCode::True => "true",
            ConstantCode::False => "false",
            ConstantCode::Undefined => "void 0",
            ConstantCode::Null => "null",
            ConstantCode::Nan => "NaN",
            ConstantCode::PositiveInfinity => "Infinity",
            ConstantCode::NegativeInfinity => "-Infinity",
            ConstantCode::NegativeZero => "-0",
        }
    }

    /// Wire code.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            ConstantCode::True => 0,
            ConstantCode::False => 1,
            ConstantCode::Undefined => 2,
            ConstantCode::Null => 3,
            ConstantCode::Nan => 4,
            ConstantCode::PositiveInfinity => 5,
            ConstantCode::NegativeInfinity => 6,
            ConstantCode::NegativeZero => 7,
        }
    }

    /// Reverse of [`code`](Self::code).
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ConstantCode::True),
            1 => Some(ConstantCode::False),
            2 => Some(ConstantCode::Undefined),
            3 => Some(ConstantCode::Null),
            4 => Some(ConstantCode::Nan),
            5 => Some(ConstantCode::PositiveInfinity),
            6 => Some(ConstantCode::NegativeInfinity),
            7 => Some(ConstantCode::NegativeZero),
            _ => None,
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Key list of a child record: property names for objects and their kin,
/// full nodes for map bodies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKeys {
    /// Escaped property-name keys.
    Props(Vec<String>),
    /// Arbitrary node keys (maps).
    Nodes(Vec<Node>),
}

impl RecordKeys {
    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RecordKeys::Props(keys) => keys.len(),
            RecordKeys::Nodes(keys) => keys.len(),
        }
    }

    /// True when no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Child record: parallel key and value arrays of length `s`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordNode {
    /// Keys.
    pub k: RecordKeys,
    /// Values, index-aligned with `k`.
    pub v: Vec<Node>,
    /// Arity; equals both array lengths.
    pub s: u64,
}

// ============================================================================
// Nodes
// ============================================================================

/// One IR node. See the module docs for slot meanings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub t: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Box<RecordNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Vec<Option<Node>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<i64>,
}

impl Node {
    /// A node of the given kind with every slot empty.
    #[must_use]
    pub fn new(t: NodeKind) -> Node {
        Node {
            t,
            i: None,
            s: None,
            l: None,
            c: None,
            m: None,
            d: None,
            a: None,
            f: None,
            b: None,
        }
    }

    /// The canonical node for a singleton constant.
    #[must_use]
    pub fn constant(code: ConstantCode) -> Node {
        let mut node = Node::new(NodeKind::Constant);
        node.b = Some(code.code());
        node
    }

    /// A back-reference to an already-introduced id.
    #[must_use]
    pub fn indexed(id: NodeId) -> Node {
        let mut node = Node::new(NodeKind::IndexedValue);
        node.i = Some(id);
        node
    }

    /// True for back-reference nodes.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.t == NodeKind::IndexedValue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for tag in 0..=27 {
            let kind = NodeKind::from_tag(tag).unwrap();
            assert_eq!(kind as u8, tag);
        }
        assert!(NodeKind::from_tag(28).is_none());
    }

    #[test]
    fn constant_codes_round_trip() {
        for code in 0..8 {
            let c = ConstantCode::from_code(code).unwrap();
            assert_eq!(c.code(), code);
        }
        assert!(ConstantCode::from_code(8).is_none());
    }

    #[test]
    fn empty_slots_are_omitted() {
        let mut node = Node::new(NodeKind::String);
        node.s = Some("hi".to_string());
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"t":1,"s":"hi"}"#);
    }

    #[test]
    fn node_json_round_trips() {
        let mut arr = Node::new(NodeKind::Array);
        arr.i = Some(0);
        arr.l = Some(3);
        let mut one = Node::new(NodeKind::Number);
        one.s = Some("1".to_string());
        arr.a = Some(vec![Some(one), None, Some(Node::indexed(0))]);

        let json = serde_json::to_string(&arr).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, arr);
    }

    #[test]
    fn record_keys_decode_both_shapes() {
        let props: RecordKeys = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert!(matches!(props, RecordKeys::Props(_)));

        let nodes: RecordKeys = serde_json::from_str(r#"[{"t":2,"b":3}]"#).unwrap();
        assert!(matches!(nodes, RecordKeys::Nodes(_)));
    }
}
