// vivify-core - JSON envelope
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The JSON envelope: a transportable split point in the pipeline.
//!
//! An envelope carries the IR tree plus exactly the context the emitter
//! needs to resume: the root id, whether the root is a bare object
//! literal, the feature bits the parse observed, and the marked ids.
//! Compiling an envelope therefore produces the same expression the
//! direct path would have, which is what makes the split transparent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::context::ParserContext;
use crate::emit::Emitter;
use crate::error::Result;
use crate::feature::Feature;
use crate::ir::{Node, NodeId};

/// The transportable document: IR plus serialization context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The IR tree.
    pub t: Node,
    /// Root id (0 when the root carries no identity).
    pub r: NodeId,
    /// True when the root emits a bare object literal.
    pub i: bool,
    /// Feature bits observed by the parse.
    pub f: u32,
    /// Marked ids, ascending.
    pub m: Vec<NodeId>,
}

impl Envelope {
    /// Build an envelope from a finished parse.
    #[must_use]
    pub(crate) fn from_parse(root: Node, ctx: &ParserContext) -> Envelope {
        Envelope {
            r: root.i.unwrap_or(0),
            i: root.t.emits_object_literal(),
            f: ctx.features().bits(),
            m: ctx.marked_ids(),
            t: root,
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Envelope> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reconstruct the serialization context and run the emitter.
    pub fn compile(&self) -> Result<String> {
        let marked: HashSet<NodeId> = self.m.iter().copied().collect();
        let mut emitter = Emitter::new(Feature::from_bits(self.f), marked);
        let body = emitter.serialize(&self.t)?;
        emitter.finalize(self.t.i, self.i, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ConstantCode;

    #[test]
    fn envelope_json_round_trips() {
        let envelope = Envelope {
            t: Node::constant(ConstantCode::Null),
            r: 0,
            i: false,
            f: Feature::LATEST.bits(),
            m: Vec::new(),
        };
        let json = envelope.to_json().unwrap();
        let back = Envelope::from_json(&json).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn compile_of_a_constant() {
        let envelope = Envelope {
            t: Node::constant(ConstantCode::True),
            r: 0,
            i: false,
            f: Feature::LATEST.bits(),
            m: Vec::new(),
        };
        assert_eq!(envelope.compile().unwrap(), "true");
    }

    #[test]
    fn malformed_json_is_an_envelope_error() {
        let err = Envelope::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidEnvelope(_)));
    }
}
