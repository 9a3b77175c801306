// vivify-value - Symbol types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbol values.
//!
//! Well-known symbols are process-wide singletons addressed by name on
//! the `Symbol` constructor; they are the only symbols the serializer
//! can reconstruct without a registry entry. Host-created symbols are
//! opaque: they carry an optional description for diagnostics but are
//! serializable only when pre-registered.

use std::fmt;
use std::rc::Rc;

/// The well-known symbols, one per `Symbol.*` constructor property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownSymbol {
    AsyncIterator,
    HasInstance,
    IsConcatSpreadable,
    Iterator,
    Match,
    MatchAll,
    Replace,
    Search,
    Species,
    Split,
    ToPrimitive,
    ToStringTag,
    Unscopables,
}

impl WellKnownSymbol {
    /// The source expression that evaluates to this symbol.
    #[must_use]
    pub fn expression(self) -> &'static str {
        match self {
            WellKnownSymbol::AsyncIterator => "Symbol.asyncIterator",
            WellKnownSymbol::HasInstance => "Symbol.hasInstance",
            WellKnownSymbol::IsConcatSpreadable => "Symbol.isConcatSpreadable",
            WellKnownSymbol::Iterator => "Symbol.iterator",
            WellKnownSymbol::Match => "Symbol.match",
            WellKnownSymbol::MatchAll => "Symbol.matchAll",
            WellKnownSymbol::Replace => "Symbol.replace",
            WellKnownSymbol::Search => "Symbol.search",
            WellKnownSymbol::Species => "Symbol.species",
            WellKnownSymbol::Split => "Symbol.split",
            WellKnownSymbol::ToPrimitive => "Symbol.toPrimitive",
            WellKnownSymbol::ToStringTag => "Symbol.toStringTag",
            WellKnownSymbol::Unscopables => "Symbol.unscopables",
        }
    }

    /// Stable numeric code, used by the wire form.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            WellKnownSymbol::AsyncIterator => 0,
            WellKnownSymbol::HasInstance => 1,
            WellKnownSymbol::IsConcatSpreadable => 2,
            WellKnownSymbol::Iterator => 3,
            WellKnownSymbol::Match => 4,
            WellKnownSymbol::MatchAll => 5,
            WellKnownSymbol::Replace => 6,
            WellKnownSymbol::Search => 7,
            WellKnownSymbol::Species => 8,
            WellKnownSymbol::Split => 9,
            WellKnownSymbol::ToPrimitive => 10,
            WellKnownSymbol::ToStringTag => 11,
            WellKnownSymbol::Unscopables => 12,
        }
    }

    /// Reverse of [`code`](Self::code).
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(WellKnownSymbol::AsyncIterator),
            1 => Some(WellKnownSymbol::HasInstance),
            2 => Some(WellKnownSymbol::IsConcatSpreadable),
            3 => Some(WellKnownSymbol::Iterator),
            4 => Some(WellKnownSymbol::Match),
            5 => Some(WellKnownSymbol::MatchAll),
            6 => Some(WellKnownSymbol::Replace),
            7 => Some(WellKnownSymbol::Search),
            8 => Some(WellKnownSymbol::Species),
            9 => Some(WellKnownSymbol::Split),
            10 => Some(WellKnownSymbol::ToPrimitive),
            11 => Some(WellKnownSymbol::ToStringTag),
            12 => Some(WellKnownSymbol::Unscopables),
            _ => None,
        }
    }
}

/// Description payload of a host-created symbol.
#[derive(Debug)]
pub struct CustomSymbolInner {
    description: Option<Rc<str>>,
}

/// A symbol value, well-known or host-created.
#[derive(Clone)]
pub enum JsSymbol {
    /// One of the `Symbol.*` singletons.
    WellKnown(WellKnownSymbol),
    /// Host-created symbol; identity is the allocation.
    Custom(Rc<CustomSymbolInner>),
}

impl JsSymbol {
    /// Create a fresh host symbol with an optional description.
    #[must_use]
    pub fn custom(description: Option<&str>) -> Self {
        JsSymbol::Custom(Rc::new(CustomSymbolInner {
            description: description.map(Rc::from),
        }))
    }

    /// The description, if this is a described host symbol.
    #[must_use]
    pub fn description(&self) -> Option<Rc<str>> {
        match self {
            JsSymbol::WellKnown(_) => None,
            JsSymbol::Custom(inner) => inner.description.clone(),
        }
    }
}

impl fmt::Debug for JsSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsSymbol::WellKnown(ws) => write!(f, "{}", ws.expression()),
            JsSymbol::Custom(inner) => match &inner.description {
                Some(desc) => write!(f, "Symbol({})", desc),
                None => write!(f, "Symbol()"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..13 {
            let ws = WellKnownSymbol::from_code(code).unwrap();
            assert_eq!(ws.code(), code);
        }
        assert!(WellKnownSymbol::from_code(13).is_none());
    }

    #[test]
    fn expressions_are_dotted() {
        assert_eq!(
            WellKnownSymbol::Iterator.expression(),
            "Symbol.iterator"
        );
        assert_eq!(
            WellKnownSymbol::AsyncIterator.expression(),
            "Symbol.asyncIterator"
        );
    }

    #[test]
    fn custom_symbols_are_distinct() {
        let a = JsSymbol::custom(Some("tag"));
        let b = JsSymbol::custom(Some("tag"));
        let (JsSymbol::Custom(ra), JsSymbol::Custom(rb)) = (&a, &b) else {
            panic!("expected custom symbols");
        };
        assert!(!Rc::ptr_eq(ra, rb));
    }
}
