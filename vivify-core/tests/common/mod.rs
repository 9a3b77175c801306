// vivify-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for vivify integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`obj`] - build an object value from key/value pairs
//! - [`arr`] - build a dense array value
//! - [`num`] / [`text`] - primitive shorthands
//! - [`assert_serializes!`] - assert the exact emitted expression

// Re-export common types for convenience
#[allow(unused_imports)]
pub use vivify_core::{serialize, serialize_with, Error, Feature, Options};
#[allow(unused_imports)]
pub use vivify_value::{JsArray, JsObject, JsValue};

/// Build an object from key/value pairs, insertion-ordered.
#[allow(dead_code)]
pub fn obj(entries: &[(&str, JsValue)]) -> JsValue {
    let object = JsObject::new();
    for (key, value) in entries {
        object.set(*key, value.clone());
    }
    JsValue::Object(object)
}

/// Build a dense array.
#[allow(dead_code)]
pub fn arr(values: Vec<JsValue>) -> JsValue {
    JsValue::Array(JsArray::from_values(values))
}

/// Number shorthand.
#[allow(dead_code)]
pub fn num(value: f64) -> JsValue {
    JsValue::Number(value)
}

/// String shorthand.
#[allow(dead_code)]
pub fn text(value: &str) -> JsValue {
    JsValue::from(value)
}

/// Assert that a value serializes to exactly the given expression.
#[macro_export]
macro_rules! assert_serializes {
    ($value:expr, $expected:expr) => {
        assert_eq!(vivify_core::serialize(&$value).unwrap(), $expected);
    };
    ($value:expr, $options:expr, $expected:expr) => {
        assert_eq!(
            vivify_core::serialize_with(&$value, &$options).unwrap(),
            $expected
        );
    };
}
