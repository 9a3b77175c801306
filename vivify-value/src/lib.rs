// vivify-value - Host value model for the vivify serializer
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # vivify-value
//!
//! The host value model consumed by the vivify serializer. `JsValue` is
//! an ECMAScript-shaped value graph: cloning a reference-typed variant
//! aliases the same underlying cell, so the graph supports shared
//! references and cycles the way a live runtime heap does.
//!
//! # Quick Start
//!
//! ```
//! use vivify_value::{JsObject, JsValue};
//!
//! let shared = JsObject::new();
//! let outer = JsObject::new();
//! outer.set("x", JsValue::Object(shared.clone()));
//! outer.set("y", JsValue::Object(shared.clone()));
//!
//! let x = outer.get("x").unwrap();
//! let y = outer.get("y").unwrap();
//! assert_eq!(x.ref_identity(), y.ref_identity());
//! ```
//!
//! # Core Components
//!
//! - [`JsValue`] - the value enum, primitives plus reference types
//! - [`JsPromise`] - a settle-once awaitable cell
//! - [`escape_string`] / [`unescape_string`] - the embedding codec for
//!   string payloads
//! - [`WellKnownSymbol`] - the well-known symbol set

pub mod date;
pub mod escape;
pub mod promise;
pub mod symbol;
pub mod value;
pub mod web;

pub use date::format_epoch_millis;
pub use escape::{escape_string, unescape_string, UnescapeError};
pub use promise::{JsPromise, PromiseSnapshot};
pub use symbol::{JsSymbol, WellKnownSymbol};
pub use value::{
    BigIntTypedArrayKind, ErrorKind, JsAggregateError, JsArray, JsArrayBuffer,
    JsBigIntTypedArray, JsDataView, JsDate, JsError, JsFunction, JsIterable, JsMap, JsObject,
    JsRegExp, JsSet, JsTypedArray, JsValue, RefIdentity, TypedArrayKind,
};
pub use web::{FormDataEntry, JsBlob, JsFile, JsFormData, JsHeaders, JsUrl, JsUrlSearchParams};
