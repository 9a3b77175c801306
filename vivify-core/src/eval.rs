// vivify-core - Evaluator seam
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The evaluator seam.
//!
//! Executing emitted source is the host's job; this crate only defines
//! the capability it needs back. `deserialize` and `from_json` thread
//! an [`Evaluator`] explicitly, and a failure from the host is
//! propagated verbatim as `EvaluationFailed`.
//!
//! The evaluator must expose the reference registry to the evaluated
//! code under the conventional global name (see
//! [`GLOBAL_REFS`](crate::registry::GLOBAL_REFS)): an object whose
//! `get` method maps a registered key to its value, and errors on
//! absent keys.

use vivify_value::JsValue;

/// Host capability: evaluate one expression string to a value.
pub trait Evaluator {
    /// Evaluate `code`; a failure message is propagated verbatim.
    fn evaluate(&self, code: &str) -> std::result::Result<JsValue, String>;
}
