// vivify-core - Error types for the vivify serializer
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for parsing, emission, and reconstruction.
//!
//! # Examples
//!
//! ```
//! use vivify_core::Error;
//!
//! let err = Error::unsupported("function");
//! assert_eq!(err.to_string(), "cannot serialize a value of type function");
//!
//! let err = Error::feature_missing("Map", "Map");
//! assert!(err.to_string().contains("disabled feature"));
//! ```

use std::fmt;

/// Result type for serializer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the serializer.
#[derive(Debug, Clone)]
pub enum Error {
    /// The input value is not representable (unregistered function or
    /// symbol, pending promise in a synchronous parse, and so on).
    UnsupportedType {
        type_name: &'static str,
        detail: Option<String>,
    },
    /// The value requires a feature the gate has disabled.
    FeatureMissing {
        feature: &'static str,
        type_name: &'static str,
    },
    /// Internal invariant violated; indicates a bug, never valid use.
    AssertionFailed(String),
    /// The host evaluator failed; the message is propagated verbatim.
    EvaluationFailed(String),
    /// The JSON envelope could not be decoded.
    InvalidEnvelope(String),
    /// A registry key or value was already bound.
    DuplicateReference(String),
    /// A registry key was not found.
    UnknownReference(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedType { type_name, detail } => {
                write!(f, "cannot serialize a value of type {}", type_name)?;
                if let Some(detail) = detail {
                    write!(f, ": {}", detail)?;
                }
                Ok(())
            }
            Error::FeatureMissing { feature, type_name } => {
                write!(
                    f,
                    "a value of type {} requires the disabled feature {}",
                    type_name, feature
                )
            }
            Error::AssertionFailed(msg) => {
                write!(f, "internal assertion failed: {}", msg)
            }
            Error::EvaluationFailed(msg) => {
                write!(f, "evaluation failed: {}", msg)
            }
            Error::InvalidEnvelope(msg) => {
                write!(f, "invalid envelope: {}", msg)
            }
            Error::DuplicateReference(key) => {
                write!(f, "reference already registered: {}", key)
            }
            Error::UnknownReference(key) => {
                write!(f, "no reference registered for key: {}", key)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Create an unsupported-type error.
    pub fn unsupported(type_name: &'static str) -> Self {
        Error::UnsupportedType {
            type_name,
            detail: None,
        }
    }

    /// Create an unsupported-type error with extra detail.
    pub fn unsupported_because(type_name: &'static str, detail: impl Into<String>) -> Self {
        Error::UnsupportedType {
            type_name,
            detail: Some(detail.into()),
        }
    }

    /// Create a feature-missing error.
    pub fn feature_missing(feature: &'static str, type_name: &'static str) -> Self {
        Error::FeatureMissing { feature, type_name }
    }

    /// Create an assertion failure.
    pub fn assertion(msg: impl Into<String>) -> Self {
        Error::AssertionFailed(msg.into())
    }

    /// Create an evaluation failure.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Error::EvaluationFailed(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidEnvelope(err.to_string())
    }
}
