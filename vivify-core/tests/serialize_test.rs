// vivify-core - Serialization tests for primitives and plain structures
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;
use common::*;

use num_bigint::BigInt;
use vivify_value::{ErrorKind, JsDate, JsError, JsRegExp};

#[test]
fn primitive_singletons() {
    assert_serializes!(JsValue::Bool(true), "true");
    assert_serializes!(JsValue::Bool(false), "false");
    assert_serializes!(JsValue::Null, "null");
    assert_serializes!(JsValue::Undefined, "void 0");
    assert_serializes!(num(f64::NAN), "NaN");
    assert_serializes!(num(f64::INFINITY), "Infinity");
    assert_serializes!(num(f64::NEG_INFINITY), "-Infinity");
    assert_serializes!(num(-0.0), "-0");
}

#[test]
fn plain_numbers() {
    assert_serializes!(num(0.0), "0");
    assert_serializes!(num(42.0), "42");
    assert_serializes!(num(-7.25), "-7.25");
    assert_serializes!(num(3.14), "3.14");
}

#[test]
fn bigints() {
    assert_serializes!(JsValue::BigInt(BigInt::from(123)), "123n");
    assert_serializes!(JsValue::BigInt(BigInt::from(-9)), "-9n");
}

#[test]
fn strings_are_quoted_and_escaped() {
    assert_serializes!(text("hello"), "\"hello\"");
    assert_serializes!(text("line\nbreak"), "\"line\\nbreak\"");
    assert_serializes!(text("quote\"inside"), "\"quote\\\"inside\"");
}

#[test]
fn script_close_sequence_is_neutralized() {
    let code = serialize(&text("<script></script>")).unwrap();
    assert_eq!(code, "\"\\x3Cscript>\\x3C/script>\"");
    assert!(!code.contains('<'));
}

#[test]
fn empty_object_is_parenthesized() {
    assert_serializes!(obj(&[]), "({})");
}

#[test]
fn object_properties_in_insertion_order() {
    assert_serializes!(
        obj(&[("a", num(1.0)), ("b", text("x"))]),
        "({a:1,b:\"x\"})"
    );
}

#[test]
fn object_key_quoting_rules() {
    assert_serializes!(
        obj(&[
            ("a b", num(1.0)),
            ("0", num(2.0)),
            ("01", num(3.0)),
            ("_x", num(4.0)),
            ("$y", num(5.0)),
        ]),
        "({\"a b\":1,0:2,\"01\":3,_x:4,$y:5})"
    );
}

#[test]
fn proto_key_is_computed() {
    assert_serializes!(obj(&[("__proto__", num(1.0))]), "({[\"__proto__\"]:1})");
}

#[test]
fn nested_structures() {
    assert_serializes!(
        obj(&[
            ("list", arr(vec![num(1.0), num(2.0)])),
            ("inner", obj(&[("t", JsValue::Bool(true))])),
        ]),
        "({list:[1,2],inner:{t:true}})"
    );
}

#[test]
fn null_prototype_objects() {
    let bare = JsObject::with_null_proto();
    assert_serializes!(JsValue::Object(bare), "Object.create(null)");

    let seeded = JsObject::with_null_proto();
    seeded.set("a", num(1.0));
    seeded.set("b", num(2.0));
    assert_serializes!(
        JsValue::Object(seeded),
        "Object.assign(Object.create(null),{a:1,b:2})"
    );
}

#[test]
fn dates() {
    assert_serializes!(
        JsValue::Date(JsDate::from_millis(0)),
        "new Date(\"1970-01-01T00:00:00.000Z\")"
    );
    assert_serializes!(
        JsValue::Date(JsDate::from_millis(1_681_027_542_680)),
        "new Date(\"2023-04-09T08:05:42.680Z\")"
    );
}

#[test]
fn regular_expressions() {
    assert_serializes!(JsValue::RegExp(JsRegExp::new("a+", "gi")), "/a+/gi");
    assert_serializes!(JsValue::RegExp(JsRegExp::new("\\d{2}", "")), "/\\d{2}/");
}

#[test]
fn plain_errors() {
    assert_serializes!(
        JsValue::Error(JsError::new(ErrorKind::Error, "boom")),
        "new Error(\"boom\")"
    );
    assert_serializes!(
        JsValue::Error(JsError::new(ErrorKind::TypeError, "bad type")),
        "new TypeError(\"bad type\")"
    );
}

#[test]
fn error_extras_use_object_assign() {
    let err = JsError::new(ErrorKind::RangeError, "out of range");
    err.set_prop("code", num(42.0));
    assert_serializes!(
        JsValue::Error(err),
        "Object.assign(new RangeError(\"out of range\"),{code:42})"
    );
}

#[test]
fn error_stack_is_gated() {
    let err = JsError::new(ErrorKind::Error, "x");
    err.set_stack("trace");
    assert_serializes!(
        JsValue::Error(err.clone()),
        "Object.assign(new Error(\"x\"),{stack:\"trace\"})"
    );

    // With the stack feature off, the stack is simply dropped.
    let options = Options::new().disable(Feature::ERROR_PROTOTYPE_STACK);
    assert_serializes!(JsValue::Error(err), options, "new Error(\"x\")");
}

#[test]
fn aggregate_errors() {
    let err = vivify_value::JsAggregateError::new(
        vec![
            JsValue::Error(JsError::new(ErrorKind::Error, "first")),
            JsValue::Error(JsError::new(ErrorKind::Error, "second")),
        ],
        "all failed",
    );
    assert_serializes!(
        JsValue::AggregateError(err),
        "new AggregateError([new Error(\"first\"),new Error(\"second\")],\"all failed\")"
    );
}

#[test]
fn unsupported_function_is_an_error() {
    let func = JsValue::Function(vivify_value::JsFunction::new("f"));
    let err = serialize(&func).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType { .. }));
    assert!(err.to_string().contains("function"));
}
