// vivify-core - Reference registry integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

// Registration goes through the thread-local default registry; every
// test runs on its own thread, so keys never collide across tests.

mod common;
use common::*;

use vivify_core::{lookup_by_key, lookup_by_value, register};
use vivify_value::{JsFunction, JsSymbol, WellKnownSymbol};

#[test]
fn registered_functions_serialize_as_lookups() {
    let func = JsValue::Function(JsFunction::new("callback"));
    register("app/cb", func.clone()).unwrap();
    assert_serializes!(func, "$R.get(\"app/cb\")");
}

#[test]
fn registered_values_shared_twice_are_hoisted() {
    let func = JsValue::Function(JsFunction::new("f"));
    register("app/f", func.clone()).unwrap();
    assert_serializes!(
        arr(vec![func.clone(), func]),
        "((v1)=>([v1=$R.get(\"app/f\"),v1]))()"
    );
}

#[test]
fn registered_containers_stay_opaque() {
    // A registered object is carried by name, never decomposed.
    let value = obj(&[("secret", num(1.0))]);
    register("app/config", value.clone()).unwrap();
    assert_serializes!(value, "$R.get(\"app/config\")");
}

#[test]
fn registry_keys_are_escaped_in_output() {
    let func = JsValue::Function(JsFunction::new("weird"));
    register("key\"with\\quotes", func.clone()).unwrap();
    assert_serializes!(func, "$R.get(\"key\\\"with\\\\quotes\")");
}

#[test]
fn lookup_round_trip() {
    let func = JsValue::Function(JsFunction::new("roundtrip"));
    register("app/rt", func.clone()).unwrap();
    assert_eq!(lookup_by_value(&func).as_deref(), Some("app/rt"));
    assert!(lookup_by_key("app/rt").is_some());
    assert!(lookup_by_key("app/missing").is_none());
}

#[test]
fn duplicate_keys_are_rejected() {
    register("dup", JsValue::Function(JsFunction::new("a"))).unwrap();
    let err = register("dup", JsValue::Function(JsFunction::new("b"))).unwrap_err();
    assert!(matches!(err, Error::DuplicateReference(_)));
}

#[test]
fn unregistered_functions_and_symbols_fail() {
    let func = JsValue::Function(JsFunction::new("anon"));
    assert!(matches!(
        serialize(&func).unwrap_err(),
        Error::UnsupportedType { .. }
    ));

    let symbol = JsValue::Symbol(JsSymbol::custom(Some("local")));
    assert!(matches!(
        serialize(&symbol).unwrap_err(),
        Error::UnsupportedType { .. }
    ));
}

#[test]
fn registered_custom_symbols_serialize() {
    let symbol = JsValue::Symbol(JsSymbol::custom(Some("app")));
    register("sym/app", symbol.clone()).unwrap();
    assert_serializes!(symbol, "$R.get(\"sym/app\")");
}

#[test]
fn well_known_symbols_need_no_registration() {
    assert_serializes!(
        JsValue::Symbol(JsSymbol::WellKnown(WellKnownSymbol::Iterator)),
        "Symbol.iterator"
    );
    assert_serializes!(
        JsValue::Symbol(JsSymbol::WellKnown(WellKnownSymbol::AsyncIterator)),
        "Symbol.asyncIterator"
    );
}

#[test]
fn shared_well_known_symbol_is_interned_once() {
    let sym = JsValue::Symbol(JsSymbol::WellKnown(WellKnownSymbol::ToStringTag));
    assert_serializes!(
        arr(vec![sym.clone(), sym]),
        "((v1)=>([v1=Symbol.toStringTag,v1]))()"
    );
}
