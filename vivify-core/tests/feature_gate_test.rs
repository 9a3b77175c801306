// vivify-core - Feature gate behavior tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

// Two sides of the gate: the parser refuses types whose feature is off,
// the emitter downgrades syntax when an optional feature is off.

mod common;
use common::*;

use num_bigint::BigInt;
use vivify_value::{
    ErrorKind, JsAggregateError, JsError, JsIterable, JsMap, JsPromise, JsSet, JsTypedArray,
    TypedArrayKind,
};

fn without(feature: Feature) -> Options {
    Options::new().disable(feature)
}

// ----------------------------------------------------------------------
// Parser refusals
// ----------------------------------------------------------------------

#[test]
fn disabled_types_are_refused() {
    let cases: Vec<(JsValue, Feature)> = vec![
        (JsValue::Map(JsMap::new()), Feature::MAP),
        (JsValue::Set(JsSet::new()), Feature::SET),
        (
            JsValue::Promise(JsPromise::resolved(JsValue::Null)),
            Feature::PROMISE,
        ),
        (JsValue::BigInt(BigInt::from(1)), Feature::BIGINT),
        (
            JsValue::TypedArray(JsTypedArray::new(TypedArrayKind::Uint8Array, vec![])),
            Feature::TYPED_ARRAY,
        ),
        (
            JsValue::AggregateError(JsAggregateError::new(vec![], "x")),
            Feature::AGGREGATE_ERROR,
        ),
        (
            JsValue::Iterable(JsIterable::from_values(vec![])),
            Feature::SYMBOL,
        ),
    ];
    for (value, feature) in cases {
        let err = serialize_with(&value, &without(feature)).unwrap_err();
        assert!(
            matches!(err, Error::FeatureMissing { .. }),
            "expected FeatureMissing for {:?}",
            err
        );
    }
}

#[test]
fn bigint_typed_arrays_need_both_flags() {
    let array = JsValue::BigIntTypedArray(vivify_value::JsBigIntTypedArray::new(
        vivify_value::BigIntTypedArrayKind::BigInt64Array,
        vec![BigInt::from(1)],
    ));
    assert!(serialize_with(&array, &without(Feature::BIGINT)).is_err());
    assert!(serialize_with(&array, &without(Feature::BIGINT_TYPED_ARRAY)).is_err());
    assert!(serialize(&array).is_ok());
}

// ----------------------------------------------------------------------
// Emitter downgrades
// ----------------------------------------------------------------------

#[test]
fn no_arrow_functions_downgrades_the_closure() {
    let a = JsObject::new();
    a.set("self", JsValue::Object(a.clone()));
    assert_serializes!(
        JsValue::Object(a),
        without(Feature::ARROW_FUNCTION),
        "(function(v0){return v0={},v0.self=v0,v0})()"
    );
}

#[test]
fn no_object_assign_decorates_errors_through_patches() {
    let err = JsError::new(ErrorKind::Error, "x");
    err.set_prop("code", num(1.0));
    assert_serializes!(
        JsValue::Error(err),
        without(Feature::OBJECT_ASSIGN),
        "((v0)=>(v0=new Error(\"x\"),v0.code=1,v0))()"
    );
}

#[test]
fn no_object_assign_populates_null_prototypes_through_patches() {
    let bare = JsObject::with_null_proto();
    bare.set("a", num(1.0));
    bare.set("weird key", num(2.0));
    assert_serializes!(
        JsValue::Object(bare),
        without(Feature::OBJECT_ASSIGN),
        "((v0)=>(v0=Object.create(null),v0.a=1,v0[\"weird key\"]=2,v0))()"
    );
}

#[test]
fn promise_deferral_downgrades_without_arrows() {
    let outer = JsObject::new();
    outer.set(
        "p",
        JsValue::Promise(JsPromise::resolved(JsValue::Object(outer.clone()))),
    );
    assert_serializes!(
        JsValue::Object(outer),
        without(Feature::ARROW_FUNCTION),
        "(function(v0){return v0={p:Promise.resolve().then(function(){return v0})}})()"
    );
}

// ----------------------------------------------------------------------
// Iterable syntax selection
// ----------------------------------------------------------------------

#[test]
fn iterable_uses_values_and_arrows_by_default() {
    let iter = JsIterable::from_values(vec![num(1.0)]);
    assert_serializes!(
        JsValue::Iterable(iter),
        "({[Symbol.iterator]:()=>[1].values()})"
    );
}

#[test]
fn iterable_without_array_values_builds_an_iterator() {
    let iter = JsIterable::from_values(vec![num(1.0)]);
    assert_serializes!(
        JsValue::Iterable(iter),
        without(Feature::ARRAY_PROTOTYPE_VALUES),
        "({[Symbol.iterator]:()=>((s,i)=>({next:()=>({done:i>=s.length,value:s[i++]})}))([1],0)})"
    );
}

#[test]
fn iterable_without_arrows_uses_method_shorthand() {
    let iter = JsIterable::from_values(vec![num(1.0)]);
    assert_serializes!(
        JsValue::Iterable(iter),
        without(Feature::ARROW_FUNCTION),
        "({[Symbol.iterator](){return [1].values()}})"
    );
}

#[test]
fn iterable_with_neither_falls_back_to_function_expressions() {
    let iter = JsIterable::from_values(vec![num(1.0)]);
    assert_serializes!(
        JsValue::Iterable(iter),
        without(Feature::ARROW_FUNCTION | Feature::METHOD_SHORTHAND),
        "({[Symbol.iterator]:function(){return [1].values()}})"
    );
}

#[test]
fn form_data_downgrades_without_arrows() {
    let form = vivify_value::JsFormData::new();
    form.append_text("k", "v");
    assert_serializes!(
        JsValue::FormData(form),
        without(Feature::ARROW_FUNCTION),
        "(function(f){return f.append(\"k\",\"v\"),f})(new FormData())"
    );
}

#[test]
fn masks_compose() {
    let options = Options::new()
        .disable(Feature::MAP)
        .disable(Feature::SET);
    assert!(serialize_with(&JsValue::Map(JsMap::new()), &options).is_err());
    assert!(serialize_with(&JsValue::Set(JsSet::new()), &options).is_err());
    assert!(serialize_with(&num(1.0), &options).is_ok());
}
