//! Integration tests for Value types
//!
//! Tests Value variants, equality, conversions and property map helpers.

use std::collections::HashSet;
use std::sync::Arc;

use tessera_foundation::{
    EntityId, ErrorKind, FromValue, LtVec, PropertyMap, Type, Value, components, properties,
};

// =============================================================================
// Value Construction
// =============================================================================

#[test]
fn value_nil() {
    let v = Value::Nil;
    assert!(v.is_nil());
    assert_eq!(v.value_type(), Type::Nil);
}

#[test]
fn value_int() {
    let v = Value::from(42);
    assert_eq!(v.as_int(), Some(42));
    assert_eq!(v.as_float(), None);
    assert_eq!(v.as_number(), Some(42.0));
}

#[test]
fn value_string() {
    let v = Value::from("hello");
    assert_eq!(v.as_str(), Some("hello"));
    assert_eq!(v.value_type(), Type::String);
    assert_eq!(v, Value::String(Arc::from("hello")));
}

#[test]
fn value_entity_ref() {
    let v = Value::from(EntityId::new(9));
    assert_eq!(v.as_entity(), Some(EntityId::new(9)));
    assert_eq!(v.to_string(), "Entity(9)");
}

#[test]
fn value_from_option() {
    assert_eq!(Value::from(None::<i64>), Value::Nil);
    assert_eq!(Value::from(Some(3)), Value::Int(3));
}

#[test]
fn value_from_vec() {
    let v = Value::from(vec![1, 2, 3]);
    let items: Vec<_> = v.as_vec().unwrap().iter().cloned().collect();
    assert_eq!(items, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(v.to_string(), "[1 2 3]");
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[test]
fn int_and_float_are_distinct() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert!(Value::Int(1) < Value::Float(1.5));
}

#[test]
fn nan_equals_itself() {
    let nan = Value::Float(f64::NAN);
    assert_eq!(nan, nan.clone());
}

#[test]
fn values_hash_consistently() {
    let mut set = HashSet::new();
    set.insert(Value::from("a"));
    set.insert(Value::from("a"));
    set.insert(Value::Int(1));
    assert_eq!(set.len(), 2);
}

// =============================================================================
// FromValue
// =============================================================================

#[test]
fn from_value_promotes_int_to_float() {
    assert_eq!(f64::from_value(&Value::Int(2)).unwrap(), 2.0);
}

#[test]
fn from_value_rejects_wrong_type() {
    let err = i64::from_value(&Value::from("x")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { expected: Type::Int, .. }));
}

#[test]
fn from_value_option_accepts_nil() {
    assert_eq!(Option::<i64>::from_value(&Value::Nil).unwrap(), None);
    assert_eq!(Option::<i64>::from_value(&Value::Int(4)).unwrap(), Some(4));
}

#[test]
fn from_value_vec() {
    let v = Value::Vec(LtVec::from_iter([Value::from("a"), Value::from("b")]));
    assert_eq!(
        Vec::<String>::from_value(&v).unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
}

// =============================================================================
// Property Maps
// =============================================================================

#[test]
fn properties_helper_builds_map() {
    let props = properties([("x", 1), ("y", 2)]);
    assert_eq!(props.len(), 2);
    assert_eq!(props.get("x"), Some(&Value::Int(1)));
}

#[test]
fn components_helper_nests_maps() {
    let map = components([
        ("Position", properties([("x", 1.5)])),
        ("Tag", PropertyMap::new()),
    ]);
    assert_eq!(map.len(), 2);
    assert!(map.get("Tag").unwrap().is_empty());
    assert_eq!(map.get("Position").unwrap().get("x"), Some(&Value::Float(1.5)));
}

#[test]
fn property_maps_are_persistent() {
    let a = properties([("x", 1)]);
    let b = a.insert(Arc::from("y"), Value::Int(2));
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
}
