//! Integration tests for error handling
//!
//! Tests error kinds, messages and context.

use tessera_foundation::{EntityId, Error, ErrorContext, ErrorKind, Type};

#[test]
fn duplicate_component_message() {
    let err = Error::duplicate_component("Position", EntityId::new(3));
    assert_eq!(err.to_string(), "component Position already exists on Entity(3)");
}

#[test]
fn missing_store_message() {
    let err = Error::missing_store("Sprite");
    assert!(matches!(err.kind, ErrorKind::MissingStore(ref name) if name == "Sprite"));
    assert!(err.to_string().contains("Sprite"));
}

#[test]
fn unknown_prefab_message() {
    let err = Error::unknown_prefab("crate");
    assert_eq!(err.to_string(), "unknown prefab: crate");
}

#[test]
fn type_mismatch_names_both_types() {
    let err = Error::type_mismatch(Type::Int, Type::String);
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch { expected: Type::Int, actual: Type::String }
    ));
    assert_eq!(err.to_string(), "type mismatch: expected int, got string");
}

#[test]
fn context_accumulates_frames() {
    let err = Error::missing_store("A")
        .with_context(ErrorContext::new().with_source("A").with_entity(EntityId::new(2)))
        .in_frame("instantiating prefab T");
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("A"));
    assert_eq!(context.entity, Some(EntityId::new(2)));
    assert_eq!(context.stack, vec!["instantiating prefab T".to_string()]);
}

#[test]
fn in_frame_creates_context() {
    let err = Error::unknown_prefab("T").in_frame("loading level");
    assert_eq!(err.context.unwrap().stack.len(), 1);
}
