//! Integration tests for the storage contract
//!
//! Every test here runs against both store strategies.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_foundation::{EntityId, ErrorKind, PropertyMap, Value, properties};
use tessera_storage::{
    AssociativeStore, ComponentEvent, ComponentStorage, PoolConfig, PooledStore, Reflect, Store,
};

use crate::fixtures::{Broken, Health, Position};

fn pooled() -> PooledStore<Position> {
    PooledStore::with_config(PoolConfig::new().with_chunk_size(4)).unwrap()
}

fn associative() -> AssociativeStore<Position> {
    AssociativeStore::new()
}

fn id(n: u64) -> EntityId {
    EntityId::new(n)
}

fn check_create_then_fetch<S: ComponentStorage<Component = Position>>(mut store: S) {
    store.create(id(1), &properties([("x", 1.5)])).unwrap();
    let pos = store.get(id(1)).unwrap();
    assert_eq!(pos.x, 1.5);
    assert_eq!(pos.y, 0.0);
    assert!(store.has(id(1)));
}

fn check_duplicate_create<S: ComponentStorage<Component = Position>>(mut store: S) {
    store.create(id(1), &properties([("x", 1.0)])).unwrap();
    let err = store.create(id(1), &properties([("x", 2.0)])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateComponent { .. }));
    assert_eq!(store.get(id(1)).unwrap().x, 1.0);
    assert_eq!(store.len(), 1);
}

fn check_destroy<S: ComponentStorage<Component = Position>>(mut store: S) {
    store.create(id(1), &PropertyMap::new()).unwrap();
    store.create(id(2), &PropertyMap::new()).unwrap();
    assert!(store.destroy(id(1)));
    assert!(store.get(id(1)).is_none());
    assert!(!store.destroy(id(1)));
    assert!(!store.destroy(id(42)));
    assert_eq!(store.len(), 1);
}

fn check_bad_properties_are_skipped<S: ComponentStorage<Component = Position>>(mut store: S) {
    let props = properties([
        ("x", Value::Float(3.0)),
        ("y", Value::from("not a number")),
        ("z", Value::Int(1)),
    ]);
    let pos = store.create(id(1), &props).unwrap();
    assert_eq!(pos.x, 3.0);
    assert_eq!(pos.y, 0.0);
}

fn check_erased_matches_typed<S: ComponentStorage<Component = Position>>(mut store: S) {
    for n in 1..=20 {
        store.create(id(n), &PropertyMap::new()).unwrap();
    }
    for n in (1..=20).step_by(3) {
        store.destroy(id(n));
    }
    let mut typed = Vec::new();
    store.retain(|entity, _| {
        typed.push(entity);
        true
    });
    let erased: Vec<_> = store.cursor().map(|(entity, _)| entity).collect();
    assert_eq!(typed, erased);
    assert_eq!(erased.len(), store.len());
}

fn check_observers<S: ComponentStorage<Component = Position>>(mut store: S) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let observer = store.subscribe(Box::new(move |event: ComponentEvent, entity: EntityId, _: &dyn Reflect| {
        sink.borrow_mut().push((event, entity));
    }));

    store.create(id(1), &PropertyMap::new()).unwrap();
    store.destroy(id(1));
    assert!(store.unsubscribe(observer));
    store.create(id(2), &PropertyMap::new()).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            (ComponentEvent::Created, id(1)),
            (ComponentEvent::AboutToDestroy, id(1)),
        ]
    );
}

fn check_drop_is_silent<S: ComponentStorage<Component = Position>>(mut store: S) {
    let count = Rc::new(RefCell::new(0));
    store.create(id(1), &PropertyMap::new()).unwrap();
    let counter = Rc::clone(&count);
    store
        .observers_mut()
        .subscribe(move |_, _, _| *counter.borrow_mut() += 1);
    drop(store);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn create_then_fetch() {
    check_create_then_fetch(pooled());
    check_create_then_fetch(associative());
}

#[test]
fn duplicate_create_fails_without_change() {
    check_duplicate_create(pooled());
    check_duplicate_create(associative());
}

#[test]
fn destroy_then_fetch_is_absent() {
    check_destroy(pooled());
    check_destroy(associative());
}

#[test]
fn bad_properties_are_skipped() {
    check_bad_properties_are_skipped(pooled());
    check_bad_properties_are_skipped(associative());
}

#[test]
fn erased_and_typed_iteration_agree() {
    check_erased_matches_typed(pooled());
    check_erased_matches_typed(associative());
}

#[test]
fn observers_see_lifecycle() {
    check_observers(pooled());
    check_observers(associative());
}

#[test]
fn dropping_a_store_does_not_notify() {
    check_drop_is_silent(pooled());
    check_drop_is_silent(associative());
}

#[test]
fn read_only_fields_are_not_set_from_properties() {
    let mut store = AssociativeStore::<Health>::new();
    let health = store
        .create(id(1), &properties([("current", 5), ("max", 50)]))
        .unwrap();
    assert_eq!(health.current, 5);
    assert_eq!(health.max, 0);
}

#[test]
fn construction_failure_leaves_store_unchanged() {
    let mut pooled = PooledStore::<Broken>::new();
    let err = pooled.create(id(1), &PropertyMap::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConstructionFailure { .. }));
    assert!(pooled.is_empty());
    assert_eq!(pooled.capacity(), 0);

    let mut assoc = AssociativeStore::<Broken>::new();
    assert!(assoc.create(id(1), &PropertyMap::new()).is_err());
    assert!(!assoc.has(id(1)));
}
