//! Integration tests for associative storage

use tessera_foundation::{EntityId, PropertyMap, properties};
use tessera_storage::{AssociativeStore, ComponentStorage, Store};

use crate::fixtures::Position;

#[test]
fn sparse_ids_iterate_in_order() {
    let mut store = AssociativeStore::<Position>::new();
    for n in [1_000_000, 7, 42, 3] {
        store
            .create(EntityId::new(n), &properties([("x", n as f64)]))
            .unwrap();
    }
    let ids: Vec<_> = store.entities().into_iter().map(EntityId::raw).collect();
    assert_eq!(ids, vec![3, 7, 42, 1_000_000]);
}

#[test]
fn iter_mut_then_erased_read() {
    let mut store = AssociativeStore::<Position>::new();
    for n in 1..=3 {
        store.create(EntityId::new(n), &PropertyMap::new()).unwrap();
    }
    for (entity, pos) in store.iter_mut() {
        pos.y = entity.raw() as f64 * 2.0;
    }
    let ys: Vec<_> = store
        .cursor()
        .filter_map(|(_, c)| c.read_field("y")?.as_float())
        .collect();
    assert_eq!(ys, vec![2.0, 4.0, 6.0]);
}

#[test]
fn clear_empties_store() {
    let mut store = AssociativeStore::<Position>::new();
    store.create(EntityId::new(1), &PropertyMap::new()).unwrap();
    store.clear();
    assert!(store.is_empty());
    assert!(store.cursor().is_end());
}
