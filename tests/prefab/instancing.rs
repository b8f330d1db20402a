//! Integration tests for prefab instancing

use tessera_foundation::{EntityId, ErrorKind, PropertyMap};
use tessera_prefab::PrefabInstance;

use crate::fixtures::{Sprite, Transform, tree, world};

#[test]
fn instances_share_template_values() {
    let (mut prefabs, mut em) = world();
    prefabs.add_prefab("tree", tree(), ["x", "y"]);

    for n in 1..=3 {
        prefabs.instantiate(&mut em, "tree", EntityId::new(n)).unwrap();
    }

    assert_eq!(prefabs.instances_of(&em, "tree").len(), 3);
    for n in 1..=3 {
        let sprite = em.component::<Sprite>(EntityId::new(n)).unwrap();
        assert_eq!(sprite.image, "tree.png");
        assert_eq!(sprite.layer, 1);
    }
}

#[test]
fn instance_marker_names_template() {
    let (mut prefabs, mut em) = world();
    prefabs.add_prefab("tree", tree(), ["x"]);
    let e = EntityId::new(10);
    prefabs.instantiate(&mut em, "tree", e).unwrap();

    assert_eq!(em.component::<PrefabInstance>(e).unwrap().prefab(), "tree");
    let prefab = prefabs.instance_prefab(&em, e).unwrap();
    assert!(prefab.is_parameter("x"));
    assert!(prefabs.instance_prefab(&em, EntityId::new(11)).is_none());
}

#[test]
fn unknown_template_leaves_entity_empty() {
    let (prefabs, mut em) = world();
    let e = EntityId::new(1);
    let err = prefabs.instantiate(&mut em, "rock", e).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownPrefab(_)));
    assert!(em.components_of(e).is_empty());
}

#[test]
fn failed_instantiation_is_undone() {
    let (mut prefabs, mut em) = world();
    prefabs.add_prefab("tree", tree(), ["x"]);
    let e = EntityId::new(1);
    em.create_component("Transform", e, &PropertyMap::new()).unwrap();

    let err = prefabs.instantiate(&mut em, "tree", e).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateComponent { .. }));
    assert!(em.component::<Sprite>(e).is_none());
    assert!(em.component::<PrefabInstance>(e).is_none());
    assert!(em.component::<Transform>(e).is_some());
}

#[test]
fn instantiate_without_installed_store_fails() {
    let (mut prefabs, _) = world();
    let mut bare = tessera_storage::EntityManager::new();
    prefabs.add_prefab("tree", tree(), ["x"]);
    let err = prefabs
        .instantiate(&mut bare, "tree", EntityId::new(1))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingStore(_)));
}
