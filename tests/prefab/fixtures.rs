//! A small world shared by the prefab tests.

use tessera_foundation::{ComponentMap, Type, Value, components, properties};
use tessera_prefab::PrefabSystem;
use tessera_storage::{AssociativeStore, EntityManager, PoolConfig, PooledStore, reflect_component};

#[derive(Debug, Default)]
pub struct Transform {
    pub x: i64,
    pub y: i64,
}

reflect_component! {
    Transform as "Transform" {
        x: Type::Int,
        y: Type::Int,
    }
}

#[derive(Debug, Default)]
pub struct Sprite {
    pub image: String,
    pub layer: i64,
}

reflect_component! {
    Sprite as "Sprite" {
        image: Type::String,
        layer: Type::Int,
    }
}

#[derive(Debug, Default)]
pub struct Collider {
    pub radius: f64,
    pub name: String,
}

reflect_component! {
    Collider as "Collider" {
        radius: Type::Float,
    }
    bookkeeping {
        name: Type::String,
    }
}

pub fn world() -> (PrefabSystem, EntityManager) {
    let mut em = EntityManager::new();
    let config = PoolConfig::new().with_chunk_size(16);
    em.register(PooledStore::<Transform>::with_config(config).unwrap())
        .unwrap();
    em.register(PooledStore::<Sprite>::with_config(config).unwrap())
        .unwrap();
    em.register(AssociativeStore::<Collider>::new()).unwrap();
    PrefabSystem::install(&mut em).unwrap();
    (PrefabSystem::new(), em)
}

pub fn tree() -> ComponentMap {
    components([
        ("Transform", properties([("x", 0), ("y", 0)])),
        (
            "Sprite",
            properties([("image", Value::from("tree.png")), ("layer", Value::Int(1))]),
        ),
    ])
}
