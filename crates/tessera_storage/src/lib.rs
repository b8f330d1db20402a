//! Component storage for Tessera.
//!
//! This crate provides:
//! - [`Reflect`] / [`Component`] - The reflection contract components implement
//! - [`ComponentStorage`] / [`Store`] - Typed and type-erased storage contracts
//! - [`PooledStore`] - Chunked, slot-recycling storage
//! - [`AssociativeStore`] - Ordered map storage
//! - [`EntityManager`] - Directory from component type name to store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod associative;
pub mod config;
pub mod cursor;
pub mod manager;
pub mod observer;
pub mod pooled;
pub mod reflect;
pub mod schema;
pub mod storage;

pub use associative::AssociativeStore;
pub use config::PoolConfig;
pub use cursor::{Cursor, RawCursor};
pub use manager::EntityManager;
pub use observer::{ComponentEvent, ObserverId, Observers};
pub use pooled::{PooledStore, SlotCursor};
pub use reflect::{Component, Reflect, apply_properties, snapshot};
pub use schema::{ComponentSchema, FieldSchema};
pub use storage::{ComponentStorage, Store};

// Re-exported for `reflect_component!` expansions.
#[doc(hidden)]
pub use tessera_foundation as foundation;
