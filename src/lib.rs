//! Tessera - Entity-component framework with pluggable storage
//!
//! This crate re-exports all layers of the Tessera system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tessera_prefab       Prefab templates, instancing, propagation
//! Layer 1: tessera_storage      Storage contract, pooled/associative stores,
//!                               reflection, observers, entity manager
//! Layer 0: tessera_foundation   Core types (EntityId, Value, Type, Error)
//! ```

pub use tessera_foundation as foundation;
pub use tessera_prefab as prefab;
pub use tessera_storage as storage;
