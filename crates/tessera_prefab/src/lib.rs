//! Prefab templates for Tessera.
//!
//! This crate provides:
//! - [`Prefab`] - A named bundle of component types with initial properties
//! - [`PrefabInstance`] - The component marking an entity as built from a prefab
//! - [`PrefabSystem`] - Template table, instancing and change propagation
//! - [`PropagationReport`] - What a propagating update changed

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod prefab;
pub mod report;
pub mod system;

pub use prefab::{Prefab, PrefabInstance};
pub use report::PropagationReport;
pub use system::PrefabSystem;
