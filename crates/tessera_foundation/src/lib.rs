//! Core identifiers, values, property maps and errors for Tessera.
//!
//! This crate provides:
//! - [`EntityId`] - Opaque entity identifiers
//! - [`Value`] - Generic property values exchanged with components
//! - [`Type`] - Field type descriptors used by component schemas
//! - [`PropertyMap`] / [`ComponentMap`] - Property bundles keyed by name
//! - [`Error`] - Error types with context
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod entity;
pub mod error;
pub mod types;
pub mod value;

pub use collections::{LtMap, LtVec};
pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use types::Type;
pub use value::{ComponentMap, FromValue, PropertyMap, Value, components, properties};
