//! Schema definitions for component types.
//!
//! A schema is the reflection view of a component type: its name and the
//! ordered list of fields generic consumers may read and write.

use std::sync::Arc;

use tessera_foundation::Type;

/// Schema definition for a component type.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSchema {
    /// Component type name (e.g., `Position`).
    pub name: Arc<str>,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl ComponentSchema {
    /// Creates a new component schema with no fields.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the schema.
    #[must_use]
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the field schema by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Iterates the fields a template or property map may overwrite.
    pub fn propagatable_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.writable && !f.bookkeeping)
    }
}

/// Schema definition for a component field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSchema {
    /// Field name.
    pub name: Arc<str>,
    /// Field type.
    pub ty: Type,
    /// Whether generic consumers may write the field.
    pub writable: bool,
    /// Bookkeeping fields describe the component's identity rather than its
    /// state and are never overwritten by prefab propagation.
    pub bookkeeping: bool,
}

impl FieldSchema {
    /// Creates a readable, writable field.
    #[must_use]
    pub fn writable(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            writable: true,
            bookkeeping: false,
        }
    }

    /// Creates a field that can be read but not written.
    #[must_use]
    pub fn read_only(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            writable: false,
            bookkeeping: false,
        }
    }

    /// Creates a writable bookkeeping field.
    #[must_use]
    pub fn bookkeeping(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            writable: true,
            bookkeeping: true,
        }
    }
}
