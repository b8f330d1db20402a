//! Error types for Tessera.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::types::Type;

/// Result type used throughout Tessera.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Tessera operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating it if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a duplicate component error.
    #[must_use]
    pub fn duplicate_component(component: impl Into<String>, entity: EntityId) -> Self {
        Self::new(ErrorKind::DuplicateComponent {
            component: component.into(),
            entity,
        })
    }

    /// Creates a construction failure error.
    #[must_use]
    pub fn construction_failure(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstructionFailure {
            component: component.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unknown prefab error.
    #[must_use]
    pub fn unknown_prefab(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownPrefab(name.into()))
    }

    /// Creates a missing store error.
    #[must_use]
    pub fn missing_store(component: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingStore(component.into()))
    }

    /// Creates a store already registered error.
    #[must_use]
    pub fn store_already_registered(component: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreAlreadyRegistered(component.into()))
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(component: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField {
            component: component.into(),
            field: field.into(),
        })
    }

    /// Creates a read-only field error.
    #[must_use]
    pub fn read_only_field(component: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReadOnlyField {
            component: component.into(),
            field: field.into(),
        })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A store already holds a component for this entity.
    #[error("component {component} already exists on {entity}")]
    DuplicateComponent {
        /// The component type name.
        component: String,
        /// The entity that already has the component.
        entity: EntityId,
    },

    /// The component could not be constructed.
    #[error("could not construct component {component}: {reason}")]
    ConstructionFailure {
        /// The component type name.
        component: String,
        /// Why construction failed.
        reason: String,
    },

    /// No prefab is registered under this name.
    #[error("unknown prefab: {0}")]
    UnknownPrefab(String),

    /// No store is registered for this component type.
    #[error("no store registered for component type {0}")]
    MissingStore(String),

    /// A store is already registered for this component type.
    #[error("a store is already registered for component type {0}")]
    StoreAlreadyRegistered(String),

    /// The component has no field with this name.
    #[error("unknown field {field} on component {component}")]
    UnknownField {
        /// The component type name.
        component: String,
        /// The field name.
        field: String,
    },

    /// The field exists but cannot be written.
    #[error("field {field} on component {component} is not writable")]
    ReadOnlyField {
        /// The component type name.
        component: String,
        /// The field name.
        field: String,
    },

    /// A value does not have the type its field expects.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Component type or prefab the operation was acting on.
    pub source: Option<String>,
    /// Entity the operation was acting on.
    pub entity: Option<EntityId>,
    /// Stack of operations, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let Some(entity) = self.entity {
                write!(f, " for {entity}")?;
            }
        } else if let Some(entity) = self.entity {
            write!(f, "for {entity}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
