//! Type descriptors for component fields.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type descriptor for a component field.
///
/// Component schemas describe each field with one. `apply_properties` and
/// prefab propagation check incoming values against it with
/// [`Type::accepts`] before writing.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The nil type (only value: nil).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Entity reference type.
    EntityRef,
    /// Homogeneous vector type.
    Vec(Box<Type>),
    /// Property map with homogeneous values.
    Map(Box<Type>),
    /// Optional type (value or nil).
    Option(Box<Type>),
    /// Any type (accepts any value).
    Any,
}

impl Type {
    /// Creates a vector type with the given element type.
    #[must_use]
    pub fn vec(element: Type) -> Self {
        Self::Vec(Box::new(element))
    }

    /// Creates a map type with the given value type.
    #[must_use]
    pub fn map(value: Type) -> Self {
        Self::Map(Box::new(value))
    }

    /// Creates an optional type.
    #[must_use]
    pub fn option(inner: Type) -> Self {
        Self::Option(Box::new(inner))
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Checks if a value type is accepted by this type.
    ///
    /// - `Any` accepts all types
    /// - `Option(T)` accepts `Nil` and any type that `T` accepts
    /// - `Float` accepts `Int` (numeric promotion)
    /// - Collection types check element types recursively, treating a runtime
    ///   element type of `Any` as compatible
    #[must_use]
    pub fn accepts(&self, value_type: &Type) -> bool {
        if matches!(self, Self::Any) {
            return true;
        }

        if let Self::Option(inner) = self {
            return matches!(value_type, Self::Nil) || inner.accepts(value_type);
        }

        match (self, value_type) {
            (Self::Nil, Self::Nil)
            | (Self::Bool, Self::Bool)
            | (Self::Int | Self::Float, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::String, Self::String)
            | (Self::EntityRef, Self::EntityRef) => true,

            (Self::Vec(expected), Self::Vec(actual)) | (Self::Map(expected), Self::Map(actual)) => {
                actual.is_any() || expected.accepts(actual)
            }

            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::EntityRef => write!(f, "entity-ref"),
            Self::Vec(t) => write!(f, "vec<{t:?}>"),
            Self::Map(t) => write!(f, "map<{t:?}>"),
            Self::Option(t) => write!(f, "option<{t:?}>"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
