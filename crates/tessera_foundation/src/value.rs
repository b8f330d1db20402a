//! Generic property values and property maps.
//!
//! Components are read and written generically through [`Value`]s. A
//! [`PropertyMap`] bundles the values for one component by field name, and a
//! [`ComponentMap`] bundles property maps by component type name.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::{LtMap, LtVec};
use crate::entity::EntityId;
use crate::error::{Error, Result};
use crate::types::Type;

/// Field name → value for a single component.
pub type PropertyMap = LtMap<Arc<str>, Value>;

/// Component type name → initial property map.
pub type ComponentMap = LtMap<Arc<str>, PropertyMap>;

/// Builds a [`PropertyMap`] from name/value pairs.
pub fn properties<K, V, I>(pairs: I) -> PropertyMap
where
    K: Into<Arc<str>>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Builds a [`ComponentMap`] from type-name/property-map pairs.
pub fn components<K, I>(pairs: I) -> ComponentMap
where
    K: Into<Arc<str>>,
    I: IntoIterator<Item = (K, PropertyMap)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Generic property value.
///
/// Values are immutable and cheaply cloneable; composite values use
/// structural sharing.
#[derive(Clone)]
pub enum Value {
    /// The nil value (represents absence).
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Entity reference.
    EntityRef(EntityId),
    /// Persistent vector.
    Vec(LtVec<Value>),
    /// Nested property map.
    Map(PropertyMap),
}

impl Value {
    /// Returns the type of this value.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::EntityRef(_) => Type::EntityRef,
            Self::Vec(_) => Type::vec(Type::Any),
            Self::Map(_) => Type::map(Type::Any),
        }
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an entity ID.
    #[must_use]
    pub const fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Attempts to extract a vector reference.
    #[must_use]
    pub const fn as_vec(&self) -> Option<&LtVec<Value>> {
        match self {
            Self::Vec(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract a property map reference.
    #[must_use]
    pub const fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Converts this value to the form a field of type `ty` stores.
    ///
    /// Returns `None` if `ty` does not accept this value. Integers written to
    /// float fields come back as floats, so the result compares equal to what
    /// the field reads back after the write.
    #[must_use]
    pub fn conform_to(&self, ty: &Type) -> Option<Value> {
        if !ty.accepts(&self.value_type()) {
            return None;
        }
        match (ty, self) {
            (Type::Float, Self::Int(_)) => self.as_number().map(Self::Float),
            (Type::Option(inner), _) if !self.is_nil() => self.conform_to(inner),
            _ => Some(self.clone()),
        }
    }
}

// Bit equality on floats keeps Eq reflexive and consistent with Hash.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::EntityRef(a), Self::EntityRef(b)) => a == b,
            (Self::Vec(a), Self::Vec(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::EntityRef(id) => id.hash(state),
            Self::Vec(v) => v.hash(state),
            Self::Map(m) => m.hash(state),
        }
    }
}

impl PartialOrd for Value {
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Nil, Self::Nil) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::EntityRef(a), Self::EntityRef(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::EntityRef(id) => write!(f, "{id:?}"),
            Self::Vec(v) => write!(f, "{v:?}"),
            Self::Map(m) => write!(f, "{m:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::EntityRef(id) => write!(f, "{id}"),
            Self::Vec(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Self::EntityRef(id)
    }
}

impl From<PropertyMap> for Value {
    fn from(m: PropertyMap) -> Self {
        Self::Map(m)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Vec(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

/// Conversion from a [`Value`] back into a concrete field type.
///
/// The inverse of the `From` conversions above; used when writing a generic
/// value into a typed component field.
pub trait FromValue: Sized {
    /// The field type this conversion expects.
    fn expected_type() -> Type;

    /// Converts the value, or returns `None` if it has the wrong shape.
    fn from_value_opt(value: &Value) -> Option<Self>;

    /// Converts the value, reporting a type mismatch on failure.
    ///
    /// # Errors
    ///
    /// Returns a `TypeMismatch` error if the value has the wrong type.
    fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_opt(value)
            .ok_or_else(|| Error::type_mismatch(Self::expected_type(), value.value_type()))
    }
}

impl FromValue for Value {
    fn expected_type() -> Type {
        Type::Any
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn expected_type() -> Type {
        Type::Bool
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn expected_type() -> Type {
        Type::Int
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for i32 {
    fn expected_type() -> Type {
        Type::Int
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| i32::try_from(n).ok())
    }
}

impl FromValue for u32 {
    fn expected_type() -> Type {
        Type::Int
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_int().and_then(|n| u32::try_from(n).ok())
    }
}

impl FromValue for f64 {
    fn expected_type() -> Type {
        Type::Float
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_number()
    }
}

impl FromValue for f32 {
    fn expected_type() -> Type {
        Type::Float
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_number().map(|n| n as f32)
    }
}

impl FromValue for String {
    fn expected_type() -> Type {
        Type::String
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromValue for Arc<str> {
    fn expected_type() -> Type {
        Type::String
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Arc::clone(s)),
            _ => None,
        }
    }
}

impl FromValue for EntityId {
    fn expected_type() -> Type {
        Type::EntityRef
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_entity()
    }
}

impl FromValue for PropertyMap {
    fn expected_type() -> Type {
        Type::map(Type::Any)
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_map().cloned()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn expected_type() -> Type {
        Type::option(T::expected_type())
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        if value.is_nil() {
            Some(None)
        } else {
            T::from_value_opt(value).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn expected_type() -> Type {
        Type::vec(T::expected_type())
    }

    fn from_value_opt(value: &Value) -> Option<Self> {
        value.as_vec()?.iter().map(T::from_value_opt).collect()
    }
}
