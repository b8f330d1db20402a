//! The reflection contract components implement.
//!
//! Stores and the prefab layer never look at concrete component fields.
//! They construct components through [`Component::construct`], and read or
//! write fields by name through [`Reflect`], guided by the type's
//! [`ComponentSchema`].

use std::any::Any;

use tessera_foundation::{PropertyMap, Result, Value};
use tracing::warn;

use crate::schema::ComponentSchema;

/// Object-safe field access by name.
pub trait Reflect: Any {
    /// Reads a field, or `None` if the component has no such field.
    fn read_field(&self, field: &str) -> Option<Value>;

    /// Writes a field.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField`, `ReadOnlyField` or `TypeMismatch` if the value
    /// cannot be written. The component is unchanged on error.
    fn write_field(&mut self, field: &str, value: Value) -> Result<()>;

    /// Returns this component as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns this component as mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A concrete component type a store can hold.
pub trait Component: Reflect + Sized {
    /// Name under which stores of this type are registered.
    fn type_name() -> &'static str;

    /// Describes the type's fields.
    fn schema() -> ComponentSchema;

    /// Constructs a default instance.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailure` if the type cannot be default-constructed.
    fn construct() -> Result<Self>;
}

/// Applies each entry of `props` to the matching writable field.
///
/// Entries naming an unknown or read-only field, or carrying a value the
/// field's [`Type`](tessera_foundation::Type) does not accept, are skipped
/// with a warning. Returns the number of fields written.
pub fn apply_properties(
    component: &mut dyn Reflect,
    schema: &ComponentSchema,
    props: &PropertyMap,
) -> usize {
    let mut written = 0;
    for (name, value) in props.iter() {
        match schema.field(name) {
            None => {
                warn!(component = %schema.name, field = %name, "ignoring unknown property");
            }
            Some(field) if !field.writable => {
                warn!(component = %schema.name, field = %name, "ignoring non-writable property");
            }
            Some(field) => {
                let Some(value) = value.conform_to(&field.ty) else {
                    warn!(
                        component = %schema.name,
                        field = %name,
                        expected = %field.ty,
                        actual = %value.value_type(),
                        "ignoring mistyped property"
                    );
                    continue;
                };
                match component.write_field(name, value) {
                    Ok(()) => written += 1,
                    Err(err) => {
                        warn!(component = %schema.name, field = %name, error = %err, "could not set property");
                    }
                }
            }
        }
    }
    written
}

/// Reads every field in `schema` into a property map.
#[must_use]
pub fn snapshot(component: &dyn Reflect, schema: &ComponentSchema) -> PropertyMap {
    schema
        .fields
        .iter()
        .filter_map(|f| Some((f.name.clone(), component.read_field(&f.name)?)))
        .collect()
}

/// Implements [`Reflect`] and [`Component`] for a plain struct.
///
/// Listed fields are readable and writable. Fields in an optional
/// `read_only { .. }` block can only be read, and fields in a
/// `bookkeeping { .. }` block are writable but never propagated. Every field
/// type must convert to [`Value`] via `From` and back via `FromValue`; the
/// struct must implement `Default`.
///
/// ```ignore
/// #[derive(Default)]
/// struct Position { x: f64, y: f64 }
///
/// reflect_component! {
///     Position as "Position" {
///         x: Type::Float,
///         y: Type::Float,
///     }
/// }
/// ```
#[macro_export]
macro_rules! reflect_component {
    (
        $ty:ident as $name:literal {
            $( $field:ident : $fty:expr ),* $(,)?
        }
        $( read_only { $( $ro:ident : $roty:expr ),* $(,)? } )?
        $( bookkeeping { $( $bk:ident : $bkty:expr ),* $(,)? } )?
    ) => {
        impl $crate::Reflect for $ty {
            fn read_field(&self, field: &str) -> ::std::option::Option<$crate::foundation::Value> {
                match field {
                    $( stringify!($field) => ::std::option::Option::Some(
                        $crate::foundation::Value::from(::std::clone::Clone::clone(&self.$field)),
                    ), )*
                    $($( stringify!($ro) => ::std::option::Option::Some(
                        $crate::foundation::Value::from(::std::clone::Clone::clone(&self.$ro)),
                    ), )*)?
                    $($( stringify!($bk) => ::std::option::Option::Some(
                        $crate::foundation::Value::from(::std::clone::Clone::clone(&self.$bk)),
                    ), )*)?
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn write_field(
                &mut self,
                field: &str,
                value: $crate::foundation::Value,
            ) -> $crate::foundation::Result<()> {
                match field {
                    $( stringify!($field) => {
                        self.$field = $crate::foundation::FromValue::from_value(&value)?;
                        ::std::result::Result::Ok(())
                    } )*
                    $($( stringify!($bk) => {
                        self.$bk = $crate::foundation::FromValue::from_value(&value)?;
                        ::std::result::Result::Ok(())
                    } )*)?
                    $($( stringify!($ro) => ::std::result::Result::Err(
                        $crate::foundation::Error::read_only_field($name, field),
                    ), )*)?
                    _ => ::std::result::Result::Err(
                        $crate::foundation::Error::unknown_field($name, field),
                    ),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::Component for $ty {
            fn type_name() -> &'static str {
                $name
            }

            fn schema() -> $crate::ComponentSchema {
                $crate::ComponentSchema::new($name)
                    $($( .with_field($crate::FieldSchema::bookkeeping(stringify!($bk), $bkty)) )*)?
                    $( .with_field($crate::FieldSchema::writable(stringify!($field), $fty)) )*
                    $($( .with_field($crate::FieldSchema::read_only(stringify!($ro), $roty)) )*)?
            }

            fn construct() -> $crate::foundation::Result<Self> {
                ::std::result::Result::Ok(<$ty as ::std::default::Default>::default())
            }
        }
    };
}
