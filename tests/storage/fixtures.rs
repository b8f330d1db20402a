//! Component types shared by the storage tests.

use tessera_foundation::{Error, Result, Type, Value};
use tessera_storage::{Component, ComponentSchema, FieldSchema, Reflect, reflect_component};

use std::any::Any;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

reflect_component! {
    Position as "Position" {
        x: Type::Float,
        y: Type::Float,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Health {
    pub current: i64,
    pub max: i64,
}

reflect_component! {
    Health as "Health" {
        current: Type::Int,
    }
    read_only {
        max: Type::Int,
    }
}

/// A component whose construction always fails.
#[derive(Debug)]
pub struct Broken;

impl Reflect for Broken {
    fn read_field(&self, _field: &str) -> Option<Value> {
        None
    }

    fn write_field(&mut self, field: &str, _value: Value) -> Result<()> {
        Err(Error::unknown_field("Broken", field))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Component for Broken {
    fn type_name() -> &'static str {
        "Broken"
    }

    fn schema() -> ComponentSchema {
        ComponentSchema::new("Broken").with_field(FieldSchema::writable("n", Type::Int))
    }

    fn construct() -> Result<Self> {
        Err(Error::construction_failure("Broken", "no default value"))
    }
}
