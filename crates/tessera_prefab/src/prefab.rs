//! Template and instance types.

use std::sync::Arc;

use tessera_foundation::{ComponentMap, PropertyMap, Type};
use tessera_storage::reflect_component;

/// A named template: component types with their initial properties, plus
/// the parameter fields propagation must leave alone.
#[derive(Clone, Debug, PartialEq)]
pub struct Prefab {
    path: Arc<str>,
    components: ComponentMap,
    parameters: Vec<Arc<str>>,
}

impl Prefab {
    /// Creates a template.
    #[must_use]
    pub fn new(
        path: impl Into<Arc<str>>,
        components: ComponentMap,
        parameters: Vec<Arc<str>>,
    ) -> Self {
        Self {
            path: path.into(),
            components,
            parameters,
        }
    }

    /// Returns the template's name.
    #[must_use]
    pub fn path(&self) -> &Arc<str> {
        &self.path
    }

    /// Returns the component types and their initial properties.
    #[must_use]
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    /// Returns the initial properties for one component type.
    #[must_use]
    pub fn component(&self, type_name: &str) -> Option<&PropertyMap> {
        self.components.get(type_name)
    }

    /// Returns the parameter field names.
    #[must_use]
    pub fn parameters(&self) -> &[Arc<str>] {
        &self.parameters
    }

    /// Returns true if `field` is a parameter, exempt from propagation.
    #[must_use]
    pub fn is_parameter(&self, field: &str) -> bool {
        self.parameters.iter().any(|p| &**p == field)
    }

    pub(crate) fn set_components(&mut self, components: ComponentMap) {
        self.components = components;
    }
}

/// Marks an entity as an instance of a prefab.
///
/// Holds the template's name, resolved through the
/// [`PrefabSystem`](crate::PrefabSystem) that created it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefabInstance {
    prefab: Arc<str>,
}

impl PrefabInstance {
    /// Creates an instance marker for the named template.
    #[must_use]
    pub fn new(prefab: impl Into<Arc<str>>) -> Self {
        Self {
            prefab: prefab.into(),
        }
    }

    /// Returns the template name.
    #[must_use]
    pub fn prefab(&self) -> &str {
        &self.prefab
    }
}

reflect_component! {
    PrefabInstance as "PrefabInstance" {}
    bookkeeping {
        prefab: Type::String,
    }
}
