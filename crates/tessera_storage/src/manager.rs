//! Directory from component type name to the store that owns it.
//!
//! The manager owns the stores but not their layout: everything goes through
//! the type-erased [`Store`] contract, so pooled and associative stores sit
//! side by side.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tessera_foundation::{EntityId, Error, PropertyMap, Result};
use tracing::{debug, trace};

use crate::reflect::{Component, Reflect};
use crate::storage::{ComponentStorage, Store};

/// Registry of component stores keyed by component type name.
#[derive(Default)]
pub struct EntityManager {
    stores: BTreeMap<Arc<str>, Box<dyn Store>>,
}

impl EntityManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a store under its component type name.
    ///
    /// # Errors
    ///
    /// Returns `StoreAlreadyRegistered` if the name is taken.
    pub fn register<S: Store>(&mut self, store: S) -> Result<()> {
        let name: Arc<str> = Arc::from(store.type_name());
        self.insert(name, Box::new(store))
    }

    /// Registers a store under an explicit name.
    ///
    /// # Errors
    ///
    /// Returns `StoreAlreadyRegistered` if the name is taken.
    pub fn register_as<S: Store>(&mut self, name: impl Into<Arc<str>>, store: S) -> Result<()> {
        self.insert(name.into(), Box::new(store))
    }

    fn insert(&mut self, name: Arc<str>, store: Box<dyn Store>) -> Result<()> {
        if self.stores.contains_key(&name) {
            return Err(Error::store_already_registered(&*name));
        }
        debug!(store = %name, "registered store");
        self.stores.insert(name, store);
        Ok(())
    }

    /// Removes and returns the store registered under `name`.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn Store>> {
        let store = self.stores.remove(name)?;
        debug!(store = name, "unregistered store");
        Some(store)
    }

    /// Returns the store registered under `name`.
    #[must_use]
    pub fn store(&self, name: &str) -> Option<&dyn Store> {
        self.stores.get(name).map(|s| &**s)
    }

    /// Returns the store registered under `name` mutably.
    pub fn store_mut(&mut self, name: &str) -> Option<&mut dyn Store> {
        match self.stores.get_mut(name) {
            Some(store) => Some(&mut **store),
            None => None,
        }
    }

    /// Returns the first registered store of concrete type `S`.
    #[must_use]
    pub fn typed_store<S: ComponentStorage>(&self) -> Option<&S> {
        self.stores
            .values()
            .find_map(|s| s.as_any().downcast_ref::<S>())
    }

    /// Returns the first registered store of concrete type `S` mutably.
    pub fn typed_store_mut<S: ComponentStorage>(&mut self) -> Option<&mut S> {
        self.stores
            .values_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<S>())
    }

    /// Returns the `C` component of `id`, looked up by `C`'s type name.
    #[must_use]
    pub fn component<C: Component>(&self, id: EntityId) -> Option<&C> {
        self.store(C::type_name())?
            .component(id)?
            .as_any()
            .downcast_ref::<C>()
    }

    /// Returns the `C` component of `id` mutably.
    pub fn component_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        self.store_mut(C::type_name())?
            .component_mut(id)?
            .as_any_mut()
            .downcast_mut::<C>()
    }

    /// Creates a component of type `component` for `id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingStore` if no store is registered for the type, or
    /// whatever the store's `create` returns.
    pub fn create_component(
        &mut self,
        component: &str,
        id: EntityId,
        props: &PropertyMap,
    ) -> Result<&mut dyn Reflect> {
        let store = self
            .stores
            .get_mut(component)
            .ok_or_else(|| Error::missing_store(component))?;
        store.create_component(id, props)
    }

    /// Destroys the `component` of `id`. Returns false if absent or if the
    /// type has no store.
    pub fn destroy_component(&mut self, component: &str, id: EntityId) -> bool {
        self.stores
            .get_mut(component)
            .is_some_and(|store| store.destroy_component(id))
    }

    /// Destroys every component `id` has. Returns how many were removed.
    pub fn destroy_entity(&mut self, id: EntityId) -> usize {
        let removed = self
            .stores
            .values_mut()
            .map(|store| usize::from(store.destroy_component(id)))
            .sum();
        trace!(entity = %id, removed, "destroyed entity");
        removed
    }

    /// Lists `(type name, component)` for every component `id` has.
    #[must_use]
    pub fn components_of(&self, id: EntityId) -> Vec<(&str, &dyn Reflect)> {
        self.stores
            .iter()
            .filter_map(|(name, store)| store.component(id).map(|c| (&**name, c)))
            .collect()
    }

    /// Returns registered store names in ascending order.
    pub fn store_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stores.keys().map(|name| &**name)
    }

    /// Returns the number of registered stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns true if no stores are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl fmt::Debug for EntityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.stores.iter().map(|(name, store)| (name, store.count())))
            .finish()
    }
}
