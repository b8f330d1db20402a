//! Ordered-map component storage.
//!
//! Suited to sparse or rarely iterated components. Iteration is in ascending
//! entity id order.

use std::collections::BTreeMap;
use std::fmt;

use tessera_foundation::{EntityId, Error, ErrorContext, PropertyMap, Result};
use tracing::debug;

use crate::cursor::{Cursor, erase};
use crate::observer::{ComponentEvent, Observers};
use crate::reflect::Component;
use crate::schema::ComponentSchema;
use crate::storage::{ComponentStorage, build};

/// Associative storage for one component type.
pub struct AssociativeStore<C: Component> {
    components: BTreeMap<EntityId, C>,
    schema: ComponentSchema,
    observers: Observers,
}

impl<C: Component> AssociativeStore<C> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
            schema: C::schema(),
            observers: Observers::new(),
        }
    }

    /// Iterates components in entity id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> + Clone + '_ {
        self.components.iter().map(|(id, c)| (*id, c))
    }

    /// Iterates components mutably in entity id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> + '_ {
        self.components.iter_mut().map(|(id, c)| (*id, c))
    }
}

impl<C: Component> Default for AssociativeStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentStorage for AssociativeStore<C> {
    type Component = C;

    fn create(&mut self, id: EntityId, props: &PropertyMap) -> Result<&mut C> {
        if self.components.contains_key(&id) {
            return Err(Error::duplicate_component(C::type_name(), id)
                .with_context(ErrorContext::new().with_source("associative store")));
        }
        let component = build::<C>(id, &self.schema, props)?;
        debug!(component = C::type_name(), entity = %id, "created component");

        let component = self.components.entry(id).or_insert(component);
        self.observers.emit(ComponentEvent::Created, id, &*component);
        Ok(component)
    }

    fn destroy(&mut self, id: EntityId) -> bool {
        let Some(component) = self.components.get(&id) else {
            return false;
        };
        self.observers
            .emit(ComponentEvent::AboutToDestroy, id, component);
        self.components.remove(&id);
        debug!(component = C::type_name(), entity = %id, "destroyed component");
        true
    }

    fn get(&self, id: EntityId) -> Option<&C> {
        self.components.get(&id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut C> {
        self.components.get_mut(&id)
    }

    fn has(&self, id: EntityId) -> bool {
        self.components.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        for (id, component) in &self.components {
            self.observers
                .emit(ComponentEvent::AboutToDestroy, *id, component);
        }
        self.components.clear();
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(EntityId, &mut C) -> bool,
    {
        let observers = &mut self.observers;
        self.components.retain(|id, component| {
            let kept = keep(*id, component);
            if !kept {
                observers.emit(ComponentEvent::AboutToDestroy, *id, &*component);
            }
            kept
        });
    }

    fn schema(&self) -> &ComponentSchema {
        &self.schema
    }

    fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    fn erased_cursor(&self) -> Cursor<'_> {
        Cursor::over(self.iter().map(erase::<C>))
    }
}

impl<C: Component> fmt::Debug for AssociativeStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssociativeStore")
            .field("component", &C::type_name())
            .field("len", &self.components.len())
            .finish_non_exhaustive()
    }
}
