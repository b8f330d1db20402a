//! The storage contract every component store satisfies.
//!
//! [`ComponentStorage`] is the statically typed contract a concrete store
//! implements. [`Store`] is its object-safe, type-erased face, implemented
//! for every `ComponentStorage`; the entity manager and the prefab layer only
//! ever see `dyn Store`.

use std::any::Any;

use tessera_foundation::{EntityId, ErrorContext, PropertyMap, Result};

use crate::cursor::Cursor;
use crate::observer::{ComponentEvent, ObserverId, Observers};
use crate::reflect::{Component, Reflect, apply_properties};
use crate::schema::ComponentSchema;

/// Statically typed storage for one component type.
///
/// A store holds at most one component per entity. Concrete stores also
/// provide inherent `iter()` / `iter_mut()` for typed iteration.
pub trait ComponentStorage: 'static {
    /// The component type this store owns.
    type Component: Component;

    /// Creates a component for `id` and applies `props` to it.
    ///
    /// Property entries that do not match a writable field are skipped with
    /// a warning. Emits [`ComponentEvent::Created`] on success.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateComponent` if `id` already has a component here, or
    /// `ConstructionFailure` if the component cannot be constructed. The
    /// store is unchanged on error.
    fn create(&mut self, id: EntityId, props: &PropertyMap) -> Result<&mut Self::Component>;

    /// Destroys the component for `id`, emitting
    /// [`ComponentEvent::AboutToDestroy`] first. Returns false if absent.
    fn destroy(&mut self, id: EntityId) -> bool;

    /// Returns the component for `id`.
    fn get(&self, id: EntityId) -> Option<&Self::Component>;

    /// Returns the component for `id` mutably.
    fn get_mut(&mut self, id: EntityId) -> Option<&mut Self::Component>;

    /// Returns true if `id` has a component here.
    fn has(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of live components.
    fn len(&self) -> usize;

    /// Returns true if the store holds no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroys every component, emitting `AboutToDestroy` for each.
    fn clear(&mut self);

    /// Destroys every component for which `keep` returns false.
    ///
    /// This is the supported way to remove components during a pass.
    fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(EntityId, &mut Self::Component) -> bool;

    /// Returns the component type's schema.
    fn schema(&self) -> &ComponentSchema;

    /// Returns the store's observer list.
    fn observers_mut(&mut self) -> &mut Observers;

    /// Returns a type-erased cursor over all live components.
    fn erased_cursor(&self) -> Cursor<'_>;
}

/// Type-erased storage contract.
///
/// Visits and routes components without knowing the concrete component type
/// or memory layout.
pub trait Store: Any {
    /// Returns the component type name.
    fn type_name(&self) -> &str;

    /// Returns the component type's schema.
    fn component_schema(&self) -> &ComponentSchema;

    /// Creates a component for `id` and applies `props` to it.
    ///
    /// # Errors
    ///
    /// See [`ComponentStorage::create`].
    fn create_component(&mut self, id: EntityId, props: &PropertyMap) -> Result<&mut dyn Reflect>;

    /// Destroys the component for `id`. Returns false if absent.
    fn destroy_component(&mut self, id: EntityId) -> bool;

    /// Returns the component for `id`.
    fn component(&self, id: EntityId) -> Option<&dyn Reflect>;

    /// Returns the component for `id` mutably.
    fn component_mut(&mut self, id: EntityId) -> Option<&mut dyn Reflect>;

    /// Returns true if `id` has a component here.
    fn has_component(&self, id: EntityId) -> bool {
        self.component(id).is_some()
    }

    /// Returns the number of live components.
    fn count(&self) -> usize;

    /// Returns a cursor over all live components.
    fn cursor(&self) -> Cursor<'_>;

    /// Returns the ids of all live components, in iteration order.
    fn entities(&self) -> Vec<EntityId> {
        self.cursor().map(|(id, _)| id).collect()
    }

    /// Destroys every component.
    fn clear_components(&mut self);

    /// Adds a lifecycle observer.
    fn subscribe(
        &mut self,
        observer: Box<dyn FnMut(ComponentEvent, EntityId, &dyn Reflect)>,
    ) -> ObserverId;

    /// Removes a lifecycle observer. Returns false if it was not subscribed.
    fn unsubscribe(&mut self, id: ObserverId) -> bool;

    /// Returns the store as `Any` for downcasting to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Returns the store as mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: ComponentStorage> Store for S {
    fn type_name(&self) -> &str {
        S::Component::type_name()
    }

    fn component_schema(&self) -> &ComponentSchema {
        self.schema()
    }

    fn create_component(&mut self, id: EntityId, props: &PropertyMap) -> Result<&mut dyn Reflect> {
        let component = self.create(id, props)?;
        Ok(component)
    }

    fn destroy_component(&mut self, id: EntityId) -> bool {
        self.destroy(id)
    }

    fn component(&self, id: EntityId) -> Option<&dyn Reflect> {
        self.get(id).map(|c| c as &dyn Reflect)
    }

    fn component_mut(&mut self, id: EntityId) -> Option<&mut dyn Reflect> {
        self.get_mut(id).map(|c| c as &mut dyn Reflect)
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn cursor(&self) -> Cursor<'_> {
        self.erased_cursor()
    }

    fn clear_components(&mut self) {
        self.clear();
    }

    fn subscribe(
        &mut self,
        observer: Box<dyn FnMut(ComponentEvent, EntityId, &dyn Reflect)>,
    ) -> ObserverId {
        self.observers_mut().subscribe(observer)
    }

    fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers_mut().unsubscribe(id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Constructs a component and applies its initial properties.
pub(crate) fn build<C: Component>(
    id: EntityId,
    schema: &ComponentSchema,
    props: &PropertyMap,
) -> Result<C> {
    let mut component = C::construct().map_err(|err| {
        err.with_context(
            ErrorContext::new()
                .with_source(C::type_name())
                .with_entity(id),
        )
    })?;
    apply_properties(&mut component, schema, props);
    Ok(component)
}
