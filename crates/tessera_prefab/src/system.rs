//! The prefab system: template table, instancing and propagation.
//!
//! Templates live only in the system's table. Each instance entity carries a
//! [`PrefabInstance`] component naming its template, kept in an ordinary
//! store registered with the [`EntityManager`]. Propagation walks those
//! instances and reaches each component through whichever store currently
//! owns its type.

use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_foundation::{ComponentMap, EntityId, Error, PropertyMap, Result, properties};
use tessera_storage::{AssociativeStore, Component, ComponentSchema, EntityManager, Reflect};
use tracing::{debug, trace, warn};

use crate::prefab::{Prefab, PrefabInstance};
use crate::report::PropagationReport;

/// Owns prefab templates and keeps their instances in sync.
#[derive(Debug, Default)]
pub struct PrefabSystem {
    prefabs: BTreeMap<Arc<str>, Prefab>,
}

impl PrefabSystem {
    /// Creates a system with no templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the store that holds [`PrefabInstance`] components.
    ///
    /// # Errors
    ///
    /// Returns `StoreAlreadyRegistered` if one is already present.
    pub fn install(em: &mut EntityManager) -> Result<()> {
        em.register(AssociativeStore::<PrefabInstance>::new())
    }

    /// Adds a template, replacing any template with the same name.
    ///
    /// Returns the replaced template. Existing instances of the old template
    /// refer to the new one from now on but are not touched.
    pub fn add_prefab<I>(
        &mut self,
        path: impl Into<Arc<str>>,
        components: ComponentMap,
        parameters: I,
    ) -> Option<Prefab>
    where
        I: IntoIterator,
        I::Item: Into<Arc<str>>,
    {
        let path = path.into();
        let parameters = parameters.into_iter().map(Into::into).collect();
        let prefab = Prefab::new(Arc::clone(&path), components, parameters);
        let replaced = self.prefabs.insert(Arc::clone(&path), prefab);
        debug!(prefab = %path, replaced = replaced.is_some(), "added prefab");
        replaced
    }

    /// Removes a template. Its instances keep their components.
    pub fn remove_prefab(&mut self, path: &str) -> Option<Prefab> {
        let removed = self.prefabs.remove(path)?;
        debug!(prefab = path, "removed prefab");
        Some(removed)
    }

    /// Returns the template named `path`.
    #[must_use]
    pub fn prefab(&self, path: &str) -> Option<&Prefab> {
        self.prefabs.get(path)
    }

    /// Returns template names in ascending order.
    pub fn prefab_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.prefabs.keys().map(|p| &**p)
    }

    /// Returns the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    /// Returns true if there are no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Returns every entity that is an instance of `path`.
    #[must_use]
    pub fn instances_of(&self, em: &EntityManager, path: &str) -> Vec<EntityId> {
        let Some(store) = em.store(PrefabInstance::type_name()) else {
            return Vec::new();
        };
        store
            .cursor()
            .filter_map(|(id, component)| {
                let instance = component.as_any().downcast_ref::<PrefabInstance>()?;
                (instance.prefab() == path).then_some(id)
            })
            .collect()
    }

    /// Returns the template `id` was built from.
    ///
    /// `None` if `id` is not an instance, or its template has been removed.
    #[must_use]
    pub fn instance_prefab(&self, em: &EntityManager, id: EntityId) -> Option<&Prefab> {
        let instance = em.component::<PrefabInstance>(id)?;
        self.prefabs.get(instance.prefab())
    }

    /// Builds entity `id` from the template `path`.
    ///
    /// Creates each declared component through its store, then marks `id`
    /// with a [`PrefabInstance`]. Declared types without a registered store
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPrefab` if no template is named `path`, `MissingStore`
    /// if the instance store is not installed, `DuplicateComponent` if `id` is
    /// already an instance, or the first component creation error. On error,
    /// components created by this call are destroyed again.
    pub fn instantiate(&self, em: &mut EntityManager, path: &str, id: EntityId) -> Result<()> {
        let prefab = self
            .prefabs
            .get(path)
            .ok_or_else(|| Error::unknown_prefab(path))?;
        let marker_type = PrefabInstance::type_name();
        let instances = em
            .store(marker_type)
            .ok_or_else(|| Error::missing_store(marker_type))?;
        if instances.has_component(id) {
            return Err(Error::duplicate_component(marker_type, id));
        }

        let mut created: Vec<&str> = Vec::new();
        for (type_name, props) in prefab.components().iter() {
            if em.store(type_name).is_none() {
                warn!(prefab = path, component = %type_name, "no store for prefab component; skipping");
                continue;
            }
            if let Err(err) = em.create_component(type_name, id, props).map(|_| ()) {
                rollback(em, id, &created);
                return Err(err.in_frame(format!("instantiating prefab {path}")));
            }
            created.push(type_name);
        }

        let marker = properties([("prefab", Arc::clone(prefab.path()))]);
        if let Err(err) = em.create_component(marker_type, id, &marker).map(|_| ()) {
            rollback(em, id, &created);
            return Err(err.in_frame(format!("instantiating prefab {path}")));
        }
        debug!(prefab = path, entity = %id, components = created.len(), "instantiated prefab");
        Ok(())
    }

    /// Replaces the component map of template `path`.
    ///
    /// With `propagate`, existing instances are brought in line with the new
    /// map: components whose type left the template are destroyed, shared
    /// types have their changed non-parameter fields overwritten, and types
    /// new to the template are created. Removals run before updates, updates
    /// before additions. Without `propagate` only the template changes.
    ///
    /// Types without a registered store and per-instance failures are
    /// skipped with a warning and recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPrefab` if no template is named `path`; nothing is
    /// changed in that case.
    pub fn update_prefab(
        &mut self,
        em: &mut EntityManager,
        path: &str,
        components: ComponentMap,
        propagate: bool,
    ) -> Result<PropagationReport> {
        let prefab = self
            .prefabs
            .get(path)
            .ok_or_else(|| Error::unknown_prefab(path))?;

        let mut report = PropagationReport::default();
        if propagate {
            let instances = self.instances_of(em, path);
            let mut propagation = Propagation {
                em,
                prefab,
                instances: &instances,
                report: &mut report,
            };
            propagation.remove_dropped(&components);
            propagation.update_shared(&components);
            propagation.add_new(&components);
            debug!(prefab = path, instances = instances.len(), %report, "propagated prefab update");
        }

        if let Some(prefab) = self.prefabs.get_mut(path) {
            prefab.set_components(components);
        }
        Ok(report)
    }
}

fn rollback(em: &mut EntityManager, id: EntityId, created: &[&str]) {
    for type_name in created.iter().rev() {
        em.destroy_component(type_name, id);
    }
}

/// One propagating update in progress.
struct Propagation<'a> {
    em: &'a mut EntityManager,
    prefab: &'a Prefab,
    instances: &'a [EntityId],
    report: &'a mut PropagationReport,
}

impl Propagation<'_> {
    fn has_store(&mut self, type_name: &Arc<str>) -> bool {
        if self.em.store(type_name).is_some() {
            return true;
        }
        warn!(prefab = %self.prefab.path(), component = %type_name, "no store for prefab component; skipping propagation");
        self.report.skipped_types.push(Arc::clone(type_name));
        false
    }

    fn remove_dropped(&mut self, new: &ComponentMap) {
        let prefab = self.prefab;
        let old = prefab.components();
        for type_name in old.keys().filter(|t| !new.contains_key(&***t)) {
            if !self.has_store(type_name) {
                continue;
            }
            for &id in self.instances {
                if self.em.destroy_component(type_name, id) {
                    self.report.removed += 1;
                }
            }
        }
    }

    fn update_shared(&mut self, new: &ComponentMap) {
        let prefab = self.prefab;
        let old = prefab.components();
        for (type_name, props) in new.iter().filter(|(t, _)| old.contains_key(&***t)) {
            if !self.has_store(type_name) {
                continue;
            }
            let Some(store) = self.em.store_mut(type_name) else {
                continue;
            };
            let schema = store.component_schema().clone();
            for &id in self.instances {
                let Some(component) = store.component_mut(id) else {
                    trace!(component = %type_name, entity = %id, "instance lacks component; skipping");
                    continue;
                };
                update_fields(component, &schema, props, prefab, id, self.report);
            }
        }
    }

    fn add_new(&mut self, new: &ComponentMap) {
        let prefab = self.prefab;
        let old = prefab.components();
        for (type_name, props) in new.iter().filter(|(t, _)| !old.contains_key(&***t)) {
            if !self.has_store(type_name) {
                continue;
            }
            let Some(store) = self.em.store_mut(type_name) else {
                continue;
            };
            for &id in self.instances {
                if store.has_component(id) {
                    continue;
                }
                match store.create_component(id, props) {
                    Ok(_) => self.report.created += 1,
                    Err(err) => {
                        warn!(component = %type_name, entity = %id, error = %err, "could not add prefab component");
                        self.report.failures += 1;
                    }
                }
            }
        }
    }
}

/// Overwrites the fields of one instance's component that differ from the
/// template, leaving parameter and bookkeeping fields alone.
fn update_fields(
    component: &mut dyn Reflect,
    schema: &ComponentSchema,
    props: &PropertyMap,
    prefab: &Prefab,
    id: EntityId,
    report: &mut PropagationReport,
) {
    for (field, value) in props.iter() {
        if prefab.is_parameter(field) {
            continue;
        }
        let ty = match schema.field(field) {
            Some(f) if f.writable && !f.bookkeeping => &f.ty,
            Some(_) => continue,
            None => {
                warn!(component = %schema.name, field = %field, "prefab names unknown field");
                continue;
            }
        };
        let Some(value) = value.conform_to(ty) else {
            warn!(
                component = %schema.name,
                field = %field,
                entity = %id,
                expected = %ty,
                actual = %value.value_type(),
                "prefab value does not fit field"
            );
            report.failures += 1;
            continue;
        };
        if component.read_field(field).as_ref() == Some(&value) {
            continue;
        }
        match component.write_field(field, value) {
            Ok(()) => {
                trace!(component = %schema.name, field = %field, entity = %id, "propagated field");
                report.updated_fields += 1;
            }
            Err(err) => {
                warn!(component = %schema.name, field = %field, entity = %id, error = %err, "could not propagate field");
                report.failures += 1;
            }
        }
    }
}
