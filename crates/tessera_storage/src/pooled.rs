//! Chunked, slot-recycling component storage.
//!
//! Components live in fixed-size chunks of contiguous slots. Destroyed slots
//! go on a free list and are reused (most recently freed first) before any
//! untouched slot; a new chunk is allocated only when every slot is in use.
//! Chunks are never released, so `capacity` only grows.

use std::collections::HashMap;
use std::fmt;

use tessera_foundation::{EntityId, Error, ErrorContext, PropertyMap, Result};
use tracing::debug;

use crate::config::PoolConfig;
use crate::cursor::{Cursor, erase};
use crate::observer::{ComponentEvent, Observers};
use crate::reflect::Component;
use crate::schema::ComponentSchema;
use crate::storage::{ComponentStorage, build};

struct Slot<C> {
    id: EntityId,
    component: C,
}

type Chunk<C> = Box<[Option<Slot<C>>]>;

/// Position of an occupied slot, for erase-while-iterating.
///
/// Obtained from [`PooledStore::first`] or [`PooledStore::next_after`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotCursor(usize);

/// Pooled storage for one component type.
pub struct PooledStore<C: Component> {
    chunks: Vec<Chunk<C>>,
    /// Entity → global slot index.
    index: HashMap<EntityId, usize>,
    free_list: Vec<usize>,
    /// Slots below this index have been handed out at least once.
    high_water: usize,
    len: usize,
    chunk_size: usize,
    schema: ComponentSchema,
    observers: Observers,
}

impl<C: Component> PooledStore<C> {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(PoolConfig::default())
    }

    /// Creates a store with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PoolConfig) -> Self {
        let mut store = Self {
            chunks: Vec::new(),
            index: HashMap::new(),
            free_list: Vec::new(),
            high_water: 0,
            len: 0,
            chunk_size: config.chunk_size,
            schema: C::schema(),
            observers: Observers::new(),
        };
        for _ in 0..config.initial_chunks() {
            store.grow();
        }
        store
    }

    /// Returns the number of slots allocated across all chunks.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chunks.len() * self.chunk_size
    }

    /// Returns the number of slots per chunk.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates live components in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> + Clone + '_ {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter())
            .take(self.high_water)
            .filter_map(|slot| slot.as_ref().map(|s| (s.id, &s.component)))
    }

    /// Iterates live components mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> + '_ {
        self.chunks
            .iter_mut()
            .flat_map(|chunk| chunk.iter_mut())
            .take(self.high_water)
            .filter_map(|slot| slot.as_mut().map(|s| (s.id, &mut s.component)))
    }

    /// Returns the first occupied slot.
    #[must_use]
    pub fn first(&self) -> Option<SlotCursor> {
        self.occupied_from(0)
    }

    /// Returns the next occupied slot after `pos`.
    #[must_use]
    pub fn next_after(&self, pos: SlotCursor) -> Option<SlotCursor> {
        self.occupied_from(pos.0 + 1)
    }

    /// Returns the component at `pos`, if the slot is occupied.
    #[must_use]
    pub fn at(&self, pos: SlotCursor) -> Option<(EntityId, &C)> {
        self.slot(pos.0)
            .and_then(Option::as_ref)
            .map(|s| (s.id, &s.component))
    }

    /// Returns the component at `pos` mutably, if the slot is occupied.
    pub fn at_mut(&mut self, pos: SlotCursor) -> Option<(EntityId, &mut C)> {
        let (chunk, offset) = self.locate(pos.0);
        self.chunks
            .get_mut(chunk)?
            .get_mut(offset)?
            .as_mut()
            .map(|s| (s.id, &mut s.component))
    }

    /// Destroys the component at `pos` and returns the next occupied slot.
    ///
    /// Lets a caller walk the store with [`first`](Self::first) /
    /// [`next_after`](Self::next_after) and remove components as it goes.
    pub fn erase(&mut self, pos: SlotCursor) -> Option<SlotCursor> {
        self.release(pos.0);
        self.next_after(pos)
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.chunk_size, index % self.chunk_size)
    }

    fn slot(&self, index: usize) -> Option<&Option<Slot<C>>> {
        let (chunk, offset) = self.locate(index);
        self.chunks.get(chunk)?.get(offset)
    }

    fn occupied_from(&self, start: usize) -> Option<SlotCursor> {
        (start..self.high_water)
            .find(|&i| matches!(self.slot(i), Some(Some(_))))
            .map(SlotCursor)
    }

    fn grow(&mut self) {
        let chunk: Vec<Option<Slot<C>>> = (0..self.chunk_size).map(|_| None).collect();
        self.chunks.push(chunk.into_boxed_slice());
    }

    fn allocate_slot(&mut self) -> usize {
        if let Some(index) = self.free_list.pop() {
            return index;
        }
        if self.high_water == self.capacity() {
            self.grow();
        }
        let index = self.high_water;
        self.high_water += 1;
        index
    }

    /// Emits `AboutToDestroy`, then frees the slot.
    fn release(&mut self, index: usize) -> Option<EntityId> {
        let (chunk, offset) = self.locate(index);
        let cell = self.chunks.get_mut(chunk)?.get_mut(offset)?;
        let slot = cell.as_ref()?;
        self.observers
            .emit(ComponentEvent::AboutToDestroy, slot.id, &slot.component);
        let slot = cell.take()?;
        self.index.remove(&slot.id);
        self.free_list.push(index);
        self.len -= 1;
        debug!(component = C::type_name(), entity = %slot.id, slot = index, "destroyed component");
        Some(slot.id)
    }
}

impl<C: Component> Default for PooledStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentStorage for PooledStore<C> {
    type Component = C;

    fn create(&mut self, id: EntityId, props: &PropertyMap) -> Result<&mut C> {
        if self.index.contains_key(&id) {
            return Err(Error::duplicate_component(C::type_name(), id)
                .with_context(ErrorContext::new().with_source("pooled store")));
        }
        let component = build::<C>(id, &self.schema, props)?;

        let index = self.allocate_slot();
        let (chunk, offset) = self.locate(index);
        let slot = self.chunks[chunk][offset].insert(Slot { id, component });
        self.index.insert(id, index);
        self.len += 1;
        debug!(component = C::type_name(), entity = %id, slot = index, "created component");

        self.observers
            .emit(ComponentEvent::Created, id, &slot.component);
        Ok(&mut slot.component)
    }

    fn destroy(&mut self, id: EntityId) -> bool {
        match self.index.get(&id) {
            Some(&index) => self.release(index).is_some(),
            None => false,
        }
    }

    fn get(&self, id: EntityId) -> Option<&C> {
        let index = *self.index.get(&id)?;
        self.slot(index)?.as_ref().map(|s| &s.component)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut C> {
        let index = *self.index.get(&id)?;
        let (chunk, offset) = self.locate(index);
        self.chunks[chunk][offset].as_mut().map(|s| &mut s.component)
    }

    fn has(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for index in 0..self.high_water {
            self.release(index);
        }
        self.free_list.clear();
        self.high_water = 0;
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(EntityId, &mut C) -> bool,
    {
        for index in 0..self.high_water {
            let (chunk, offset) = self.locate(index);
            let drop_it = match &mut self.chunks[chunk][offset] {
                Some(slot) => !keep(slot.id, &mut slot.component),
                None => false,
            };
            if drop_it {
                self.release(index);
            }
        }
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

impl<C: Component> fmt::Debug for PooledStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledStore")
            .field("component", &C::type_name())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("chunk_size", &self.chunk_size)
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}
