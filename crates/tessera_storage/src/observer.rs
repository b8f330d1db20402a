//! Synchronous component lifecycle notifications.
//!
//! Each store owns an [`Observers`] list and broadcasts [`ComponentEvent`]s
//! in-process, in subscription order, before the emitting call returns.
//! Observers get a shared borrow of the component only: they cannot reach
//! back into the emitting store while it is mid-create or mid-destroy.

use std::fmt;

use tessera_foundation::EntityId;

use crate::reflect::Reflect;

/// A component lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentEvent {
    /// A component was created and its initial properties applied.
    Created,
    /// A component is about to be destroyed; storage is still intact.
    AboutToDestroy,
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(ComponentEvent, EntityId, &dyn Reflect)>;

/// An ordered list of lifecycle observers.
#[derive(Default)]
pub struct Observers {
    callbacks: Vec<(ObserverId, Callback)>,
    next_id: u64,
}

impl Observers {
    /// Creates an empty observer list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(ComponentEvent, EntityId, &dyn Reflect) + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Removes an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Broadcasts an event to every observer.
    pub fn emit(&mut self, event: ComponentEvent, entity: EntityId, component: &dyn Reflect) {
        for (_, callback) in &mut self.callbacks {
            callback(event, entity, component);
        }
    }

    /// Returns the number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns true if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.callbacks.len())
            .finish()
    }
}
