//! Type-erased iteration over any store.
//!
//! A [`Cursor`] walks the live components of a store without knowing its
//! concrete layout. The concrete store's native iterator is wrapped once, at
//! the erasure boundary; advancing does not allocate.

use std::fmt;

use tessera_foundation::EntityId;

use crate::reflect::Reflect;

/// The operations a concrete store's native cursor must provide.
pub trait RawCursor<'a> {
    /// Moves to the next live component.
    fn advance(&mut self);

    /// Returns the component under the cursor, or `None` past the end.
    fn get(&self) -> Option<(EntityId, &'a dyn Reflect)>;

    /// Returns a boxed copy positioned at the same component.
    fn clone_box(&self) -> Box<dyn RawCursor<'a> + 'a>;

    /// Returns true if both cursors point at the same position.
    ///
    /// Only meaningful for cursors over the same store and pass.
    fn equals(&self, other: &dyn RawCursor<'a>) -> bool {
        self.get().map(|(id, _)| id) == other.get().map(|(id, _)| id)
    }
}

/// Adapts any cloneable iterator of erased components into a [`RawCursor`].
pub(crate) struct IterCursor<'a, I> {
    head: Option<(EntityId, &'a dyn Reflect)>,
    rest: I,
}

impl<'a, I> IterCursor<'a, I>
where
    I: Iterator<Item = (EntityId, &'a dyn Reflect)>,
{
    pub(crate) fn new(mut rest: I) -> Self {
        let head = rest.next();
        Self { head, rest }
    }
}

impl<'a, I> RawCursor<'a> for IterCursor<'a, I>
where
    I: Iterator<Item = (EntityId, &'a dyn Reflect)> + Clone + 'a,
{
    fn advance(&mut self) {
        if self.head.is_some() {
            self.head = self.rest.next();
        }
    }

    fn get(&self) -> Option<(EntityId, &'a dyn Reflect)> {
        self.head
    }

    fn clone_box(&self) -> Box<dyn RawCursor<'a> + 'a> {
        Box::new(IterCursor {
            head: self.head,
            rest: self.rest.clone(),
        })
    }
}

/// Type-erased, forward-only cursor over a store's live components.
///
/// Yields `(EntityId, &dyn Reflect)` pairs. The store cannot be mutated while
/// a cursor borrows it.
pub struct Cursor<'a> {
    inner: Box<dyn RawCursor<'a> + 'a>,
}

impl<'a> Cursor<'a> {
    /// Wraps a native cursor.
    #[must_use]
    pub fn new(inner: Box<dyn RawCursor<'a> + 'a>) -> Self {
        Self { inner }
    }

    pub(crate) fn over<I>(iter: I) -> Self
    where
        I: Iterator<Item = (EntityId, &'a dyn Reflect)> + Clone + 'a,
    {
        Self::new(Box::new(IterCursor::new(iter)))
    }

    /// Returns the component under the cursor without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<(EntityId, &'a dyn Reflect)> {
        self.inner.get()
    }

    /// Returns true once every component has been visited.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.inner.get().is_none()
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (EntityId, &'a dyn Reflect);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.get()?;
        self.inner.advance();
        Some(item)
    }
}

impl Clone for Cursor<'_> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.equals(other.inner.as_ref())
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("at", &self.peek().map(|(id, _)| id))
            .finish()
    }
}

/// Erases a typed `(id, component)` pair; used to map native iterators.
pub(crate) fn erase<C: Reflect>((id, component): (EntityId, &C)) -> (EntityId, &dyn Reflect) {
    (id, component)
}
