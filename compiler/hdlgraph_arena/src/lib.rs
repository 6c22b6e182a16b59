//! [`Arena`] is a data structure that stores items of type `T` in stable
//! slots and hands out typed [`ID`]s to refer to them. Items are never
//! removed individually; the whole arena is dropped at once.
//!
//! Referring to items by [`ID`] instead of by reference lets cyclic
//! structures (such as the instantiation graph between modules) be expressed
//! without shared ownership.

use std::{
    fmt::Debug,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// Represents an unique identifier to a particular entry in the [`Arena`] of
/// type `T`.
pub struct ID<T: ?Sized> {
    index: usize,

    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized> ID<T> {
    /// Creates a new [`ID`] with the given index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self { index, _marker: PhantomData }
    }

    /// Returns the index of the [`ID`] inside its arena.
    #[must_use]
    pub const fn index(&self) -> usize { self.index }
}

impl<T: ?Sized> Debug for ID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID({})", self.index)
    }
}

impl<T: ?Sized> Clone for ID<T> {
    fn clone(&self) -> Self { *self }
}

impl<T: ?Sized> Copy for ID<T> {}

impl<T: ?Sized> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool { self.index == other.index }
}

impl<T: ?Sized> Eq for ID<T> {}

impl<T: ?Sized> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T: ?Sized> std::hash::Hash for ID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

/// Represents a collection of items of type `T` that can be referenced by an
/// [`ID`].
///
/// Iteration always follows insertion order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T: Debug> Debug for Arena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self { Self { items: Vec::new() } }
}

impl<T> Arena<T> {
    /// Creates a new empty [`Arena`].
    #[must_use]
    pub const fn new() -> Self { Self { items: Vec::new() } }

    /// Returns the number of items in the [`Arena`].
    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    /// Returns `true` if the [`Arena`] contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Inserts a new item into the [`Arena`] and returns its ID.
    pub fn insert(&mut self, item: T) -> ID<T> {
        let id = ID::new(self.items.len());
        self.items.push(item);

        id
    }

    /// Inserts a new item into the [`Arena`] by invoking the given closure with
    /// the ID the item is going to receive.
    pub fn insert_with(&mut self, f: impl FnOnce(ID<T>) -> T) -> ID<T> {
        let id = ID::new(self.items.len());
        let item = f(id);
        self.items.push(item);

        id
    }

    /// Returns a reference to the item in the [`Arena`] with the given ID.
    #[must_use]
    pub fn get(&self, id: ID<T>) -> Option<&T> { self.items.get(id.index) }

    /// Returns a mutable reference to the item in the [`Arena`] with the given
    /// ID.
    #[must_use]
    pub fn get_mut(&mut self, id: ID<T>) -> Option<&mut T> {
        self.items.get_mut(id.index)
    }

    /// Checks if the [`Arena`] contains an item with the given ID.
    #[must_use]
    pub fn contains_id(&self, id: ID<T>) -> bool { id.index < self.items.len() }

    /// Returns an iterator over the items in insertion order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &T> {
        self.items.iter()
    }

    /// Returns an iterator over the items with their IDs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ID<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (ID::new(index), item))
    }

    /// Returns a mutable iterator over the items with their IDs in insertion
    /// order.
    pub fn iter_mut(
        &mut self,
    ) -> impl ExactSizeIterator<Item = (ID<T>, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(index, item)| (ID::new(index), item))
    }

    /// Returns an iterator over the IDs of the items in insertion order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = ID<T>> {
        (0..self.items.len()).map(ID::new)
    }

    /// Returns the items as a slice indexed by [`ID::index`].
    #[must_use]
    pub fn as_slice(&self) -> &[T] { &self.items }
}

impl<T> Index<ID<T>> for Arena<T> {
    type Output = T;

    fn index(&self, id: ID<T>) -> &Self::Output { &self.items[id.index] }
}

impl<T> IndexMut<ID<T>> for Arena<T> {
    fn index_mut(&mut self, id: ID<T>) -> &mut Self::Output {
        &mut self.items[id.index]
    }
}

impl<T> FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for Arena<T> {
    type IntoIter = std::vec::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter { self.items.into_iter() }
}
