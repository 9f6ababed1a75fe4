//! Tag Collection
//!
//! Category labels attached to products. The delivery fee is driven by how many
//! distinct labels a cart contains, so collections need cheap union and counting.

use std::{fmt, ops::BitOr};

/// Trait for tag collections that can be merged and counted.
pub trait TagCollection: Clone + fmt::Debug + PartialEq + BitOr<Output = Self> {
    /// Create an empty collection.
    fn empty() -> Self;

    /// Check if this collection contains a specific tag.
    fn contains(&self, tag: &str) -> bool;

    /// Check if this collection is empty.
    fn is_empty(&self) -> bool;

    /// Get the number of distinct tags in this collection.
    fn len(&self) -> usize;

    /// Merge this collection with another, keeping each tag once.
    #[must_use]
    fn union(&self, other: &Self) -> Self {
        self.clone() | other.clone()
    }
}

/// Merge every collection yielded by `collections` into one.
pub fn distinct<'t, T, I>(collections: I) -> T
where
    T: TagCollection + 't,
    I: IntoIterator<Item = &'t T>,
{
    collections
        .into_iter()
        .fold(T::empty(), |acc, tags| acc.union(tags))
}
