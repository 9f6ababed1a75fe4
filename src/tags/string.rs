//! String-based Tag Collection
//!
//! A sorted, de-duplicated `SmallVec<[String; 4]>` implementation of [`TagCollection`].

use std::{cmp::Ordering, ops::BitOr, string::ToString};

use smallvec::SmallVec;

use crate::tags::collection::TagCollection;

/// A string-based tag collection, kept sorted so lookups and merges stay linear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringTagCollection {
    tags: SmallVec<[String; 4]>,
}

impl StringTagCollection {
    /// Create a new string tag collection, sorting and removing duplicates.
    #[must_use]
    pub fn new(tags: SmallVec<[String; 4]>) -> Self {
        let mut collection = Self { tags };

        collection.tags.sort();
        collection.tags.dedup();

        collection
    }

    /// Create a new string tag collection from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(ToString::to_string).collect())
    }

    /// Iterate over the tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StringTagCollection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl TagCollection for StringTagCollection {
    fn empty() -> Self {
        Self {
            tags: SmallVec::new(),
        }
    }

    fn contains(&self, tag: &str) -> bool {
        self.tags
            .binary_search_by(|probe| probe.as_str().cmp(tag))
            .is_ok()
    }

    fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn len(&self) -> usize {
        self.tags.len()
    }
}

impl BitOr for StringTagCollection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        let capacity = self.tags.len().saturating_add(rhs.tags.len());
        let mut result = SmallVec::with_capacity(capacity);
        let mut left = self.tags.into_iter().peekable();
        let mut right = rhs.tags.into_iter().peekable();

        // Merge two sorted vectors (union).
        while let (Some(left_tag), Some(right_tag)) = (left.peek(), right.peek()) {
            match left_tag.cmp(right_tag) {
                Ordering::Less => result.extend(left.next()),
                Ordering::Greater => result.extend(right.next()),
                Ordering::Equal => {
                    result.extend(left.next());
                    right.next();
                }
            }
        }

        result.extend(left);
        result.extend(right);

        Self { tags: result }
    }
}

#[cfg(test)]
mod tests {
    use crate::tags::collection::distinct;

    use super::*;

    #[test]
    fn new_sorts_and_dedups() {
        let tags = StringTagCollection::from_strs(&["gelado", "tradicional", "gelado"]);

        assert_eq!(tags.iter().collect::<Vec<_>>(), ["gelado", "tradicional"]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn contains_finds_present_tags_only() {
        let tags = StringTagCollection::from_strs(&["com leite", "especial"]);

        assert!(tags.contains("especial"));
        assert!(!tags.contains("gelado"));
    }

    #[test]
    fn collects_owned_tags_sorted() {
        let tags: StringTagCollection = ["especial", "alcoólico", "especial"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(tags.iter().collect::<Vec<_>>(), ["alcoólico", "especial"]);
    }

    #[test]
    fn union_keeps_each_tag_once() {
        let left = StringTagCollection::from_strs(&["gelado", "tradicional"]);
        let right = StringTagCollection::from_strs(&["com leite", "tradicional"]);

        let merged = left.union(&right);

        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            ["com leite", "gelado", "tradicional"]
        );
    }

    #[test]
    fn distinct_over_many_collections() {
        let collections = [
            StringTagCollection::from_strs(&["tradicional", "gelado"]),
            StringTagCollection::from_strs(&["tradicional", "com leite"]),
            StringTagCollection::from_strs(&["especial"]),
        ];

        let tags: StringTagCollection = distinct(&collections);

        assert_eq!(tags.len(), 4);
    }

    #[test]
    fn distinct_of_nothing_is_empty() {
        let tags: StringTagCollection = distinct(&[]);

        assert!(tags.is_empty());
    }
}
