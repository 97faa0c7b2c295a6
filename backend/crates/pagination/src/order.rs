//! Keyset ordering helpers.

use std::cmp::Ordering;

use crate::PageRequest;

/// Traversal direction of a keyset-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

impl Direction {
    /// Whether `candidate` sorts strictly after `anchor` in this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::Direction;
    ///
    /// assert!(Direction::Descending.follows(&1, &2));
    /// assert!(!Direction::Descending.follows(&2, &2));
    /// ```
    #[must_use]
    pub fn follows<K: Ord + ?Sized>(self, candidate: &K, anchor: &K) -> bool {
        self.compare(candidate, anchor) == Ordering::Greater
    }

    /// Compare two keys in traversal order.
    #[must_use]
    pub fn compare<K: Ord + ?Sized>(self, left: &K, right: &K) -> Ordering {
        match self {
            Self::Ascending => left.cmp(right),
            Self::Descending => right.cmp(left),
        }
    }
}

/// Select the look-ahead window for `request` from an in-memory collection.
///
/// Keeps items strictly after the request's anchor, sorts them in
/// `direction` and returns at most `size + 1` of them, ready for
/// [`crate::Page::from_lookahead`]. Keys must be unique per item.
pub fn keyset_window<T, K, F>(
    items: impl IntoIterator<Item = T>,
    direction: Direction,
    request: &PageRequest<K>,
    key_of: F,
) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut window: Vec<T> = items
        .into_iter()
        .filter(|item| {
            request
                .anchor()
                .is_none_or(|anchor| direction.follows(&key_of(item), anchor))
        })
        .collect();
    window.sort_by(|left, right| direction.compare(&key_of(left), &key_of(right)));
    window.truncate(request.size().lookahead());
    window
}
