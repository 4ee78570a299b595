//! Value-semantics handle over the persistent AVL node layer.
//!
//! This module provides [`PersistentAvlTree`], an immutable ordered collection
//! that shares structure between versions.
//!
//! # Overview
//!
//! - O(log N) insert, update, delete
//! - O(log N) search, min/max, predecessor/successor
//! - O(N) traversals
//! - O(1) len, `is_empty` and clone
//!
//! All modifying operations return a new tree without modifying the original.
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::PersistentAvlTree;
//!
//! let (tree, _) = PersistentAvlTree::new().insert(3);
//! let (tree, _) = tree.insert(1);
//! let (tree, _) = tree.insert(2);
//!
//! // Items are always in sorted order
//! let items: Vec<&i32> = tree.iter().collect();
//! assert_eq!(items, vec![&1, &2, &3]);
//!
//! // Neighbours of present and absent keys alike
//! assert_eq!(tree.predecessor(&2), Some(&1));
//! assert_eq!(tree.successor(&10), None);
//! ```

use super::iterators::{IntoIter, Iter, PostOrderIter, PreOrderIter};
use super::node::{self, Link, Node};
use super::ReferenceCounter;
use crate::compare::Compare;
use crate::error::InvariantViolation;
use std::fmt;

// =============================================================================
// PersistentAvlTree Definition
// =============================================================================

/// A persistent (immutable) ordered collection based on an AVL tree.
///
/// Every modifying operation returns a new tree together with the item the
/// operation found in the *original* tree, borrowed from it. Cloning a tree
/// is O(1): both handles share the same root.
///
/// # Time Complexity
///
/// | Operation                   | Complexity |
/// |-----------------------------|------------|
/// | `new`                       | O(1)       |
/// | `insert`/`update`/`delete`  | O(log N)   |
/// | `search`/`contains`         | O(log N)   |
/// | `min`/`max`                 | O(log N)   |
/// | `predecessor`/`successor`   | O(log N)   |
/// | traversals                  | O(N)       |
/// | `len`/`is_empty`/`height`   | O(1)       |
///
/// # Examples
///
/// ```rust
/// use persistent_avl::PersistentAvlTree;
///
/// let (original, _) = PersistentAvlTree::new().insert("one".to_string());
/// let (updated, previous) = original.update("one".to_string());
/// let (extended, existing) = updated.insert("two".to_string());
///
/// assert_eq!(previous.map(String::as_str), Some("one"));
/// assert_eq!(existing, None);
/// assert_eq!(original.len(), 1); // Original unchanged
/// assert_eq!(extended.len(), 2); // New version
/// ```
pub struct PersistentAvlTree<T> {
    /// Root node of the tree
    root: Link<T>,
    /// Number of items
    length: usize,
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentAvlTree<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentAvlTree<i32>: Send, Sync);

impl<T> PersistentAvlTree<T> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32> = PersistentAvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    const fn from_parts(root: Link<T>, length: usize) -> Self {
        Self { root, length }
    }

    /// Returns the number of items in the tree.
    ///
    /// The count is maintained by every modification, not recomputed.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the height of the tree; the empty tree has height 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<u32> = (0..7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> u32 {
        node::height(self.root.as_ref())
    }

    /// Returns `true` if both trees share the same root node.
    ///
    /// A failed insert or a delete of a missing item returns a tree for which
    /// this holds against the original.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32> = (1..=3).collect();
    /// let (unchanged, removed) = tree.delete(&42);
    /// assert_eq!(removed, None);
    /// assert!(unchanged.ptr_eq(&tree));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns the smallest item, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        Node::min(self.root.as_ref())
    }

    /// Returns the largest item, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        Node::max(self.root.as_ref())
    }

    /// Calls `visitor` with each item in ascending order until it returns
    /// `false`.
    ///
    /// Returns `true` if every item was visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32> = (1..=10).collect();
    /// let mut seen = Vec::new();
    /// let completed = tree.in_order(|item| {
    ///     seen.push(*item);
    ///     *item < 3
    /// });
    /// assert!(!completed);
    /// assert_eq!(seen, vec![1, 2, 3]);
    /// ```
    pub fn in_order<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        Node::in_order(self.root.as_ref(), &mut visitor)
    }

    /// Calls `visitor` with each item, every node before its subtrees, until
    /// it returns `false`.
    ///
    /// Returns `true` if every item was visited.
    pub fn pre_order<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        Node::pre_order(self.root.as_ref(), &mut visitor)
    }

    /// Calls `visitor` with each item, every node after its subtrees, until
    /// it returns `false`.
    ///
    /// Returns `true` if every item was visited.
    pub fn post_order<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        Node::post_order(self.root.as_ref(), &mut visitor)
    }

    /// Returns a lazy iterator over the items in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_ref(), self.length)
    }

    /// Returns a lazy pre-order iterator over the items.
    #[must_use]
    pub fn iter_pre_order(&self) -> PreOrderIter<'_, T> {
        PreOrderIter::new(self.root.as_ref(), self.length)
    }

    /// Returns a lazy post-order iterator over the items.
    #[must_use]
    pub fn iter_post_order(&self) -> PostOrderIter<'_, T> {
        PostOrderIter::new(self.root.as_ref(), self.length)
    }

    /// Searches for the item ordering equal to `key`.
    ///
    /// `key` may be of any type that compares against the stored items.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<String> =
    ///     ["pear", "fig"].into_iter().map(String::from).collect();
    /// assert_eq!(tree.search("fig").map(String::as_str), Some("fig"));
    /// assert_eq!(tree.search("kiwi"), None);
    /// ```
    #[must_use]
    pub fn search<Q>(&self, key: &Q) -> Option<&T>
    where
        Q: Compare<T> + ?Sized,
    {
        Node::search(self.root.as_ref(), key)
    }

    /// Returns `true` if an item ordering equal to `key` is stored.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Compare<T> + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Returns the greatest item strictly less than `key`.
    ///
    /// `key` does not need to be stored in the tree.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(tree.predecessor(&20), Some(&10));
    /// assert_eq!(tree.predecessor(&25), Some(&20));
    /// assert_eq!(tree.predecessor(&10), None);
    /// ```
    #[must_use]
    pub fn predecessor<Q>(&self, key: &Q) -> Option<&T>
    where
        Q: Compare<T> + ?Sized,
    {
        Node::predecessor(self.root.as_ref(), key)
    }

    /// Returns the smallest item strictly greater than `key`.
    ///
    /// `key` does not need to be stored in the tree.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(tree.successor(&20), Some(&30));
    /// assert_eq!(tree.successor(&5), Some(&10));
    /// assert_eq!(tree.successor(&30), None);
    /// ```
    #[must_use]
    pub fn successor<Q>(&self, key: &Q) -> Option<&T>
    where
        Q: Compare<T> + ?Sized,
    {
        Node::successor(self.root.as_ref(), key)
    }
}

impl<T: Compare + Clone> PersistentAvlTree<T> {
    /// Creates a tree containing a single item.
    #[inline]
    #[must_use]
    pub fn singleton(value: T) -> Self {
        Self::new().insert(value).0
    }

    /// Inserts `value` unless an item ordering equal to it is already stored.
    ///
    /// Returns the new tree and the item already stored, if any. When that
    /// item is `Some`, nothing was inserted and the returned tree shares its
    /// root with `self`. The returned item borrows `self`, so `self` must
    /// outlive it.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let empty = PersistentAvlTree::new();
    /// let (tree, existing) = empty.insert(1);
    /// assert_eq!(existing, None);
    ///
    /// let (same, existing) = tree.insert(1);
    /// assert_eq!(existing, Some(&1));
    /// assert_eq!(same.len(), 1);
    /// ```
    #[must_use]
    pub fn insert(&self, value: T) -> (Self, Option<&T>) {
        let (root, existing) = Node::insert(self.root.as_ref(), value);
        let length = if existing.is_none() {
            self.length + 1
        } else {
            self.length
        };
        (Self::from_parts(root, length), existing)
    }

    /// Replaces the item ordering equal to `value`, or inserts `value` when
    /// there is none.
    ///
    /// Returns the new tree and the replaced item, if any.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::{Compare, PersistentAvlTree};
    /// use std::cmp::Ordering;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Entry(u8, &'static str);
    ///
    /// impl Compare for Entry {
    ///     fn compare(&self, stored: &Entry) -> Ordering {
    ///         self.0.cmp(&stored.0)
    ///     }
    /// }
    ///
    /// let (tree, _) = PersistentAvlTree::new().insert(Entry(1, "old"));
    /// let (updated, previous) = tree.update(Entry(1, "new"));
    ///
    /// assert_eq!(previous, Some(&Entry(1, "old")));
    /// assert_eq!(updated.min(), Some(&Entry(1, "new")));
    /// assert_eq!(updated.len(), 1);
    /// ```
    #[must_use]
    pub fn update(&self, value: T) -> (Self, Option<&T>) {
        let (root, previous) = Node::update(self.root.as_ref(), value);
        let length = if previous.is_none() {
            self.length + 1
        } else {
            self.length
        };
        (Self::from_parts(root, length), previous)
    }

    /// Removes the item ordering equal to `key`.
    ///
    /// Returns the new tree and the removed item, if any. When nothing was
    /// removed the returned tree shares its root with `self`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::PersistentAvlTree;
    ///
    /// let tree: PersistentAvlTree<i32> = (1..=4).collect();
    /// let (smaller, removed) = tree.delete(&4);
    ///
    /// assert_eq!(removed, Some(&4));
    /// assert_eq!(tree.len(), 4);    // Original unchanged
    /// assert_eq!(smaller.len(), 3); // New version
    /// ```
    #[must_use]
    pub fn delete<Q>(&self, key: &Q) -> (Self, Option<&T>)
    where
        Q: Compare<T> + ?Sized,
    {
        let (root, removed) = Node::delete(self.root.as_ref(), key);
        let length = if removed.is_some() {
            self.length - 1
        } else {
            self.length
        };
        (Self::from_parts(root, length), removed)
    }
}

impl<T: Compare> PersistentAvlTree<T> {
    /// Checks every structural invariant of the tree.
    ///
    /// Verifies cached heights, balance factors, strict ascending order and
    /// the recorded length, reporting the first violation found.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] encountered.
    ///
    /// # Complexity
    ///
    /// O(N)
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        super::invariants::validate(self.root.as_ref(), self.length)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for PersistentAvlTree<T> {
    fn clone(&self) -> Self {
        Self::from_parts(self.root.clone(), self.length)
    }
}

impl<T> Default for PersistentAvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects items into a tree; of several equal items the first one wins.
impl<T: Compare + Clone> FromIterator<T> for PersistentAvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |tree, value| tree.insert(value).0)
    }
}

impl<T: Clone> IntoIterator for PersistentAvlTree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root, self.length)
    }
}

impl<'a, T> IntoIterator for &'a PersistentAvlTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two trees are equal when they hold equal items in the same order,
/// whatever their shapes.
impl<T: PartialEq> PartialEq for PersistentAvlTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && (self.ptr_eq(other) || self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for PersistentAvlTree<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentAvlTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn build(insert: &[i32], delete: &[i32]) -> PersistentAvlTree<i32> {
        let tree = insert.iter().fold(PersistentAvlTree::new(), |tree, &value| {
            let (tree, existing) = tree.insert(value);
            assert!(existing.is_none(), "malformed input: {value} inserted already");
            tree
        });
        delete.iter().fold(tree, |tree, value| {
            let (tree, removed) = tree.delete(value);
            assert!(removed.is_some(), "malformed input: {value} wasn't inserted");
            tree
        })
    }

    #[rstest]
    fn test_new_creates_empty_tree() {
        let tree: PersistentAvlTree<i32> = PersistentAvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
    }

    #[rstest]
    fn test_default_creates_empty_tree() {
        let tree: PersistentAvlTree<i32> = PersistentAvlTree::default();
        assert!(tree.is_empty());
        assert!(tree.ptr_eq(&PersistentAvlTree::new()));
    }

    #[rstest]
    fn test_singleton() {
        let tree = PersistentAvlTree::singleton(42);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.search(&42), Some(&42));
        assert_eq!(tree.height(), 1);
    }

    #[rstest]
    fn test_empty_tree_lookups_return_none() {
        let tree: PersistentAvlTree<i32> = PersistentAvlTree::new();
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        assert_eq!(tree.predecessor(&1), None);
        assert_eq!(tree.successor(&1), None);
        assert!(tree.in_order(|_| false));
    }

    #[rstest]
    fn test_insert_counts_only_new_items() {
        let tree = build(&[1, 2, 3], &[]);
        let (same, existing) = tree.insert(2);
        assert_eq!(existing, Some(&2));
        assert_eq!(same.len(), 3);
        assert!(same.ptr_eq(&tree));
    }

    #[rstest]
    fn test_insert_existing_item_borrows_input_tree() {
        let empty = PersistentAvlTree::new();
        let (tree, existing) = empty.insert(1);
        assert_eq!(existing, None);

        let (same, existing) = tree.insert(1);
        assert_eq!(existing, Some(&1));
        assert_eq!(same.len(), 1);
        drop(same);
        assert_eq!(existing, Some(&1));
    }

    #[rstest]
    fn test_update_counts_only_new_items() {
        let tree = build(&[1, 2, 3], &[]);
        let (replaced, previous) = tree.update(3);
        assert_eq!(previous, Some(&3));
        assert_eq!(replaced.len(), 3);
        assert!(!replaced.ptr_eq(&tree));

        let (grown, previous) = replaced.update(4);
        assert_eq!(previous, None);
        assert_eq!(grown.len(), 4);
    }

    #[rstest]
    fn test_delete_counts_only_removed_items() {
        let tree = build(&[1, 2, 3], &[]);
        let (same, removed) = tree.delete(&9);
        assert_eq!(removed, None);
        assert_eq!(same.len(), 3);

        let (smaller, removed) = tree.delete(&1);
        assert_eq!(removed, Some(&1));
        assert_eq!(smaller.len(), 2);
    }

    #[rstest]
    fn test_from_iterator_keeps_first_duplicate() {
        let tree: PersistentAvlTree<i32> = vec![3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_equality_ignores_shape() {
        let ascending = build(&[1, 2, 3, 4], &[]);
        let shuffled = build(&[3, 1, 4, 2], &[]);
        let different = build(&[1, 2, 3, 5], &[]);
        assert_eq!(ascending, shuffled);
        assert_ne!(ascending, different);
    }

    #[rstest]
    fn test_debug_lists_items_in_order() {
        let tree = build(&[2, 3, 1], &[]);
        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
    }

    #[rstest]
    fn test_clone_shares_root() {
        let tree = build(&[1, 2, 3], &[]);
        let copy = tree.clone();
        assert!(copy.ptr_eq(&tree));
    }

    #[rstest]
    fn test_validate_accepts_built_tree() {
        let tree = build(&[8, 3, 10, 1, 6, 14, 4, 7, 13], &[3, 10]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_validate_reports_length_mismatch() {
        let tree = build(&[1, 2], &[]);
        let broken = PersistentAvlTree::from_parts(tree.root.clone(), 5);
        assert_eq!(
            broken.validate(),
            Err(InvariantViolation::LengthMismatch {
                recorded: 5,
                counted: 2
            })
        );
    }
}
