//! Lazy traversals over a [`PersistentAvlTree`](super::PersistentAvlTree).
//!
//! Each iterator walks the tree with an explicit stack, so nothing is
//! collected up front and dropping the iterator early stops the walk. Every
//! call to `iter*` starts a fresh traversal.

use super::ReferenceCounter;
use super::node::{Link, Node};
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// Inline stack capacity; an AVL tree of height 32 holds millions of items.
const STACK_INLINE_CAPACITY: usize = 32;

type NodeRef<'a, T> = &'a ReferenceCounter<Node<T>>;

// =============================================================================
// In-Order Iterator
// =============================================================================

/// An iterator over the items of a tree in ascending order.
///
/// Created by [`PersistentAvlTree::iter`](super::PersistentAvlTree::iter).
pub struct Iter<'a, T> {
    stack: SmallVec<[NodeRef<'a, T>; STACK_INLINE_CAPACITY]>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<NodeRef<'a, T>>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut link: Option<NodeRef<'a, T>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_ref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_ref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Pre-Order Iterator
// =============================================================================

/// An iterator visiting each node before its left and then right subtree.
///
/// Created by [`PersistentAvlTree::iter_pre_order`](super::PersistentAvlTree::iter_pre_order).
pub struct PreOrderIter<'a, T> {
    stack: SmallVec<[NodeRef<'a, T>; STACK_INLINE_CAPACITY]>,
    remaining: usize,
}

impl<'a, T> PreOrderIter<'a, T> {
    pub(crate) fn new(root: Option<NodeRef<'a, T>>, length: usize) -> Self {
        Self {
            stack: root.into_iter().collect(),
            remaining: length,
        }
    }
}

impl<'a, T> Iterator for PreOrderIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_ref());
        self.stack.extend(node.left.as_ref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PreOrderIter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for PreOrderIter<'_, T> {}

impl<T> Clone for PreOrderIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Post-Order Iterator
// =============================================================================

/// An iterator visiting both subtrees of a node before the node itself.
///
/// Created by [`PersistentAvlTree::iter_post_order`](super::PersistentAvlTree::iter_post_order).
pub struct PostOrderIter<'a, T> {
    /// Nodes paired with whether their subtrees were already pushed.
    stack: SmallVec<[(NodeRef<'a, T>, bool); STACK_INLINE_CAPACITY]>,
    remaining: usize,
}

impl<'a, T> PostOrderIter<'a, T> {
    pub(crate) fn new(root: Option<NodeRef<'a, T>>, length: usize) -> Self {
        Self {
            stack: root.map(|node| (node, false)).into_iter().collect(),
            remaining: length,
        }
    }
}

impl<'a, T> Iterator for PostOrderIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(&node.value);
            }
            self.stack.push((node, true));
            self.stack.extend(node.right.as_ref().map(|right| (right, false)));
            self.stack.extend(node.left.as_ref().map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PostOrderIter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for PostOrderIter<'_, T> {}

impl<T> Clone for PostOrderIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the items of a tree in ascending order.
///
/// Nodes may be shared with other trees, so items are cloned out.
pub struct IntoIter<T> {
    stack: SmallVec<[ReferenceCounter<Node<T>>; STACK_INLINE_CAPACITY]>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(root: Link<T>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut link: Link<T>) {
        while let Some(node) = link {
            link = node.left.clone();
            self.stack.push(node);
        }
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.clone());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.value.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone> FusedIterator for IntoIter<T> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::PersistentAvlTree;
    use rstest::rstest;

    fn tree_of(values: &[i32]) -> PersistentAvlTree<i32> {
        values.iter().copied().collect()
    }

    #[rstest]
    fn test_iter_on_empty_tree() {
        let tree = tree_of(&[]);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter_pre_order().next(), None);
        assert_eq!(tree.iter_post_order().next(), None);
    }

    #[rstest]
    fn test_iterators_follow_traversal_orders() {
        //    2
        //   / \
        //  1   4
        //     / \
        //    3   5
        let tree = tree_of(&[1, 2, 3, 4, 5]);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(
            tree.iter_pre_order().copied().collect::<Vec<_>>(),
            vec![2, 1, 4, 3, 5]
        );
        assert_eq!(
            tree.iter_post_order().copied().collect::<Vec<_>>(),
            vec![1, 3, 5, 4, 2]
        );
    }

    #[rstest]
    fn test_iterators_report_exact_length() {
        let tree = tree_of(&[5, 3, 8, 1, 4]);
        let mut iterator = tree.iter();
        assert_eq!(iterator.len(), 5);
        iterator.next();
        assert_eq!(iterator.len(), 4);

        let mut pre_order = tree.iter_pre_order();
        pre_order.next();
        pre_order.next();
        assert_eq!(pre_order.size_hint(), (3, Some(3)));

        let post_order = tree.iter_post_order();
        assert_eq!(post_order.count(), 5);
    }

    #[rstest]
    fn test_iter_is_restartable() {
        let tree = tree_of(&[2, 1, 3]);
        let mut first = tree.iter();
        assert_eq!(first.next(), Some(&1));
        let resumed = first.clone();

        assert_eq!(tree.iter().next(), Some(&1));
        assert_eq!(resumed.copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(first.copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[rstest]
    fn test_iter_is_fused() {
        let tree = tree_of(&[1]);
        let mut iterator = tree.iter();
        assert_eq!(iterator.next(), Some(&1));
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_into_iter_outlives_shared_versions() {
        let tree = tree_of(&[4, 2, 6]);
        let (grown, _) = tree.insert(5);
        let items: Vec<i32> = tree.into_iter().collect();
        assert_eq!(items, vec![2, 4, 6]);
        assert_eq!(grown.into_iter().len(), 4);
    }
}
