//! Node layer of the persistent AVL tree.
//!
//! Every algorithm is an associated function over an optional node reference
//! (`None` is the empty subtree). Modifying functions never touch a node that
//! may be reachable from a published tree: they build fresh nodes for the
//! root-to-target path and share every other subtree by reference.
//!
//! # Rebalancing
//!
//! After each structural change the rebuilt ancestor is rebalanced, bottom-up.
//! With `b = height(right) - height(left)`:
//!
//! ```text
//!  b < -1, left b <= 0       b > 1, right b >= 0
//!
//!      (a)      b            (a)           b
//!      /       / \             \          / \
//!     b   =>  c   a             b    =>  a   c
//!    /                           \
//!   c                             c
//!
//!  b < -1, left b > 0        b > 1, right b < 0
//!
//!      a        (a)      b    a       (a)          b
//!     /         /       / \    \        \         / \
//!   (c)   =>   b   =>  c   a   (c) =>    b   =>  a   c
//!     \       /                /          \
//!      b     c                b            c
//! ```

use super::ReferenceCounter;
use crate::compare::Compare;
use std::cmp::Ordering;

/// An optional shared node: `None` is the empty subtree.
pub(crate) type Link<T> = Option<ReferenceCounter<Node<T>>>;

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the AVL tree.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: u32,
}

/// Height of an optional subtree; the empty subtree has height 0.
pub(crate) fn height<T>(link: Option<&ReferenceCounter<Node<T>>>) -> u32 {
    link.map_or(0, |node| node.height)
}

fn balance_factor<T>(link: Option<&ReferenceCounter<Node<T>>>) -> i64 {
    link.map_or(0, |node| node.balance_factor())
}

impl<T> Node<T> {
    /// Creates a node with no children.
    const fn leaf(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Creates a node over the given children, computing its height.
    fn branch(value: T, left: Link<T>, right: Link<T>) -> Self {
        let mut node = Self {
            value,
            left,
            right,
            height: 0,
        };
        node.adjust_height();
        node
    }

    /// The height implied by the children: `1 + max(left, right)`.
    pub(crate) fn computed_height(&self) -> u32 {
        height(self.left.as_ref()).max(height(self.right.as_ref())) + 1
    }

    fn adjust_height(&mut self) {
        self.height = self.computed_height();
    }

    /// `height(right) - height(left)`.
    pub(crate) fn balance_factor(&self) -> i64 {
        i64::from(height(self.right.as_ref())) - i64::from(height(self.left.as_ref()))
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Finds the stored item ordering equal to `key`.
    pub(crate) fn search<'a, Q>(
        link: Option<&'a ReferenceCounter<Self>>,
        key: &Q,
    ) -> Option<&'a T>
    where
        Q: Compare<T> + ?Sized,
    {
        link.and_then(|node| match key.compare(&node.value) {
            Ordering::Less => Self::search(node.left.as_ref(), key),
            Ordering::Greater => Self::search(node.right.as_ref(), key),
            Ordering::Equal => Some(&node.value),
        })
    }

    pub(crate) fn min(link: Option<&ReferenceCounter<Self>>) -> Option<&T> {
        link.and_then(|node| {
            node.left
                .as_ref()
                .map_or_else(|| Some(&node.value), |left| Self::min(Some(left)))
        })
    }

    pub(crate) fn max(link: Option<&ReferenceCounter<Self>>) -> Option<&T> {
        link.and_then(|node| {
            node.right
                .as_ref()
                .map_or_else(|| Some(&node.value), |right| Self::max(Some(right)))
        })
    }

    /// Greatest stored item strictly less than `key`, whether or not `key`
    /// itself is stored.
    pub(crate) fn predecessor<'a, Q>(
        link: Option<&'a ReferenceCounter<Self>>,
        key: &Q,
    ) -> Option<&'a T>
    where
        Q: Compare<T> + ?Sized,
    {
        link.and_then(|node| match key.compare(&node.value) {
            Ordering::Less => Self::predecessor(node.left.as_ref(), key),
            Ordering::Greater => {
                Self::predecessor(node.right.as_ref(), key).or(Some(&node.value))
            }
            Ordering::Equal => Self::max(node.left.as_ref()),
        })
    }

    /// Smallest stored item strictly greater than `key`, whether or not `key`
    /// itself is stored.
    pub(crate) fn successor<'a, Q>(
        link: Option<&'a ReferenceCounter<Self>>,
        key: &Q,
    ) -> Option<&'a T>
    where
        Q: Compare<T> + ?Sized,
    {
        link.and_then(|node| match key.compare(&node.value) {
            Ordering::Less => Self::successor(node.left.as_ref(), key).or(Some(&node.value)),
            Ordering::Greater => Self::successor(node.right.as_ref(), key),
            Ordering::Equal => Self::min(node.right.as_ref()),
        })
    }

    // =========================================================================
    // Visitor Traversals
    // =========================================================================

    // Each returns `false` as soon as the visitor does, without visiting any
    // further node.

    pub(crate) fn in_order<F>(link: Option<&ReferenceCounter<Self>>, visitor: &mut F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        link.is_none_or(|node| {
            Self::in_order(node.left.as_ref(), visitor)
                && visitor(&node.value)
                && Self::in_order(node.right.as_ref(), visitor)
        })
    }

    pub(crate) fn pre_order<F>(link: Option<&ReferenceCounter<Self>>, visitor: &mut F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        link.is_none_or(|node| {
            visitor(&node.value)
                && Self::pre_order(node.left.as_ref(), visitor)
                && Self::pre_order(node.right.as_ref(), visitor)
        })
    }

    pub(crate) fn post_order<F>(link: Option<&ReferenceCounter<Self>>, visitor: &mut F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        link.is_none_or(|node| {
            Self::post_order(node.left.as_ref(), visitor)
                && Self::post_order(node.right.as_ref(), visitor)
                && visitor(&node.value)
        })
    }
}

impl<T: Clone> Node<T> {
    /// Copies this node (sharing both children) with new children.
    fn with_children(&self, left: Link<T>, right: Link<T>) -> Self {
        Self::branch(self.value.clone(), left, right)
    }

    /// Rebalances a freshly built node and shares it.
    fn rebuilt(node: Self) -> ReferenceCounter<Self> {
        ReferenceCounter::new(Self::rebalance(node))
    }

    // =========================================================================
    // Modifications
    // =========================================================================

    /// Inserts `value` unless an equal item is already stored.
    ///
    /// Returns the new subtree root and, when nothing was inserted, the item
    /// already stored. In that case the returned root is `link` itself.
    pub(crate) fn insert<'a>(
        link: Option<&'a ReferenceCounter<Self>>,
        value: T,
    ) -> (Link<T>, Option<&'a T>)
    where
        T: Compare,
    {
        let Some(node) = link else {
            return (Some(ReferenceCounter::new(Self::leaf(value))), None);
        };
        match value.compare(&node.value) {
            Ordering::Less => match Self::insert(node.left.as_ref(), value) {
                (_, Some(existing)) => (Some(ReferenceCounter::clone(node)), Some(existing)),
                (left, None) => (
                    Some(Self::rebuilt(node.with_children(left, node.right.clone()))),
                    None,
                ),
            },
            Ordering::Greater => match Self::insert(node.right.as_ref(), value) {
                (_, Some(existing)) => (Some(ReferenceCounter::clone(node)), Some(existing)),
                (right, None) => (
                    Some(Self::rebuilt(node.with_children(node.left.clone(), right))),
                    None,
                ),
            },
            Ordering::Equal => (Some(ReferenceCounter::clone(node)), Some(&node.value)),
        }
    }

    /// Replaces the item equal to `value`, or inserts `value` if there is none.
    ///
    /// Returns the new subtree root and the replaced item, if any.
    pub(crate) fn update<'a>(
        link: Option<&'a ReferenceCounter<Self>>,
        value: T,
    ) -> (Link<T>, Option<&'a T>)
    where
        T: Compare,
    {
        let Some(node) = link else {
            return (Some(ReferenceCounter::new(Self::leaf(value))), None);
        };
        match value.compare(&node.value) {
            Ordering::Less => {
                let (left, previous) = Self::update(node.left.as_ref(), value);
                (
                    Some(Self::rebuilt(node.with_children(left, node.right.clone()))),
                    previous,
                )
            }
            Ordering::Greater => {
                let (right, previous) = Self::update(node.right.as_ref(), value);
                (
                    Some(Self::rebuilt(node.with_children(node.left.clone(), right))),
                    previous,
                )
            }
            Ordering::Equal => {
                let replaced = Self {
                    value,
                    left: node.left.clone(),
                    right: node.right.clone(),
                    height: node.height,
                };
                (Some(ReferenceCounter::new(replaced)), Some(&node.value))
            }
        }
    }

    /// Removes the item equal to `key`.
    ///
    /// Returns the new subtree root and the removed item. When `key` is not
    /// stored, the returned root is `link` itself and nothing is cloned.
    pub(crate) fn delete<'a, Q>(
        link: Option<&'a ReferenceCounter<Self>>,
        key: &Q,
    ) -> (Link<T>, Option<&'a T>)
    where
        Q: Compare<T> + ?Sized,
    {
        let Some(node) = link else {
            return (None, None);
        };
        match key.compare(&node.value) {
            Ordering::Less => match Self::delete(node.left.as_ref(), key) {
                (left, Some(removed)) => (
                    Some(Self::rebuilt(node.with_children(left, node.right.clone()))),
                    Some(removed),
                ),
                (_, None) => (Some(ReferenceCounter::clone(node)), None),
            },
            Ordering::Greater => match Self::delete(node.right.as_ref(), key) {
                (right, Some(removed)) => (
                    Some(Self::rebuilt(node.with_children(node.left.clone(), right))),
                    Some(removed),
                ),
                (_, None) => (Some(ReferenceCounter::clone(node)), None),
            },
            Ordering::Equal => (Self::destroy(node), Some(&node.value)),
        }
    }

    /// The subtree that remains once `node` itself is removed.
    fn destroy(node: &ReferenceCounter<Self>) -> Link<T> {
        match (&node.left, &node.right) {
            (Some(left), Some(_)) => {
                //    (a)           e
                //    / \          / \
                //   b   c  =>    b   c
                //  / \          /
                // d  [e]       d
                let (remaining, max) = Self::remove_max(left);
                Some(Self::rebuilt(Self::branch(
                    max.clone(),
                    remaining,
                    node.right.clone(),
                )))
            }
            (Some(child), None) | (None, Some(child)) => Some(ReferenceCounter::clone(child)),
            (None, None) => None,
        }
    }

    /// Removes the rightmost node of a non-empty subtree.
    ///
    /// Returns the remaining subtree and the removed maximum item.
    fn remove_max(node: &ReferenceCounter<Self>) -> (Link<T>, &T) {
        match &node.right {
            None => (node.left.clone(), &node.value),
            Some(right) => {
                let (remaining, max) = Self::remove_max(right);
                (
                    Some(Self::rebuilt(node.with_children(node.left.clone(), remaining))),
                    max,
                )
            }
        }
    }

    // =========================================================================
    // Balancing
    // =========================================================================

    /// Restores the balance of a node whose children are balanced and differ
    /// in height by at most 2.
    ///
    /// # Panics
    ///
    /// Panics if the node is still unbalanced afterwards, which means the
    /// rebalancing logic itself is broken.
    fn rebalance(mut node: Self) -> Self {
        let balance = node.balance_factor();
        let rebalanced = if balance < -1 {
            if balance_factor(node.left.as_ref()) > 0 {
                node.left = node
                    .left
                    .take()
                    .map(|left| ReferenceCounter::new(Self::rotate_left(unshare(left))));
            }
            Self::rotate_right(node)
        } else if balance > 1 {
            if balance_factor(node.right.as_ref()) < 0 {
                node.right = node
                    .right
                    .take()
                    .map(|right| ReferenceCounter::new(Self::rotate_right(unshare(right))));
            }
            Self::rotate_left(node)
        } else {
            return node;
        };

        let remaining = rebalanced.balance_factor();
        if !(-1..=1).contains(&remaining) {
            avl_error!(
                balance_factor = remaining,
                height = rebalanced.height,
                "subtree still unbalanced after rotation"
            );
            panic!("avl: internal error: balancing error (balance factor {remaining})");
        }
        rebalanced
    }

    fn rotate_right(mut node: Self) -> Self {
        //     (a)        b
        //     / \       / \
        //    b   c =>  d   a
        //   / \           / \
        //  d   e         e   c
        let Some(left) = node.left.take() else {
            unreachable!("avl: internal error: rotation without a left child");
        };
        let mut root = unshare(left);
        node.left = root.right.take();
        node.adjust_height();
        root.right = Some(ReferenceCounter::new(node));
        root.adjust_height();
        avl_trace!(direction = "right", height = root.height, "rotation");
        root
    }

    fn rotate_left(mut node: Self) -> Self {
        //     c         (a)
        //    / \        / \
        //   a   e  <=  b   c
        //  / \            / \
        // b   d          d   e
        let Some(right) = node.right.take() else {
            unreachable!("avl: internal error: rotation without a right child");
        };
        let mut root = unshare(right);
        node.right = root.left.take();
        node.adjust_height();
        root.left = Some(ReferenceCounter::new(node));
        root.adjust_height();
        avl_trace!(direction = "left", height = root.height, "rotation");
        root
    }
}

/// Takes a node out of its counter, cloning it unless this is the only
/// reference. A node no published tree can reach is reused in place.
fn unshare<T: Clone>(node: ReferenceCounter<Node<T>>) -> Node<T> {
    ReferenceCounter::unwrap_or_clone(node)
}

// =============================================================================
// Tests
// =============================================================================
