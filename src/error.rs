//! Error types for tree verification.
//!
//! Looking up a missing item is never an error: every point operation reports
//! absence as `None`. The only error this crate knows is a structural one,
//! reported by [`PersistentAvlTree::validate`](crate::PersistentAvlTree::validate).

use std::fmt;

/// A broken structural invariant found while validating a tree.
///
/// Positions are 0-based indexes in pre-order (for node-level problems) or
/// in-order (for ordering problems).
///
/// # Examples
///
/// ```rust
/// use persistent_avl::InvariantViolation;
///
/// let violation = InvariantViolation::LengthMismatch { recorded: 3, counted: 2 };
/// assert_eq!(
///     violation.to_string(),
///     "avl: recorded length 3 differs from 2 counted items"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A node's cached height is not `1 + max(left, right)`.
    HeightMismatch {
        /// Pre-order position of the node.
        position: usize,
        /// The height stored in the node.
        cached: u32,
        /// The height computed from its children.
        computed: u32,
    },
    /// A node's balance factor lies outside `{-1, 0, 1}`.
    Unbalanced {
        /// Pre-order position of the node.
        position: usize,
        /// `height(right) - height(left)`.
        balance_factor: i64,
    },
    /// The in-order sequence is not strictly ascending.
    OutOfOrder {
        /// In-order position of the first item not greater than its predecessor.
        position: usize,
    },
    /// The tree's recorded length disagrees with its number of items.
    LengthMismatch {
        /// The length stored in the tree handle.
        recorded: usize,
        /// The number of items reached by a full traversal.
        counted: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeightMismatch {
                position,
                cached,
                computed,
            } => write!(
                formatter,
                "avl: node {position} caches height {cached} but its children give {computed}"
            ),
            Self::Unbalanced {
                position,
                balance_factor,
            } => write!(
                formatter,
                "avl: node {position} has balance factor {balance_factor}"
            ),
            Self::OutOfOrder { position } => write!(
                formatter,
                "avl: item {position} is not greater than the item before it"
            ),
            Self::LengthMismatch { recorded, counted } => write!(
                formatter,
                "avl: recorded length {recorded} differs from {counted} counted items"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
