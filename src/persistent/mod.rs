//! Persistent (immutable) AVL tree.
//!
//! - [`PersistentAvlTree`]: the tree handle with value semantics
//! - [`Iter`], [`PreOrderIter`], [`PostOrderIter`]: lazy traversals
//! - [`IntoIter`]: owning in-order traversal
//!
//! # Structural Sharing
//!
//! A modification clones the nodes on the root-to-target path and reuses every
//! other subtree by reference, so any number of versions can coexist:
//!
//! ```rust
//! use persistent_avl::PersistentAvlTree;
//!
//! let base: PersistentAvlTree<i32> = (1..=7).collect();
//! let (grown, _) = base.insert(8);
//! let (shrunk, _) = base.delete(&1);
//!
//! assert_eq!(base.len(), 7);    // Original unchanged
//! assert_eq!(grown.len(), 8);   // One version
//! assert_eq!(shrunk.len(), 6);  // Another version
//! assert!(grown.contains(&1) && !shrunk.contains(&1));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type used for nodes.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets trees cross threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod invariants;
mod iterators;
mod node;
mod tree;

pub use iterators::IntoIter;
pub use iterators::Iter;
pub use iterators::PostOrderIter;
pub use iterators::PreOrderIter;
pub use tree::PersistentAvlTree;

// =============================================================================
// Tests
// =============================================================================
