//! # persistent-avl
//!
//! An immutable AVL tree providing ordered storage with structural sharing
//! across versions.
//!
//! ## Overview
//!
//! Every modifying operation (insert, update, delete) clones only the nodes on
//! the path from the root to the affected item and returns a new tree. All
//! other subtrees are shared by reference between the old and the new version,
//! so a modification costs O(log N) allocations and never disturbs readers of
//! an earlier version.
//!
//! - [`Compare`]: the single capability an item type has to provide
//! - [`PersistentAvlTree`]: the value-semantics tree handle
//! - [`InvariantViolation`]: what [`PersistentAvlTree::validate`] reports
//!
//! ## Feature Flags
//!
//! - `arc` (default): nodes are shared through `Arc`, trees are `Send + Sync`
//! - `tracing`: rotations and balancing failures emit `tracing` events
//!
//! ## Example
//!
//! ```rust
//! use persistent_avl::prelude::*;
//!
//! let (tree, _) = PersistentAvlTree::new().insert(1);
//! let (tree, _) = tree.insert(2);
//! let (tree, _) = tree.insert(3);
//! let (tree, _) = tree.insert(4);
//! let (tree, removed) = tree.delete(&4);
//!
//! assert_eq!(removed, Some(&4));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```
//!
//! ## Sharing a tree between threads
//!
//! Readers never need a lock to read a tree they hold. Publishing a new
//! version as the "current" one is left to the caller; a read-write lock
//! around the handle is enough, and writers must be serialized among
//! themselves:
//!
//! ```rust
//! # #[cfg(feature = "arc")]
//! # {
//! use persistent_avl::PersistentAvlTree;
//! use std::sync::{Arc, Mutex, RwLock};
//! use std::thread;
//!
//! let current = Arc::new(RwLock::new(PersistentAvlTree::<u32>::new()));
//! let writer_lock = Arc::new(Mutex::new(()));
//!
//! let writers: Vec<_> = (0..4)
//!     .map(|worker| {
//!         let current = Arc::clone(&current);
//!         let writer_lock = Arc::clone(&writer_lock);
//!         thread::spawn(move || {
//!             for offset in 0..25 {
//!                 let _serialized = writer_lock.lock().unwrap();
//!                 let snapshot = current.read().unwrap().clone();
//!                 let (next, _) = snapshot.insert(worker * 100 + offset);
//!                 *current.write().unwrap() = next;
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for writer in writers {
//!     writer.join().unwrap();
//! }
//! assert_eq!(current.read().unwrap().len(), 100);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use persistent_avl::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::*;
    pub use crate::error::*;
    pub use crate::persistent::*;
}

#[macro_use]
mod trace;

pub mod compare;
pub mod error;
pub mod persistent;

pub use compare::{Compare, Ordered};
pub use error::InvariantViolation;
pub use persistent::PersistentAvlTree;
