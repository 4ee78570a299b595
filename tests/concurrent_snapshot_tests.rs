//! Integration tests for sharing PersistentAvlTree versions across threads.
//!
//! These tests verify that with the `arc` feature enabled, tree versions can
//! be read from many threads while a single writer publishes new versions.

#![cfg(feature = "arc")]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use parking_lot::{Mutex, RwLock};
use persistent_avl::PersistentAvlTree;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

// =============================================================================
// Shared Read-Only Versions
// =============================================================================

#[rstest]
fn test_tree_shared_across_threads() {
    let tree: Arc<PersistentAvlTree<i32>> = Arc::new((0..100).collect());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree_clone = Arc::clone(&tree);
            thread::spawn(move || {
                assert_eq!(tree_clone.len(), 100);
                assert_eq!(tree_clone.min(), Some(&0));
                assert_eq!(tree_clone.max(), Some(&99));
                assert!((0..100).all(|value| tree_clone.contains(&value)));
                assert_eq!(tree_clone.validate(), Ok(()));
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

#[rstest]
fn test_tree_derivations_from_shared_base() {
    let base: PersistentAvlTree<i32> = (0..32).map(|value| value * 10).collect();

    let results: Vec<_> = (0..4)
        .map(|index| {
            let base_clone = base.clone();
            thread::spawn(move || {
                let (grown, existing) = base_clone.insert(index * 10 + 5);
                assert!(existing.is_none());
                let (shrunk, removed) = grown.delete(&(index * 10));
                assert_eq!(removed, Some(&(index * 10)));
                assert_eq!(base_clone.len(), 32);
                shrunk
            })
        })
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, tree) in results.iter().enumerate() {
        let index = index as i32;
        assert_eq!(tree.len(), 32);
        assert!(tree.contains(&(index * 10 + 5)));
        assert!(!tree.contains(&(index * 10)));
        assert_eq!(tree.validate(), Ok(()));
    }
    assert_eq!(
        base.iter().copied().collect::<Vec<_>>(),
        (0..32).map(|value| value * 10).collect::<Vec<_>>()
    );
}

// =============================================================================
// Published Versions
// =============================================================================

#[rstest]
fn test_readers_observe_complete_versions() {
    let published = Arc::new(RwLock::new(PersistentAvlTree::<i32>::new()));
    let writer_lock = Arc::new(Mutex::new(()));

    let writers: Vec<_> = (0..4)
        .map(|index| {
            let published = Arc::clone(&published);
            let writer_lock = Arc::clone(&writer_lock);
            thread::spawn(move || {
                for offset in 0..50 {
                    let _serialized = writer_lock.lock();
                    let current = published.read().clone();
                    let (next, _) = current.insert(index * 1000 + offset);
                    *published.write() = next;
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let published = Arc::clone(&published);
            thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = published.read().clone();
                    assert_eq!(snapshot.validate(), Ok(()));
                    assert_eq!(snapshot.iter().count(), snapshot.len());
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("Thread panicked");
    }

    let final_tree = published.read().clone();
    assert_eq!(final_tree.len(), 200);
    assert_eq!(final_tree.validate(), Ok(()));
}

#[rstest]
fn test_snapshot_survives_later_publications() {
    let published = RwLock::new((0..10).collect::<PersistentAvlTree<i32>>());
    let snapshot = published.read().clone();

    let next = {
        let current = published.read();
        current.delete(&0).0
    };
    *published.write() = next;

    assert_eq!(snapshot.len(), 10);
    assert!(snapshot.contains(&0));
    assert!(!published.read().contains(&0));
}
