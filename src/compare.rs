//! Three-way comparison between lookup keys and stored items.
//!
//! A [`PersistentAvlTree`](crate::PersistentAvlTree) only ever asks one
//! question of its items: how does this value order against a stored one?
//! That question is the [`Compare`] trait.
//!
//! The lookup type may differ from the stored type, as long as both agree on
//! the ordering:
//!
//! ```rust
//! use persistent_avl::{Compare, PersistentAvlTree};
//! use std::cmp::Ordering;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! struct UserId(u64);
//!
//! impl Compare for User {
//!     fn compare(&self, stored: &User) -> Ordering {
//!         self.id.cmp(&stored.id)
//!     }
//! }
//!
//! impl Compare<User> for UserId {
//!     fn compare(&self, stored: &User) -> Ordering {
//!         self.0.cmp(&stored.id)
//!     }
//! }
//!
//! let (tree, _) = PersistentAvlTree::new().insert(User { id: 42, name: "ada".to_string() });
//! assert_eq!(tree.search(&UserId(42)).map(|user| user.name.as_str()), Some("ada"));
//! assert_eq!(tree.search(&UserId(7)), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Orders `self` against an item stored in a tree.
///
/// Implementations must describe a total, transitive order that stays the
/// same for as long as the item is stored.
pub trait Compare<Stored: ?Sized = Self> {
    /// Reports whether `self` is less than, equal to or greater than `stored`.
    fn compare(&self, stored: &Stored) -> Ordering;
}

macro_rules! impl_compare_for_ord {
    ($($type:ty),* $(,)?) => {
        $(
            impl Compare for $type {
                #[inline]
                fn compare(&self, stored: &Self) -> Ordering {
                    self.cmp(stored)
                }
            }
        )*
    };
}

impl_compare_for_ord!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, bool, String,
);

impl Compare<String> for str {
    #[inline]
    fn compare(&self, stored: &String) -> Ordering {
        self.cmp(stored.as_str())
    }
}

// =============================================================================
// Ordered Adapter
// =============================================================================

/// Lends [`Compare`] to any [`Ord`] type.
///
/// A bare `T` can be used to look up an `Ordered<T>`:
///
/// ```rust
/// use persistent_avl::{Ordered, PersistentAvlTree};
///
/// let tree: PersistentAvlTree<Ordered<(u8, u8)>> =
///     [(1, 2), (0, 9), (1, 0)].into_iter().map(Ordered).collect();
///
/// assert_eq!(tree.min().map(|item| item.0), Some((0, 9)));
/// assert!(tree.contains(&(1_u8, 0_u8)));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ordered<T>(pub T);

impl<T> Ordered<T> {
    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Ord> Compare for Ordered<T> {
    #[inline]
    fn compare(&self, stored: &Self) -> Ordering {
        self.0.cmp(&stored.0)
    }
}

impl<T: Ord> Compare<Ordered<T>> for T {
    #[inline]
    fn compare(&self, stored: &Ordered<T>) -> Ordering {
        self.cmp(&stored.0)
    }
}

impl<T> Deref for Ordered<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Ordered<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Ordered<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl<T: fmt::Display> fmt::Display for Ordered<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2, Ordering::Less)]
    #[case(2, 2, Ordering::Equal)]
    #[case(3, 2, Ordering::Greater)]
    fn test_integer_compare(#[case] left: i32, #[case] right: i32, #[case] expected: Ordering) {
        assert_eq!(left.compare(&right), expected);
    }

    #[rstest]
    fn test_str_compares_against_string() {
        let stored = "banana".to_string();
        assert_eq!("apple".compare(&stored), Ordering::Less);
        assert_eq!("banana".compare(&stored), Ordering::Equal);
        assert_eq!("cherry".compare(&stored), Ordering::Greater);
    }

    #[rstest]
    fn test_ordered_compares_by_inner_value() {
        assert_eq!(Ordered("a").compare(&Ordered("b")), Ordering::Less);
        assert_eq!((1, 'x').compare(&Ordered((1, 'x'))), Ordering::Equal);
        assert_eq!(Ordered(vec![2]).compare(&Ordered(vec![1, 9])), Ordering::Greater);
    }

    #[rstest]
    fn test_ordered_is_transparent() {
        let ordered = Ordered(String::from("value"));
        assert_eq!(ordered.len(), 5);
        assert_eq!(format!("{ordered:?}"), "\"value\"");
        assert_eq!(format!("{ordered}"), "value");
        assert_eq!(ordered.into_inner(), "value");
    }
}
