//! Whole-tree structural checks backing [`PersistentAvlTree::validate`].
//!
//! [`PersistentAvlTree::validate`]: super::PersistentAvlTree::validate

use super::ReferenceCounter;
use super::iterators::Iter;
use super::node::Node;
use crate::compare::Compare;
use crate::error::InvariantViolation;
use std::cmp::Ordering;

pub(crate) fn validate<T: Compare>(
    root: Option<&ReferenceCounter<Node<T>>>,
    length: usize,
) -> Result<(), InvariantViolation> {
    let mut position = 0;
    check_shape(root, &mut position)?;
    check_order(root, length)
}

/// Checks cached heights and balance factors in pre-order.
fn check_shape<T>(
    link: Option<&ReferenceCounter<Node<T>>>,
    position: &mut usize,
) -> Result<(), InvariantViolation> {
    let Some(node) = link else {
        return Ok(());
    };
    let current = *position;
    *position += 1;

    let computed = node.computed_height();
    if node.height != computed {
        return Err(InvariantViolation::HeightMismatch {
            position: current,
            cached: node.height,
            computed,
        });
    }
    let balance_factor = node.balance_factor();
    if !(-1..=1).contains(&balance_factor) {
        return Err(InvariantViolation::Unbalanced {
            position: current,
            balance_factor,
        });
    }

    check_shape(node.left.as_ref(), position)?;
    check_shape(node.right.as_ref(), position)
}

/// Checks strict ascending order and the recorded length in one in-order pass.
fn check_order<T: Compare>(
    root: Option<&ReferenceCounter<Node<T>>>,
    length: usize,
) -> Result<(), InvariantViolation> {
    let mut counted = 0;
    let mut previous: Option<&T> = None;
    for value in Iter::new(root, length) {
        if let Some(previous) = previous
            && value.compare(previous) != Ordering::Greater
        {
            return Err(InvariantViolation::OutOfOrder { position: counted });
        }
        previous = Some(value);
        counted += 1;
    }
    if counted == length {
        Ok(())
    } else {
        Err(InvariantViolation::LengthMismatch {
            recorded: length,
            counted,
        })
    }
}
