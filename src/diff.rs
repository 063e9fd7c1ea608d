//! Set-style diffing of declared element lists against what the map has attached.
//!
//! Elements are matched by structural equality, not position or identity, since the declared
//! list is rebuilt from scratch on every render. Equality is tolerance-based and therefore not
//! hash-consistent, so matching is a plain nested scan; map element lists are small enough
//! that this doesn't matter.

use std::sync::Arc;

/// Elements to remove from and add to the map.
#[derive(Debug)]
pub struct CollectionDiff<T: ?Sized> {
    pub to_remove: Vec<Arc<T>>,
    pub to_add: Vec<Arc<T>>,
}

impl<T: ?Sized> CollectionDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    /// Applies the diff to a target; removals first.
    pub fn apply<C: ?Sized>(
        self,
        target: &mut C,
        mut remove: impl FnMut(&mut C, &Arc<T>),
        mut add: impl FnMut(&mut C, Arc<T>),
    ) {
        for element in &self.to_remove {
            remove(target, element);
        }
        for element in self.to_add {
            add(target, element);
        }
    }
}

/// Computes which attached elements must go and which declared elements must be added.
///
/// - an attached element is removed if no declared element equals it
/// - a declared element is added if no attached element equals it
///
/// If the declared list contains several elements that are equal to each other, only the
/// first is added: structurally equal elements are the same element as far as the map is
/// concerned.
pub fn diff<T: ?Sized>(
    declared: &[Arc<T>],
    attached: &[Arc<T>],
    eq: impl Fn(&T, &T) -> bool,
) -> CollectionDiff<T> {
    let to_remove = attached
        .iter()
        .filter(|a| !declared.iter().any(|d| eq(d, a)))
        .cloned()
        .collect();

    let mut to_add: Vec<Arc<T>> = Vec::new();
    for (i, element) in declared.iter().enumerate() {
        if attached.iter().any(|a| eq(a, element)) {
            continue;
        }
        if declared[..i].iter().any(|d| eq(d, element)) {
            tracing::debug!(index = i, "collapsing structurally equal declared element");
            continue;
        }
        to_add.push(Arc::clone(element));
    }

    CollectionDiff { to_remove, to_add }
}
