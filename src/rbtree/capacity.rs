use super::RBTree;
use crate::hooks::{Comparator, Disposer};
use crate::raw::RawRBTree;

impl<T: Ord> RBTree<T> {
    /// Creates an empty tree with room for at least `capacity` payloads before
    /// its node arena has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree: RBTree<i32> = RBTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTree {
            raw: RawRBTree::with_capacity(capacity),
            comparator: crate::NaturalOrder,
            disposer: crate::DropDisposer,
        }
    }
}

impl<T, C: Comparator<T>, D: Disposer<T>> RBTree<T, C, D> {
    /// Like [`with_comparator_and_disposer`](RBTree::with_comparator_and_disposer),
    /// with room for at least `capacity` payloads.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{DropDisposer, RBTree};
    ///
    /// let tree: RBTree<u8, _, _> = RBTree::with_capacity_and_hooks(8, |a: &u8, b: &u8| a.cmp(b), DropDisposer);
    /// assert!(tree.capacity() >= 8);
    /// ```
    pub fn with_capacity_and_hooks(capacity: usize, comparator: C, disposer: D) -> Self {
        RBTree {
            raw: RawRBTree::with_capacity(capacity),
            comparator,
            disposer,
        }
    }
}

impl<T, C, D: Disposer<T>> RBTree<T, C, D> {
    /// Returns how many payloads the node arena can hold before it grows.
    ///
    /// Slots freed by [`remove`](RBTree::remove) are reused before the arena grows.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
