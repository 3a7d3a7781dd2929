use core::fmt;
use core::iter::FusedIterator;

use crate::error::InsertError;
use crate::hooks::{Comparator, Disposer, DropDisposer, NaturalOrder};
use crate::raw::{Dir, Handle, RawRBTree};

mod capacity;

/// An ordered set of payloads kept in a red-black tree.
///
/// Payloads are placed by a [`Comparator`] chosen when the tree is built
/// ([`NaturalOrder`] by default), and payloads that compare equal are the same
/// key: the tree never holds two of them. Every payload that leaves the tree by
/// [`remove`](RBTree::remove), [`clear`](RBTree::clear),
/// [`destroy`](RBTree::destroy) or drop is handed to the tree's [`Disposer`]
/// exactly once ([`DropDisposer`] by default).
///
/// Insertion and removal rebalance during a single descent from the root, so
/// lookups, inserts and removes are all O(log n) and the height never exceeds
/// `2 * log2(len + 1)`. Nodes live in one arena and refer to each other by
/// index; tearing the tree down takes no recursion and no extra memory.
///
/// It is a logic error for a payload to be modified in such a way that its
/// ordering relative to any other payload, as determined by the comparator,
/// changes while it is in the tree. The behavior resulting from such a logic
/// error is not specified, but will be encapsulated to the `RBTree` that
/// observed it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use topdown_rbtree::RBTree;
///
/// let mut tree = RBTree::new();
/// for v in [10, 20, 30, 15, 25, 5] {
///     tree.insert(v);
/// }
/// assert_eq!(tree.len(), 6);
/// assert_eq!(tree.find(&15), Some(&15));
/// assert_eq!(tree.find(&99), None);
///
/// assert!(tree.remove(&20));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 10, 15, 25, 30]);
/// ```
pub struct RBTree<T, C = NaturalOrder, D = DropDisposer>
where
    D: Disposer<T>,
{
    raw: RawRBTree<T>,
    comparator: C,
    disposer: D,
}

/// An iterator over the payloads of an `RBTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RBTree`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use topdown_rbtree::RBTree;
///
/// let tree = RBTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    raw: &'a RawRBTree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<T: Ord> RBTree<T> {
    /// Makes a new, empty `RBTree` ordered by `T`'s [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let mut tree: RBTree<i32> = RBTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        RBTree {
            raw: RawRBTree::new(),
            comparator: NaturalOrder,
            disposer: DropDisposer,
        }
    }
}

impl<T, C: Comparator<T>> RBTree<T, C> {
    /// Makes a new, empty `RBTree` ordered by `comparator`.
    ///
    /// Removed payloads are simply dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let mut tree = RBTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.extend([1, 3, 2]);
    /// assert_eq!(tree.first(), Some(&3));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        RBTree {
            raw: RawRBTree::new(),
            comparator,
            disposer: DropDisposer,
        }
    }
}

impl<T, C: Comparator<T>, D: Disposer<T>> RBTree<T, C, D> {
    /// Makes a new, empty `RBTree` ordered by `comparator` that hands every
    /// payload leaving the tree to `disposer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{NaturalOrder, RBTree};
    ///
    /// let mut dropped = 0;
    /// let mut tree = RBTree::with_comparator_and_disposer(NaturalOrder, |_: u8| dropped += 1);
    /// tree.extend([1, 2, 3]);
    /// tree.clear();
    /// drop(tree);
    /// assert_eq!(dropped, 3);
    /// ```
    pub fn with_comparator_and_disposer(comparator: C, disposer: D) -> Self {
        RBTree {
            raw: RawRBTree::new(),
            comparator,
            disposer,
        }
    }

    /// Returns the stored payload that compares equal to `key`, or `None` if
    /// there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree = RBTree::from([1, 2, 3]);
    /// assert_eq!(tree.find(&2), Some(&2));
    /// assert_eq!(tree.find(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find(&self, key: &T) -> Option<&T> {
        let handle = self.raw.search(key, &self.comparator)?;
        Some(self.raw.value(handle))
    }

    /// Returns `true` if a stored payload compares equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree = RBTree::from([1, 2, 3]);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains(&self, key: &T) -> bool {
        self.raw.search(key, &self.comparator).is_some()
    }

    /// Adds a payload to the tree.
    ///
    /// Returns whether the payload was newly inserted. That is:
    ///
    /// - If no stored payload compares equal to it, `true` is returned.
    /// - If one does, or no node could be allocated, `false` is returned, the
    ///   tree is left exactly as it was and `value` is dropped without reaching
    ///   the disposer. Use [`try_insert`](RBTree::try_insert) to get it back.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let mut tree = RBTree::new();
    /// assert!(tree.insert(2));
    /// assert!(!tree.insert(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        self.try_insert(value).is_ok()
    }

    /// Adds a payload to the tree, or says why it could not.
    ///
    /// # Errors
    ///
    /// - [`InsertError::Duplicate`] if a stored payload compares equal to `value`.
    /// - [`InsertError::AllocationFailure`] if memory for a new node could not
    ///   be obtained.
    ///
    /// In both cases the tree is unchanged and the error carries `value` back.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{InsertError, RBTree};
    ///
    /// let mut tree = RBTree::new();
    /// assert_eq!(tree.try_insert("a"), Ok(()));
    /// assert_eq!(tree.try_insert("a"), Err(InsertError::Duplicate("a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn try_insert(&mut self, value: T) -> Result<(), InsertError<T>> {
        self.raw.insert(value, &self.comparator)
    }

    /// Removes the payload that compares equal to `key`, handing it to the
    /// disposer. Returns whether such a payload was present.
    ///
    /// Removing from an empty tree, or a key that is not stored, leaves the tree
    /// exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let mut tree = RBTree::from([1, 2]);
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &T) -> bool {
        match self.raw.remove(key, &self.comparator) {
            Some(removed) => {
                self.disposer.dispose(removed);
                true
            }
            None => false,
        }
    }

    /// Removes every payload, handing each to the disposer in ascending order.
    ///
    /// The tree stays usable. Runs in O(n) time with no recursion and no extra
    /// memory, however lopsided the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let mut tree = RBTree::from([1, 2, 3]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert!(tree.insert(4));
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear_with(&mut self.disposer);
    }

    /// Empties the tree like [`clear`](RBTree::clear), then releases it.
    ///
    /// Dropping the tree has the same effect; this spells it out.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::{NaturalOrder, RBTree};
    ///
    /// let mut seen = Vec::new();
    /// let mut tree = RBTree::with_comparator_and_disposer(NaturalOrder, |v: i32| seen.push(v));
    /// tree.extend([2, 1]);
    /// tree.destroy();
    /// assert_eq!(seen, [1, 2]);
    /// ```
    pub fn destroy(mut self) {
        self.clear();
    }
}

impl<T, C, D: Disposer<T>> RBTree<T, C, D> {
    /// Returns the number of payloads in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let mut tree = RBTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no payloads.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the smallest payload, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree = RBTree::from([4, 2, 9]);
    /// assert_eq!(tree.first(), Some(&2));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.value(handle))
    }

    /// Returns the largest payload, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree = RBTree::from([4, 2, 9]);
    /// assert_eq!(tree.last(), Some(&9));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.value(handle))
    }

    /// Gets an iterator that visits the payloads in ascending order.
    ///
    /// Each step follows child and parent links, so iteration needs no stack;
    /// a full pass is O(n).
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree = RBTree::from([3, 1, 2]);
    /// assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// Always at most `2 * log2(len + 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree: RBTree<u32> = (0..1000).collect();
    /// assert!(tree.height() <= 19);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns a reference to the tree's comparator.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }
}

impl<T, C, D: Disposer<T>> Drop for RBTree<T, C, D> {
    fn drop(&mut self) {
        self.raw.clear_with(&mut self.disposer);
    }
}

impl<T: fmt::Debug, C, D: Disposer<T>> fmt::Debug for RBTree<T, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, D> Default for RBTree<T, C, D>
where
    C: Comparator<T> + Default,
    D: Disposer<T> + Default,
{
    /// Creates an empty `RBTree`.
    fn default() -> Self {
        RBTree::with_comparator_and_disposer(C::default(), D::default())
    }
}

impl<T, C, D> FromIterator<T> for RBTree<T, C, D>
where
    C: Comparator<T> + Default,
    D: Disposer<T> + Default,
{
    /// Builds a tree from `iter`, keeping the first of any payloads that compare equal.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RBTree::default();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>, D: Disposer<T>> Extend<T> for RBTree<T, C, D> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTree<T> {
    /// Converts a `[T; N]` into an `RBTree<T>`.
    ///
    /// ```
    /// use topdown_rbtree::RBTree;
    ///
    /// let tree1 = RBTree::from([1, 2, 3, 4]);
    /// let tree2: RBTree<_> = [1, 2, 3, 4].into();
    /// assert!(tree1.iter().eq(tree2.iter()));
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T, C, D: Disposer<T>> IntoIterator for &'a RBTree<T, C, D> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.raw.step(handle, Dir::Right);
        Some(self.raw.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.raw.step(handle, Dir::Left);
        Some(self.raw.value(handle))
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
        Iter {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn remove_disposes_the_original_payload() {
        let disposed = RefCell::new(Vec::new());
        let by_key = |a: &(u8, &str), b: &(u8, &str)| a.0.cmp(&b.0);
        let mut tree: RBTree<(u8, &str), _, _> =
            RBTree::with_comparator_and_disposer(by_key, |v: (u8, &'static str)| disposed.borrow_mut().push(v));
        tree.extend([(5, "five"), (3, "three"), (8, "eight"), (4, "four")]);

        assert!(tree.remove(&(5, "")));
        assert_eq!(*disposed.borrow(), [(5, "five")]);
        assert_eq!(tree.find(&(4, "")), Some(&(4, "four")));

        drop(tree);
        assert_eq!(*disposed.borrow(), [(5, "five"), (3, "three"), (4, "four"), (8, "eight")]);
    }

    #[test]
    fn rejected_payloads_skip_the_disposer() {
        let mut disposed = 0;
        let mut tree = RBTree::with_comparator_and_disposer(NaturalOrder, |_: i32| disposed += 1);
        assert!(tree.insert(1));
        assert!(!tree.insert(1));
        assert!(!tree.remove(&2));
        tree.destroy();
        assert_eq!(disposed, 1);
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = RBTree::from([1, 2, 3, 4]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn debug_lists_payloads_in_order() {
        let tree = RBTree::from([3, 1, 2]);
        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
        assert_eq!(format!("{:?}", tree.iter()), "[1, 2, 3]");
    }

    #[test]
    fn first_and_last_of_empty_tree() {
        let tree: RBTree<i32> = RBTree::default();
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.height(), 0);
    }
}
