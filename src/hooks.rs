use core::cmp::Ordering;

/// Total order used by an [`RBTree`](crate::RBTree) to place its payloads.
///
/// The tree never looks inside a payload; it only asks the comparator how two
/// payloads relate. A comparator must be a total order and must keep giving the
/// same answer for the same pair while both are stored. Two payloads comparing
/// [`Equal`](Ordering::Equal) are the same key, so the second one is rejected on
/// insert.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator, and [`NaturalOrder`]
/// uses the payload's own [`Ord`] implementation.
///
/// # Examples
///
/// ```
/// use topdown_rbtree::RBTree;
///
/// // Order strings by length, then alphabetically.
/// let mut tree = RBTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()).then(a.cmp(b)));
/// tree.insert("ccc");
/// tree.insert("a");
/// tree.insert("bb");
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), ["a", "bb", "ccc"]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders payloads by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Receives every payload the tree lets go of.
///
/// A payload reaches the disposer exactly once: when it is removed with
/// [`RBTree::remove`](crate::RBTree::remove), or when the tree is cleared,
/// destroyed or dropped while still holding it. Payloads rejected by an insert
/// are handed back to the caller instead and never reach the disposer.
///
/// Any `FnMut(T)` closure is a disposer. [`DropDisposer`] just drops the payload,
/// which is the right choice whenever `T` cleans up after itself.
///
/// # Examples
///
/// ```
/// use topdown_rbtree::{NaturalOrder, RBTree};
///
/// let mut released = Vec::new();
/// {
///     let mut tree = RBTree::with_comparator_and_disposer(NaturalOrder, |v: u32| released.push(v));
///     tree.insert(2);
///     tree.insert(1);
///     tree.remove(&2);
/// }
/// assert_eq!(released, [2, 1]);
/// ```
pub trait Disposer<T> {
    /// Takes ownership of a payload that left the tree.
    fn dispose(&mut self, value: T);
}

impl<T, F> Disposer<T> for F
where
    F: FnMut(T),
{
    #[inline]
    fn dispose(&mut self, value: T) {
        self(value);
    }
}

/// Drops every disposed payload.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct DropDisposer;

impl<T> Disposer<T> for DropDisposer {
    #[inline]
    fn dispose(&mut self, value: T) {
        drop(value);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn natural_order_matches_ord() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare(&2, &2), Ordering::Equal);
        assert_eq!(NaturalOrder.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn closures_are_comparators() {
        let reverse = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
    }

    #[test]
    fn closures_are_disposers() {
        let mut seen = Vec::new();
        let mut disposer = |v: i32| seen.push(v);
        disposer.dispose(4);
        disposer.dispose(2);
        assert_eq!(seen, [4, 2]);
    }
}
