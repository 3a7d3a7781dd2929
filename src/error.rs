use core::fmt;

/// The reason [`RBTree::try_insert`](crate::RBTree::try_insert) did not store a payload.
///
/// Either way the tree is exactly as it was before the call, and the rejected
/// payload is handed back untouched; it never reaches the tree's disposer.
///
/// # Examples
///
/// ```
/// use topdown_rbtree::{InsertError, RBTree};
///
/// let mut tree = RBTree::new();
/// assert!(tree.try_insert(1).is_ok());
///
/// let err = tree.try_insert(1).unwrap_err();
/// assert!(matches!(err, InsertError::Duplicate(1)));
/// assert_eq!(err.into_inner(), 1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertError<T> {
    /// A stored payload already compares equal to this one.
    Duplicate(T),
    /// No memory (or no free node index) was available for a new node.
    AllocationFailure(T),
}

impl<T> InsertError<T> {
    /// Returns the payload that was not inserted.
    pub fn into_inner(self) -> T {
        match self {
            InsertError::Duplicate(value) | InsertError::AllocationFailure(value) => value,
        }
    }

    /// Returns `true` for [`InsertError::Duplicate`].
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertError::Duplicate(_))
    }
}

// Payloads are opaque, so neither impl requires `T: Debug`.
impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Duplicate(_) => f.debug_tuple("Duplicate").finish_non_exhaustive(),
            InsertError::AllocationFailure(_) => f.debug_tuple("AllocationFailure").finish_non_exhaustive(),
        }
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Duplicate(_) => f.write_str("an equal payload is already stored in the tree"),
            InsertError::AllocationFailure(_) => f.write_str("could not allocate a node for the payload"),
        }
    }
}

impl<T> core::error::Error for InsertError<T> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    #[test]
    fn into_inner_hands_back_the_payload() {
        assert_eq!(InsertError::Duplicate("a").into_inner(), "a");
        assert_eq!(InsertError::AllocationFailure("b").into_inner(), "b");
    }

    #[test]
    fn display_names_the_reason() {
        assert_eq!(InsertError::Duplicate(()).to_string(), "an equal payload is already stored in the tree");
        assert_eq!(InsertError::AllocationFailure(()).to_string(), "could not allocate a node for the payload");
    }

    #[test]
    fn debug_does_not_require_debug_payloads() {
        struct Opaque;
        assert_eq!(format!("{:?}", InsertError::Duplicate(Opaque)), "Duplicate(..)");
        assert!(!InsertError::AllocationFailure(Opaque).is_duplicate());
    }
}
