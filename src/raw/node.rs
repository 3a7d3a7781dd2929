use core::ops::Not;

use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    /// Direction to descend in when the probe compares as `greater` than the node.
    #[inline]
    pub(crate) const fn from_greater(greater: bool) -> Self {
        if greater { Dir::Right } else { Dir::Left }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl Not for Dir {
    type Output = Dir;

    #[inline]
    fn not(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A tree node as stored in the arena.
///
/// `links` are the owning edges of the tree (the arena holds the memory, the
/// links decide reachability). `parent` is only a navigation aid and must be
/// kept in step with `links` by whoever rewires them.
pub(crate) struct Node<T> {
    links: [Option<Handle>; 2],
    parent: Option<Handle>,
    color: Color,
    value: T,
}

impl<T> Node<T> {
    /// Creates a detached red leaf.
    pub(crate) fn new(value: T) -> Self {
        Self {
            links: [None, None],
            parent: None,
            color: Color::Red,
            value,
        }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Option<Handle> {
        self.links[dir.index()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Option<Handle>) {
        self.links[dir.index()] = child;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn value(&self) -> &T {
        &self.value
    }

    /// Swaps in a new payload, returning the one previously stored.
    pub(crate) fn replace_value(&mut self, value: T) -> T {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_a_detached_red_leaf() {
        let node = Node::new(5);
        assert!(node.is_red());
        assert_eq!(node.child(Dir::Left), None);
        assert_eq!(node.child(Dir::Right), None);
        assert_eq!(node.parent(), None);
        assert_eq!(*node.value(), 5);
    }

    #[test]
    fn links_are_addressed_by_direction() {
        let mut node = Node::new(());
        let left = Handle::from_index(3);
        let right = Handle::from_index(4);
        node.set_child(Dir::Left, Some(left));
        node.set_child(!Dir::Left, Some(right));
        assert_eq!(node.child(Dir::Left), Some(left));
        assert_eq!(node.child(Dir::Right), Some(right));
    }

    #[test]
    fn direction_helpers() {
        assert_eq!(!Dir::Left, Dir::Right);
        assert_eq!(!Dir::Right, Dir::Left);
        assert_eq!(Dir::from_greater(true), Dir::Right);
        assert_eq!(Dir::from_greater(false), Dir::Left);
    }

    #[test]
    fn replace_value_returns_previous_payload() {
        let mut node = Node::new("old");
        assert_eq!(node.replace_value("new"), "old");
        assert_eq!(node.into_value(), "new");
    }
}
