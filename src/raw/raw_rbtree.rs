use core::cmp::Ordering;

use alloc::vec::Vec;
use log::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Dir, Node};
use crate::error::InsertError;
use crate::hooks::{Comparator, Disposer};

/// Where a node hangs from: another node, or the tree head (which makes it the root).
///
/// The head behaves like a node whose right link is `root` and whose left link is
/// always empty, so the root can be rotated like any other child.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Anchor {
    Head,
    Node(Handle),
}

impl Anchor {
    #[inline]
    fn handle(self) -> Option<Handle> {
        match self {
            Anchor::Head => None,
            Anchor::Node(handle) => Some(handle),
        }
    }
}

/// The red-black engine backing `RBTree`.
///
/// Ordering and disposal are passed in per call, so this type only owns
/// structure: the node arena, the root link and the element count.
pub(crate) struct RawRBTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of live nodes.
    len: usize,
}

impl<T> RawRBTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    /// Returns the payload stored at `handle`.
    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &T {
        self.node(handle).value()
    }

    /// Absent links count as black.
    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.node(h).is_red())
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).set_color(color);
    }

    fn anchor_of(&self, handle: Handle) -> Anchor {
        match self.node(handle).parent() {
            Some(parent) => Anchor::Node(parent),
            None => Anchor::Head,
        }
    }

    fn child_of(&self, anchor: Anchor, dir: Dir) -> Option<Handle> {
        match (anchor, dir) {
            (Anchor::Head, Dir::Left) => None,
            (Anchor::Head, Dir::Right) => self.root,
            (Anchor::Node(handle), dir) => self.node(handle).child(dir),
        }
    }

    /// Which link of `anchor` holds `child`.
    fn side_of(&self, anchor: Anchor, child: Handle) -> Dir {
        match anchor {
            Anchor::Head => Dir::Right,
            Anchor::Node(parent) => {
                if self.node(parent).child(Dir::Left) == Some(child) {
                    Dir::Left
                } else {
                    debug_assert_eq!(self.node(parent).child(Dir::Right), Some(child), "`RawRBTree::side_of()` - not a child");
                    Dir::Right
                }
            }
        }
    }

    /// Points `anchor`'s `dir` link at `child` and `child`'s parent back at `anchor`.
    ///
    /// Every structural edit goes through here so the two directions never disagree.
    fn set_link(&mut self, anchor: Anchor, child: Option<Handle>, dir: Dir) {
        match anchor {
            Anchor::Head => {
                debug_assert_eq!(dir, Dir::Right, "`RawRBTree::set_link()` - the head only has a right link");
                self.root = child;
            }
            Anchor::Node(parent) => self.node_mut(parent).set_child(dir, child),
        }
        if let Some(child) = child {
            self.node_mut(child).set_parent(anchor.handle());
        }
    }

    /// Promotes the child of `root` opposite `dir` into `root`'s place.
    ///
    /// `root` becomes that child's `dir` child and turns red; the promoted node
    /// turns black. Returns the promoted node.
    pub(crate) fn rotate_once(&mut self, root: Handle, dir: Dir) -> Handle {
        let anchor = self.anchor_of(root);
        let side = self.side_of(anchor, root);
        let save = self.node(root).child(!dir).expect("`RawRBTree::rotate_once()` - no child opposite `dir`");
        let inner = self.node(save).child(dir);

        self.set_link(Anchor::Node(root), inner, !dir);
        self.set_link(Anchor::Node(save), Some(root), dir);
        self.set_link(anchor, Some(save), side);

        self.set_color(root, Color::Red);
        self.set_color(save, Color::Black);
        save
    }

    /// Rotates the child opposite `dir` away from `dir`, then `root` toward `dir`.
    ///
    /// Straightens a zig-zag so that the grandchild ends up on top.
    pub(crate) fn rotate_twice(&mut self, root: Handle, dir: Dir) -> Handle {
        let child = self.node(root).child(!dir).expect("`RawRBTree::rotate_twice()` - no child opposite `dir`");
        self.rotate_once(child, !dir);
        self.rotate_once(root, dir)
    }

    fn blacken_root(&mut self) {
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
            self.node_mut(root).set_parent(None);
        }
    }

    /// Handle of the smallest payload.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Dir::Left))
    }

    /// Handle of the largest payload.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Dir::Right))
    }

    fn extreme(&self, mut handle: Handle, dir: Dir) -> Handle {
        while let Some(child) = self.node(handle).child(dir) {
            handle = child;
        }
        handle
    }

    /// The in-order neighbour of `handle`: successor for `Dir::Right`, predecessor
    /// for `Dir::Left`. Walks parent links, so it needs no stack.
    pub(crate) fn step(&self, handle: Handle, dir: Dir) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(dir) {
            return Some(self.extreme(child, !dir));
        }

        let mut child = handle;
        while let Some(parent) = self.node(child).parent() {
            if self.node(parent).child(!dir) == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };

        let mut height = 0;
        let mut stack: Vec<(Handle, usize)> = Vec::new();
        stack.push((root, 1));
        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(handle);
            stack.extend([node.child(Dir::Left), node.child(Dir::Right)].into_iter().flatten().map(|c| (c, depth + 1)));
        }
        height
    }

    /// Frees every node, handing each payload to `disposer` in ascending order.
    ///
    /// Left links are rotated away one at a time, so the tree degenerates into a
    /// right-leaning chain that is consumed from its head. Needs no recursion and
    /// no auxiliary storage whatever the tree's shape.
    ///
    /// Returns the number of payloads released.
    pub(crate) fn clear_with<D: Disposer<T>>(&mut self, disposer: &mut D) -> usize {
        let expected = core::mem::replace(&mut self.len, 0);
        let mut cursor = self.root.take();
        let mut released = 0;

        while let Some(current) = cursor {
            match self.node(current).child(Dir::Left) {
                None => {
                    cursor = self.node(current).child(Dir::Right);
                    if let Some(next) = cursor {
                        self.node_mut(next).set_parent(None);
                    }
                    disposer.dispose(self.nodes.evict(current).into_value());
                    released += 1;
                }
                Some(left) => {
                    let inner = self.node(left).child(Dir::Right);
                    self.set_link(Anchor::Node(current), inner, Dir::Left);
                    self.set_link(Anchor::Node(left), Some(current), Dir::Right);
                    self.node_mut(left).set_parent(None);
                    cursor = Some(left);
                }
            }
        }

        debug_assert_eq!(released, expected, "`RawRBTree::clear_with()` - released count differs from `len`");
        self.nodes.clear();
        trace!("cleared tree, released {released} payloads");
        released
    }
}

impl<T> RawRBTree<T> {
    /// Finds the node whose payload compares equal to `key`.
    pub(crate) fn search<C>(&self, key: &T, cmp: &C) -> Option<Handle>
    where
        C: Comparator<T> + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(current) = cursor {
            match cmp.compare(key, self.value(current)) {
                Ordering::Equal => return Some(current),
                ordering => cursor = self.node(current).child(Dir::from_greater(ordering == Ordering::Greater)),
            }
        }
        None
    }

    /// Inserts `value` unless an equal payload is already stored.
    ///
    /// Balancing happens on the way down: a black node with two red children is
    /// color-flipped, and any red-red pair this creates is rotated away at the
    /// grandparent before descending further. The new node is attached as a red
    /// leaf at the empty slot the descent ends on.
    ///
    /// On error the tree is untouched: duplicates are detected by a read-only
    /// lookup, and the node slot is reserved before anything is rewired.
    pub(crate) fn insert<C>(&mut self, value: T, cmp: &C) -> Result<(), InsertError<T>>
    where
        C: Comparator<T> + ?Sized,
    {
        if self.search(&value, cmp).is_some() {
            debug!("insert rejected, equal payload already stored");
            return Err(InsertError::Duplicate(value));
        }
        if let Err(err) = self.nodes.reserve_one() {
            debug!("insert rejected, cannot allocate a node: {err:?}");
            return Err(InsertError::AllocationFailure(value));
        }

        let Some(root) = self.root else {
            let leaf = self.nodes.alloc(Node::new(value));
            self.root = Some(leaf);
            self.blacken_root();
            self.len = 1;
            trace!("inserted first payload");
            return Ok(());
        };

        let mut parent: Option<Handle> = None;
        let mut cursor = Some(root);
        let mut dir = Dir::Right;

        while let Some(current) = cursor {
            let node = self.node(current);
            if self.is_red(node.child(Dir::Left)) && self.is_red(node.child(Dir::Right)) {
                self.flip_colors(current);
            }
            if let Some(parent) = parent {
                if self.node(current).is_red() && self.node(parent).is_red() {
                    self.fix_double_red(current, parent);
                }
            }

            match cmp.compare(&value, self.value(current)) {
                Ordering::Equal => {
                    // Only reachable with a comparator that is not a total order.
                    self.blacken_root();
                    return Err(InsertError::Duplicate(value));
                }
                ordering => {
                    dir = Dir::from_greater(ordering == Ordering::Greater);
                    parent = Some(current);
                    cursor = self.node(current).child(dir);
                }
            }
        }

        let parent = parent.expect("`RawRBTree::insert()` - descent ended without a parent");
        let leaf = self.nodes.alloc(Node::new(value));
        self.set_link(Anchor::Node(parent), Some(leaf), dir);
        if self.node(parent).is_red() {
            self.fix_double_red(leaf, parent);
        }

        self.blacken_root();
        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len, "`RawRBTree::insert()` - arena and `len` disagree");
        trace!("inserted payload, len = {}", self.len);
        Ok(())
    }

    /// Turns `handle` red and both of its children black.
    fn flip_colors(&mut self, handle: Handle) {
        self.set_color(handle, Color::Red);
        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = self.node(handle).child(dir) {
                self.set_color(child, Color::Black);
            }
        }
    }

    /// Resolves a red `node` under a red `parent` with one rotation at the grandparent.
    fn fix_double_red(&mut self, node: Handle, parent: Handle) {
        let grandparent = self.node(parent).parent().expect("`RawRBTree::fix_double_red()` - red parent is the root");
        let outer = self.side_of(Anchor::Node(grandparent), parent);
        if self.side_of(Anchor::Node(parent), node) == outer {
            self.rotate_once(grandparent, !outer);
        } else {
            self.rotate_twice(grandparent, !outer);
        }
    }

    /// Removes the payload equal to `key` and returns it.
    ///
    /// The descent heads for `key` and, once it matches, for its in-order
    /// predecessor, making sure every node it steps onto is red or has a red
    /// child in the direction of travel. The node finally unlinked is therefore
    /// red (or the root), so unlinking it never disturbs the black height.
    ///
    /// The predecessor's payload moves into the matched node and the matched
    /// node's original payload is returned. An absent key leaves the tree
    /// untouched.
    pub(crate) fn remove<C>(&mut self, key: &T, cmp: &C) -> Option<T>
    where
        C: Comparator<T> + ?Sized,
    {
        self.search(key, cmp)?;

        let mut current = Anchor::Head;
        let mut dir = Dir::Right;
        let mut matched: Option<Handle> = None;

        while let Some(next) = self.child_of(current, dir) {
            let last = dir;
            current = Anchor::Node(next);

            let ordering = cmp.compare(key, self.value(next));
            if ordering == Ordering::Equal {
                matched = Some(next);
            }
            dir = Dir::from_greater(ordering == Ordering::Greater);

            if !self.node(next).is_red() && !self.is_red(self.node(next).child(dir)) {
                self.push_red_down(next, dir, last);
            }
        }

        let (Anchor::Node(victim), Some(matched)) = (current, matched) else {
            // Only reachable with a comparator that is not a total order.
            self.blacken_root();
            return None;
        };

        let orphan = {
            let node = self.node(victim);
            node.child(Dir::Left).or(node.child(Dir::Right))
        };
        let anchor = self.anchor_of(victim);
        let side = self.side_of(anchor, victim);
        self.set_link(anchor, orphan, side);

        let relocated = self.nodes.take(victim).into_value();
        let removed = if matched == victim {
            relocated
        } else {
            self.node_mut(matched).replace_value(relocated)
        };

        self.len -= 1;
        self.blacken_root();
        debug_assert!(
            self.root.is_some() || (self.len == 0 && self.nodes.is_empty()),
            "`RawRBTree::remove()` - no root left but `len` is non-zero"
        );
        trace!("removed payload, len = {}", self.len);
        Some(removed)
    }

    /// Makes the black `node` (reached via its parent's `last` link, heading `dir`
    /// next) red, or gives it a red child on the `dir` side.
    fn push_red_down(&mut self, node: Handle, dir: Dir, last: Dir) {
        if self.is_red(self.node(node).child(!dir)) {
            // Lift the red child over `node`; `node` turns red beneath it.
            self.rotate_once(node, dir);
            return;
        }

        let Anchor::Node(parent) = self.anchor_of(node) else {
            return;
        };
        let Some(sibling) = self.node(parent).child(!last) else {
            return;
        };

        let near = self.node(sibling).child(last);
        let far = self.node(sibling).child(!last);
        if !self.is_red(near) && !self.is_red(far) {
            self.set_color(parent, Color::Black);
            self.set_color(sibling, Color::Red);
            self.set_color(node, Color::Red);
        } else {
            let top = if self.is_red(near) {
                self.rotate_twice(parent, last)
            } else {
                self.rotate_once(parent, last)
            };

            self.set_color(node, Color::Red);
            self.set_color(top, Color::Red);
            for side in [Dir::Left, Dir::Right] {
                if let Some(child) = self.node(top).child(side) {
                    self.set_color(child, Color::Black);
                }
            }
        }
    }
}
