//! RbTree: red-black tree engine shared by `TreeMap` and `TreeSet`.
//!
//! Nodes live in a slotmap arena owned by the tree and refer to each other
//! through [`NodeId`] handles. `left`/`right` are the structural links;
//! `parent` is a back-reference used for rotations, fixups and in-order
//! stepping. Only the arena frees nodes, so links never own anything.
//!
//! Invariants kept across every public call:
//! - the root is black;
//! - no red node has a red child;
//! - every root-to-nil path crosses the same number of black nodes
//!   (absent children count as black);
//! - an in-order walk yields keys strictly ascending under the comparator.
//!
//! Deletion splices out the node itself when it has at most one child, and
//! otherwise its in-order predecessor, whose key and value move into the
//! logical node being removed.

use crate::error::{Error, Put, Result, Violation};
use crate::order::{Comparator, NaturalOrder};
use crate::reentrancy::DebugReentrancy;
use core::cmp::Ordering;
use core::fmt;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle of a node inside one [`RbTree`].
    pub struct NodeId;
}

// Slotmap reserves u32::MAX for its own bookkeeping.
const MAX_NODES: usize = (u32::MAX - 1) as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Left,
    Right,
}

impl Dir {
    fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Nearest-key query kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Seek {
    Floor,
    Ceiling,
    Lower,
    Higher,
}

impl Seek {
    fn below(self) -> bool {
        matches!(self, Seek::Floor | Seek::Lower)
    }

    fn inclusive(self) -> bool {
        matches!(self, Seek::Floor | Seek::Ceiling)
    }
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

#[derive(Clone)]
pub struct RbTree<K, V, C = NaturalOrder> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    root: Option<NodeId>,
    cmp: C,
    reentrancy: DebugReentrancy,
}

impl<K: Ord, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> RbTree<K, V, C>
where
    C: Comparator<K>,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            cmp,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Comparator-guided search.
    pub fn find(&self, key: &K) -> Option<NodeId> {
        let _g = self.reentrancy.enter();
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Insert `key`, or swap the value of the existing equal key in place.
    ///
    /// Fails only when the arena cannot address another node, in which case
    /// the tree is untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Put<V>> {
        let descent = self.reentrancy.enter();
        let mut parent = None;
        let mut side = Dir::Left;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            match self.cmp.compare(&key, &node.key) {
                Ordering::Less => {
                    side = Dir::Left;
                    cur = node.left;
                }
                Ordering::Greater => {
                    side = Dir::Right;
                    cur = node.right;
                }
                Ordering::Equal => {
                    let old = mem::replace(&mut self.nodes[id].value, value);
                    return Ok(Put::Replaced(old));
                }
            }
            parent = Some(id);
        }
        drop(descent);

        if self.nodes.len() >= MAX_NODES {
            log::warn!("rb-tree: node arena full at {} nodes", self.nodes.len());
            return Err(Error::AllocationFailure);
        }
        let id = self.nodes.insert(Node {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) => self.set_child(p, side, Some(id)),
        }
        self.insert_fixup(id);
        Ok(Put::Inserted)
    }

    /// Find and delete `key`.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find(key)?;
        self.delete(id)
    }

    /// Greatest key `<= key`.
    pub fn floor(&self, key: &K) -> Result<NodeId> {
        self.seek(key, Seek::Floor)
    }

    /// Least key `>= key`.
    pub fn ceiling(&self, key: &K) -> Result<NodeId> {
        self.seek(key, Seek::Ceiling)
    }

    /// Greatest key `< key`.
    pub fn lower(&self, key: &K) -> Result<NodeId> {
        self.seek(key, Seek::Lower)
    }

    /// Least key `> key`.
    pub fn higher(&self, key: &K) -> Result<NodeId> {
        self.seek(key, Seek::Higher)
    }

    // Remembers the last qualifying node on the descent; an exact match
    // ends an inclusive query early.
    fn seek(&self, key: &K, seek: Seek) -> Result<NodeId> {
        let _g = self.reentrancy.enter();
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        let mut best = None;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            cur = match (self.cmp.compare(&node.key, key), seek.below()) {
                (Ordering::Equal, _) if seek.inclusive() => return Ok(id),
                (Ordering::Less, true) | (Ordering::Greater, false) => {
                    best = Some(id);
                    if seek.below() {
                        node.right
                    } else {
                        node.left
                    }
                }
                (Ordering::Less, false) | (Ordering::Equal, false) => node.right,
                (Ordering::Greater, true) | (Ordering::Equal, true) => node.left,
            };
        }
        best.ok_or(Error::NotFound)
    }
}

impl<K, V, C> RbTree<K, V, C> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|r| self.nodes[r].color)
    }

    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.nodes.get(id).map(|n| n.color)
    }

    pub fn get(&self, id: NodeId) -> Option<(&K, &V)> {
        self.nodes.get(id).map(|n| (&n.key, &n.value))
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes.get_mut(id).map(|n| &mut n.value)
    }

    /// Unlink the node behind `id` and hand back its key and value.
    ///
    /// Other handles stay valid, except the handle of the in-order
    /// predecessor when `id` had two children: that node is the one
    /// physically removed, and its entry now lives under `id`.
    pub fn delete(&mut self, id: NodeId) -> Option<(K, V)> {
        let node = self.nodes.get(id)?;
        let splice = match (node.left, node.right) {
            (Some(left), Some(_)) => self.max_from(left),
            _ => id,
        };

        let s = &self.nodes[splice];
        let (parent, color) = (s.parent, s.color);
        let child = s.left.or(s.right);
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        self.replace_child(parent, splice, child);

        let removed = self.nodes.remove(splice)?;
        let entry = if splice == id {
            (removed.key, removed.value)
        } else {
            let logical = &mut self.nodes[id];
            (
                mem::replace(&mut logical.key, removed.key),
                mem::replace(&mut logical.value, removed.value),
            )
        };

        if color == Color::Black {
            self.delete_fixup(child, parent);
        }
        Some(entry)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|r| self.min_from(r))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|r| self.max_from(r))
    }

    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if let Some(r) = node.right {
            return Some(self.min_from(r));
        }
        let (mut cur, mut up) = (id, node.parent);
        while let Some(p) = up {
            if self.nodes[p].left == Some(cur) {
                return Some(p);
            }
            cur = p;
            up = self.nodes[p].parent;
        }
        None
    }

    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if let Some(l) = node.left {
            return Some(self.max_from(l));
        }
        let (mut cur, mut up) = (id, node.parent);
        while let Some(p) = up {
            if self.nodes[p].right == Some(cur) {
                return Some(p);
            }
            cur = p;
            up = self.nodes[p].parent;
        }
        None
    }

    /// Ascending in-order walk.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            tree: self,
            front: self.root.map(|r| self.min_from(r)),
            back: self.root.map(|r| self.max_from(r)),
            remaining: self.nodes.len(),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn depth<K, V>(nodes: &SlotMap<NodeId, Node<K, V>>, id: Option<NodeId>) -> usize {
            match id {
                None => 0,
                Some(id) => 1 + depth(nodes, nodes[id].left).max(depth(nodes, nodes[id].right)),
            }
        }
        depth(&self.nodes, self.root)
    }

    pub fn clear(&mut self) {
        log::trace!("rb-tree: clearing {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Empty the tree, handing every entry to `f` in ascending key order.
    pub fn clear_with<F>(&mut self, mut f: F)
    where
        F: FnMut(K, V),
    {
        log::trace!("rb-tree: releasing {} nodes", self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cur = self.root.map(|r| self.min_from(r));
        while let Some(id) = cur {
            order.push(id);
            cur = self.successor(id);
        }
        self.root = None;
        for id in order {
            if let Some(node) = self.nodes.remove(id) {
                f(node.key, node.value);
            }
        }
    }

    fn min_from(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.nodes[id].left {
            id = l;
        }
        id
    }

    fn max_from(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.nodes[id].right {
            id = r;
        }
        id
    }

    fn child(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        match dir {
            Dir::Left => self.nodes[id].left,
            Dir::Right => self.nodes[id].right,
        }
    }

    fn set_child(&mut self, id: NodeId, dir: Dir, child: Option<NodeId>) {
        match dir {
            Dir::Left => self.nodes[id].left = child,
            Dir::Right => self.nodes[id].right = child,
        }
    }

    fn side_of(&self, parent: NodeId, child: Option<NodeId>) -> Dir {
        if self.nodes[parent].left == child {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes[id].color == Color::Red)
    }

    /// `id` if it names a red node; absent nodes are black.
    fn red(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.filter(|&id| self.nodes[id].color == Color::Red)
    }

    // Point `parent`'s link to `old` at `new` instead (or the root link).
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let pn = &mut self.nodes[p];
                if pn.left == Some(old) {
                    pn.left = new;
                } else {
                    pn.right = new;
                }
            }
        }
    }

    //            x                         y
    //           / \    rotate(x, Left)    / \
    //          a   y   -------------->   x   c
    //             / \                   / \
    //            b   c                 a   b
    //
    // `rotate(x, Right)` is the mirror image. No-op when the rising child is
    // absent.
    fn rotate(&mut self, x: NodeId, dir: Dir) {
        let rising = dir.opposite();
        let Some(y) = self.child(x, rising) else {
            return;
        };
        let inner = self.child(y, dir);
        self.set_child(x, rising, inner);
        if let Some(b) = inner {
            self.nodes[b].parent = Some(x);
        }
        let up = self.nodes[x].parent;
        self.nodes[y].parent = up;
        self.replace_child(up, x, Some(y));
        self.set_child(y, dir, Some(x));
        self.nodes[x].parent = Some(y);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while let Some(mut p) = self.red(self.nodes[z].parent) {
            // A red parent is never the root, so the grandparent exists.
            let Some(g) = self.nodes[p].parent else {
                break;
            };
            let side = self.side_of(g, Some(p));
            if let Some(u) = self.red(self.child(g, side.opposite())) {
                self.nodes[p].color = Color::Black;
                self.nodes[u].color = Color::Black;
                self.nodes[g].color = Color::Red;
                z = g;
                continue;
            }
            if self.side_of(p, Some(z)) != side {
                self.rotate(p, side);
                mem::swap(&mut z, &mut p);
            }
            self.nodes[p].color = Color::Black;
            self.nodes[g].color = Color::Red;
            self.rotate(g, side.opposite());
        }
        if let Some(r) = self.root {
            self.nodes[r].color = Color::Black;
        }
    }

    // `x` took the place of a removed black node and is short one black;
    // `parent` is tracked separately because `x` may be absent.
    fn delete_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else {
                break;
            };
            let side = self.side_of(p, x);
            let mut sibling = self.child(p, side.opposite());
            if let Some(s) = self.red(sibling) {
                self.nodes[s].color = Color::Black;
                self.nodes[p].color = Color::Red;
                self.rotate(p, side);
                sibling = self.child(p, side.opposite());
            }
            // The missing black on x's side guarantees a sibling.
            let Some(mut s) = sibling else {
                x = Some(p);
                parent = self.nodes[p].parent;
                continue;
            };
            let near = self.child(s, side);
            let far = self.child(s, side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                self.nodes[s].color = Color::Red;
                x = Some(p);
                parent = self.nodes[p].parent;
                continue;
            }
            if !self.is_red(far) {
                if let Some(n) = near {
                    self.nodes[n].color = Color::Black;
                    self.nodes[s].color = Color::Red;
                    self.rotate(s, side.opposite());
                    s = n;
                }
            }
            self.nodes[s].color = self.nodes[p].color;
            self.nodes[p].color = Color::Black;
            if let Some(f) = self.child(s, side.opposite()) {
                self.nodes[f].color = Color::Black;
            }
            self.rotate(p, side);
            x = self.root;
            break;
        }
        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }
}

impl<K, V, C> RbTree<K, V, C>
where
    C: Comparator<K>,
{
    /// Check every structural invariant; on success return the black height
    /// (0 for an empty tree).
    pub fn validate(&self) -> Result<usize, Violation> {
        let Some(root) = self.root else {
            return match self.nodes.len() {
                0 => Ok(0),
                stored => Err(Violation::SizeMismatch {
                    reachable: 0,
                    stored,
                }),
            };
        };
        if self.nodes[root].color == Color::Red {
            return Err(Violation::RedRoot);
        }
        if self.nodes[root].parent.is_some() {
            return Err(Violation::BrokenParentLink);
        }
        let mut reachable = 0;
        let blacks = self.validate_subtree(root, &mut reachable)?;
        if reachable != self.nodes.len() {
            return Err(Violation::SizeMismatch {
                reachable,
                stored: self.nodes.len(),
            });
        }

        let _g = self.reentrancy.enter();
        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(p) = prev {
                if self.cmp.compare(p, key) != Ordering::Less {
                    return Err(Violation::OutOfOrder);
                }
            }
            prev = Some(key);
        }
        Ok(blacks)
    }

    fn validate_subtree(&self, id: NodeId, reachable: &mut usize) -> Result<usize, Violation> {
        *reachable += 1;
        let node = &self.nodes[id];
        for child in [node.left, node.right].into_iter().flatten() {
            let c = &self.nodes[child];
            if c.parent != Some(id) {
                return Err(Violation::BrokenParentLink);
            }
            if node.color == Color::Red && c.color == Color::Red {
                return Err(Violation::ConsecutiveReds);
            }
        }
        let left = match node.left {
            Some(l) => self.validate_subtree(l, reachable)?,
            None => 0,
        };
        let right = match node.right {
            Some(r) => self.validate_subtree(r, reachable)?,
            None => 0,
        };
        if left != right {
            return Err(Violation::UnbalancedBlacks { left, right });
        }
        Ok(left + usize::from(node.color == Color::Black))
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing in-order iterator over an [`RbTree`].
pub struct Iter<'a, K, V, C> {
    tree: &'a RbTree<K, V, C>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.tree.successor(id);
        self.remaining -= 1;
        self.tree.get(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.tree.predecessor(id);
        self.remaining -= 1;
        self.tree.get(id)
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}
