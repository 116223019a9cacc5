//! Read-only node handle: ancestry, coordinates, layers, leaves and the
//! cached traversal views.

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use itertools::Itertools;
use tracing::trace;

use crate::arena::TreeArena;
use crate::errors::TreeResult;
use crate::node::{NodeData, NodeId, TreeNode};
use crate::render::Key;

/// Borrowed view of one node of a [`TreeArena`].
///
/// Handles are cheap to copy. All queries are infallible because a handle
/// can only be created for a live node and the arena cannot be mutated while
/// the handle exists.
pub struct NodeRef<'a, T> {
    tree: &'a TreeArena<T>,
    id: NodeId,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", self.data())
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.data(), f)
    }
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(tree: &'a TreeArena<T>, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn at(&self, id: NodeId) -> Self {
        Self::new(self.tree, id)
    }

    fn slot(&self) -> &'a TreeNode<T> {
        self.tree.slot(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a TreeArena<T> {
        self.tree
    }

    pub fn data(&self) -> &'a T {
        &self.slot().data
    }

    pub fn parent(&self) -> Option<Self> {
        self.slot().parent.map(|id| self.at(id))
    }

    pub fn children(&self) -> Nodes<'a, T> {
        Nodes::new(self.tree, &self.slot().children)
    }

    pub fn children_ids(&self) -> &'a [NodeId] {
        &self.slot().children
    }

    pub fn is_root(&self) -> bool {
        self.slot().is_root()
    }

    pub fn is_leaf(&self) -> bool {
        self.slot().is_leaf()
    }

    /// Roots count as last children.
    pub fn is_last_child(&self) -> bool {
        match self.parent() {
            None => true,
            Some(parent) => parent.children_ids().last() == Some(&self.id),
        }
    }

    fn sibling_index(&self) -> Option<usize> {
        self.parent()?
            .children_ids()
            .iter()
            .position(|&id| id == self.id)
    }

    pub fn next_sibling(&self) -> Option<Self> {
        let index = self.sibling_index()?;
        let siblings = self.parent()?.children_ids();
        siblings.get(index + 1).map(|&id| self.at(id))
    }

    pub fn previous_sibling(&self) -> Option<Self> {
        let index = self.sibling_index()?.checked_sub(1)?;
        let siblings = self.parent()?.children_ids();
        siblings.get(index).map(|&id| self.at(id))
    }

    /// Number of ancestors; the root is on level 0.
    pub fn level(&self) -> usize {
        let mut level = 0;
        let mut current = self.slot().parent;
        while let Some(id) = current {
            level += 1;
            current = self.tree.slot(id).parent;
        }
        level
    }

    pub fn root(&self) -> Self {
        let mut node = *self;
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    /// Parent hops from `self` up to `reference` (the root when `None`).
    ///
    /// `Some(0)` for `self`; `None` when `reference` is not on the path from
    /// `self` to its root.
    pub fn distance(&self, reference: impl Into<Option<NodeId>>) -> Option<usize> {
        let reference = reference.into().unwrap_or_else(|| self.root().id);
        self.path_ids().iter().position(|&id| id == reference)
    }

    /// The leaf farthest below `self`; the first one in pre-order on ties.
    pub fn farthest_leaf(&self) -> Self {
        let mut farthest = *self;
        let mut max_distance = 0;
        for leaf in self.iterate_leaves() {
            let distance = leaf.distance(self.id).unwrap_or(0);
            if distance > max_distance {
                farthest = leaf;
                max_distance = distance;
            }
        }
        farthest
    }

    pub fn number_of_layers(&self) -> usize {
        self.farthest_leaf().distance(self.id).unwrap_or(0)
    }

    /// Dotted coordinate: `0` for the root, 1-based sibling indices below.
    ///
    /// `3.2.2` is the second child of the second child of the third child of
    /// the root.
    pub fn position_in_tree(&self) -> String {
        if self.is_root() {
            return "0".to_string();
        }
        // path is [self, .., root]; the root contributes no index
        let path = self.path_ids();
        path[..path.len() - 1]
            .iter()
            .rev()
            .map(|&id| self.at(id).sibling_index().map_or(0, |i| i + 1))
            .join(".")
    }

    pub fn children_of_type(&self, predicate: impl Fn(&T) -> bool) -> Vec<Self> {
        self.children()
            .filter(|child| predicate(child.data()))
            .collect()
    }

    /// Pre-order nodes for which `key(node) == value`.
    pub fn filter_nodes<K: PartialEq>(&self, key: impl Fn(Self) -> K, value: K) -> Vec<Self> {
        self.traverse().filter(|&node| key(node) == value).collect()
    }

    /// All nodes `level` layers below `self`.
    ///
    /// Leaves of branches shorter than `level` are repeated on every deeper
    /// layer.
    pub fn layer(&self, level: usize) -> Vec<Self> {
        if level == 0 {
            return vec![*self];
        }
        let mut output: Vec<Self> = self.children().collect();
        for _ in 1..level {
            output = output
                .into_iter()
                .flat_map(|node| {
                    if node.is_leaf() {
                        vec![node]
                    } else {
                        node.children().collect()
                    }
                })
                .collect();
        }
        output
    }

    /// [`NodeRef::layer`] with every node passed through `key`.
    pub fn layer_by<V>(&self, level: usize, key: impl FnMut(Self) -> V) -> Vec<V> {
        self.layer(level).into_iter().map(key).collect()
    }

    /// Leaves nested the way the branches are nested.
    pub fn leaves(&self) -> Vec<Leaves<Self>> {
        self.leaves_by(|node| node)
    }

    pub fn leaves_by<V, F>(&self, key: F) -> Vec<Leaves<V>>
    where
        F: Fn(Self) -> V,
    {
        self.collect_leaves(&key)
    }

    fn collect_leaves<V, F>(&self, key: &F) -> Vec<Leaves<V>>
    where
        F: Fn(Self) -> V,
    {
        if self.is_leaf() {
            return vec![Leaves::Leaf(key(*self))];
        }
        // the branch being filled, and the unfinished branches above it
        let mut current = (self.children(), Vec::new());
        let mut open: Vec<(Nodes<'a, T>, Vec<Leaves<V>>)> = Vec::new();
        loop {
            match current.0.next() {
                Some(child) if child.is_leaf() => current.1.push(Leaves::Leaf(key(child))),
                Some(child) => {
                    open.push(std::mem::replace(&mut current, (child.children(), Vec::new())));
                }
                None => {
                    let (_, finished) = current;
                    match open.pop() {
                        Some(mut parent) => {
                            parent.1.push(Leaves::Branch(finished));
                            current = parent;
                        }
                        None => return finished,
                    }
                }
            }
        }
    }

    /// Pre-order walk of the subtree, served from the cache.
    pub fn traverse(&self) -> Nodes<'a, T> {
        Nodes::new(self.tree, self.traversal_ids())
    }

    pub fn iterate_leaves(&self) -> Nodes<'a, T> {
        Nodes::new(self.tree, self.leaf_ids())
    }

    /// `[self, parent, ..., root]`, served from the cache.
    pub fn reversed_path_to_root(&self) -> Nodes<'a, T> {
        Nodes::new(self.tree, self.path_ids())
    }

    pub fn traversal_ids(&self) -> &'a [NodeId] {
        self.slot().traversed.get_or_init(|| {
            trace!(id = %self.id, "building traversal cache");
            self.tree.iter(self.id).map(|(id, _)| id).collect()
        })
    }

    pub fn leaf_ids(&self) -> &'a [NodeId] {
        self.slot().leaves.get_or_init(|| {
            trace!(id = %self.id, "building leaf cache");
            self.traversal_ids()
                .iter()
                .copied()
                .filter(|&id| self.tree.slot(id).is_leaf())
                .collect()
        })
    }

    pub fn path_ids(&self) -> &'a [NodeId] {
        self.slot().path_to_root.get_or_init(|| {
            trace!(id = %self.id, "building root path cache");
            let mut path = vec![self.id];
            let mut current = self.slot().parent;
            while let Some(id) = current {
                let ancestor = self.tree.slot(id);
                // reuse the nearest ancestor path that is already cached
                if let Some(rest) = ancestor.path_to_root.get() {
                    path.extend_from_slice(rest);
                    break;
                }
                path.push(id);
                current = ancestor.parent;
            }
            path
        })
    }

    pub fn is_traversal_cached(&self) -> bool {
        self.slot().traversed.get().is_some()
    }

    pub fn is_leaf_cache_filled(&self) -> bool {
        self.slot().leaves.get().is_some()
    }

    pub fn is_path_cached(&self) -> bool {
        self.slot().path_to_root.get().is_some()
    }
}

impl<T: NodeData + fmt::Display> NodeRef<'_, T> {
    /// Text of this node under `key`.
    pub fn label(&self, key: &Key<'_, T>) -> TreeResult<String> {
        key.resolve(*self)
    }
}

/// Iterator over a list of node ids, yielding handles.
pub struct Nodes<'a, T> {
    tree: &'a TreeArena<T>,
    ids: slice::Iter<'a, NodeId>,
}

impl<'a, T> Nodes<'a, T> {
    fn new(tree: &'a TreeArena<T>, ids: &'a [NodeId]) -> Self {
        Self {
            tree,
            ids: ids.iter(),
        }
    }

    pub fn ids(&self) -> &'a [NodeId] {
        self.ids.as_slice()
    }
}

impl<T> Clone for Nodes<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            ids: self.ids.clone(),
        }
    }
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| NodeRef::new(self.tree, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T> DoubleEndedIterator for Nodes<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| NodeRef::new(self.tree, id))
    }
}

impl<T> ExactSizeIterator for Nodes<'_, T> {}

impl<T> FusedIterator for Nodes<'_, T> {}

/// One entry of a nested leaf listing: a leaf, or the listing of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaves<V> {
    Leaf(V),
    Branch(Vec<Leaves<V>>),
}

impl<V> Leaves<V> {
    pub fn map<U>(self, f: &mut impl FnMut(V) -> U) -> Leaves<U> {
        match self {
            Leaves::Leaf(value) => Leaves::Leaf(f(value)),
            Leaves::Branch(items) => Leaves::Branch(items.into_iter().map(|item| item.map(f)).collect()),
        }
    }

    pub fn try_map<U, E>(self, f: &mut impl FnMut(V) -> Result<U, E>) -> Result<Leaves<U>, E> {
        match self {
            Leaves::Leaf(value) => f(value).map(Leaves::Leaf),
            Leaves::Branch(items) => items
                .into_iter()
                .map(|item| item.try_map(f))
                .collect::<Result<Vec<_>, E>>()
                .map(Leaves::Branch),
        }
    }

    /// Leaves in pre-order, nesting dropped.
    pub fn flatten(self) -> Vec<V> {
        let mut out = Vec::new();
        let mut stack = vec![vec![self].into_iter()];
        while let Some(items) = stack.last_mut() {
            match items.next() {
                Some(Leaves::Leaf(value)) => out.push(value),
                Some(Leaves::Branch(nested)) => stack.push(nested.into_iter()),
                None => {
                    stack.pop();
                }
            }
        }
        out
    }
}

impl<V: fmt::Display> fmt::Display for Leaves<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaves::Leaf(value) => fmt::Display::fmt(value, f),
            Leaves::Branch(items) => write!(f, "[{}]", items.iter().join(", ")),
        }
    }
}

/// Formats a top-level leaf listing as `[a, [b, c], d]`.
pub fn format_leaves<V: fmt::Display>(items: &[Leaves<V>]) -> String {
    format!("[{}]", items.iter().join(", "))
}
