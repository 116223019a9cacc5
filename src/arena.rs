use generational_arena::Arena;
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeData, NodeId, Selector, TreeNode};
use crate::query::NodeRef;

/// Arena holding any number of trees.
///
/// Nodes are created detached and become part of a tree only through
/// [`TreeArena::add_child`] or [`TreeArena::replace_child`]. A child's parent
/// is stored as a plain [`NodeId`]; the children vector is the ownership edge,
/// so [`TreeArena::delete`] drops a node together with its whole subtree.
#[derive(Debug)]
pub struct TreeArena<T> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T>>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Creates a detached node: no parent, no children.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert(&mut self, data: T) -> NodeId {
        NodeId(self.arena.insert(TreeNode::new(data)))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    pub fn data(&self, id: NodeId) -> TreeResult<&T> {
        self.require(id).map(|node| &node.data)
    }

    /// Mutable payload access. The structure of the tree cannot be changed
    /// through it, so no cached view is touched.
    pub fn data_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        self.arena
            .get_mut(id.0)
            .map(|node| &mut node.data)
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Read-only handle used for all structural queries.
    pub fn node(&self, id: NodeId) -> TreeResult<NodeRef<'_, T>> {
        self.require(id)?;
        Ok(NodeRef::new(self, id))
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.contains(id).then(|| NodeRef::new(self, id))
    }

    /// All nodes without a parent, in arena slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_, T>> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(move |(idx, _)| NodeRef::new(self, NodeId(idx)))
    }

    /// Pre-order walk of the subtree below `start`, computed on the fly.
    ///
    /// Unknown ids yield an empty iterator.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self, start: NodeId) -> TreeIterator<'_, T> {
        TreeIterator::new(self, start)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, start: NodeId) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self, start)
    }

    fn require(&self, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Slot of an id reached through parent/child links. Links only ever
    /// point at live nodes, so a miss is a broken invariant.
    pub(crate) fn slot(&self, id: NodeId) -> &TreeNode<T> {
        &self.arena[id.0]
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut TreeNode<T> {
        &mut self.arena[id.0]
    }

    fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.slot(current).parent {
            current = parent;
        }
        current
    }

    /// Drops the cached views of `id` and of every ancestor up to the root.
    fn invalidate_upward(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(idx) = current {
            let node = self.slot_mut(idx);
            node.reset_caches();
            current = node.parent;
        }
    }

    /// Drops the root paths of a subtree that was attached or detached.
    fn invalidate_paths_below(&mut self, id: NodeId) {
        let subtree: Vec<NodeId> = self.iter(id).map(|(idx, _)| idx).collect();
        for idx in subtree {
            self.slot_mut(idx).reset_path();
        }
    }

    /// Detaches `child` from `parent`. The detached subtree keeps its own
    /// structure and becomes a root.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let position = self
            .require(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::ChildNotFound { parent, child })?;

        let owner = self.slot_mut(parent);
        owner.children.remove(position);
        owner.sync_leaf_flag();
        self.slot_mut(child).parent = None;

        self.invalidate_upward(parent);
        self.invalidate_paths_below(child);
        debug!(%parent, %child, "removed child");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_children(&mut self, parent: NodeId) -> TreeResult<()> {
        let children = self.require(parent)?.children.clone();
        for child in children {
            self.remove(parent, child)?;
        }
        Ok(())
    }

    /// Detaches `id` and drops it with all its descendants, returning the
    /// payload of `id` itself.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> TreeResult<T> {
        if let Some(parent) = self.require(id)?.parent {
            self.remove(parent, id)?;
        }

        let doomed: Vec<NodeId> = self.iter_postorder(id).map(|(idx, _)| idx).collect();
        debug!(%id, count = doomed.len(), "deleting subtree");
        let mut data = None;
        for idx in doomed {
            if let Some(node) = self.arena.remove(idx.0) {
                if idx == id {
                    data = Some(node.data);
                }
            }
        }
        data.ok_or(TreeError::UnknownNode(id))
    }
}

impl<T: NodeData> TreeArena<T> {
    /// Checks everything `add_child`/`replace_child` require of a candidate
    /// before anything is mutated.
    fn check_candidate(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let owner = self.require(parent)?;
        let candidate = self.require(child)?;

        if !owner.data.accepts_child(&candidate.data) {
            return Err(TreeError::InvalidChild { parent, child });
        }
        if let Some(current) = candidate.parent {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: current,
            });
        }
        // candidate is a root here, so it is an ancestor of parent only if it is parent's root
        if self.root_of(parent) == child {
            return Err(TreeError::CycleDetected(child));
        }
        Ok(())
    }

    /// Appends `child` to the children of `parent` and returns it.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<NodeId> {
        self.check_candidate(parent, child)?;

        self.slot_mut(child).parent = Some(parent);
        let owner = self.slot_mut(parent);
        owner.children.push(child);
        owner.sync_leaf_flag();

        self.invalidate_upward(parent);
        self.invalidate_paths_below(child);
        debug!(%parent, %child, "added child");
        Ok(child)
    }

    /// Puts `new` at the position of the `occurrence`-th child matching
    /// `old` and returns the id of the child it replaced, now detached.
    #[instrument(level = "debug", skip(self, old))]
    pub fn replace_child<'s>(
        &mut self,
        parent: NodeId,
        old: impl Into<Selector<'s, T>>,
        new: NodeId,
        occurrence: usize,
    ) -> TreeResult<NodeId>
    where
        T: 's,
    {
        let old = old.into();
        let matches: Vec<usize> = self
            .require(parent)?
            .children
            .iter()
            .enumerate()
            .filter(|&(_, &id)| old.matches(id, self.slot(id)))
            .map(|(position, _)| position)
            .collect();

        if matches.is_empty() {
            return Err(TreeError::NotFound { parent });
        }
        let position = *matches
            .get(occurrence)
            .ok_or(TreeError::IndexOutOfRange {
                index: occurrence,
                matches: matches.len(),
            })?;
        self.check_candidate(parent, new)?;

        let replaced = std::mem::replace(&mut self.slot_mut(parent).children[position], new);
        self.slot_mut(replaced).parent = None;
        self.slot_mut(new).parent = Some(parent);

        self.invalidate_upward(parent);
        self.invalidate_paths_below(replaced);
        self.invalidate_paths_below(new);
        debug!(%parent, %replaced, %new, position, "replaced child");
        Ok(replaced)
    }
}

pub struct TreeIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if arena.contains(start) {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.arena.slot(current);
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some((current, node))
    }
}

pub struct PostOrderIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if arena.contains(start) {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            let node = self.arena.slot(current);
            if visited {
                return Some((current, node));
            }
            self.stack.push((current, true));
            for &child in node.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}
