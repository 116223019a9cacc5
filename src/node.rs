//! Node storage types: ids, the child acceptance hook and the arena slot.

use std::sync::OnceLock;
use std::fmt;

use generational_arena::Index;

/// Handle of a node inside a [`crate::arena::TreeArena`].
///
/// Ids are generational: once a node is deleted its id never resolves to
/// another node, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) Index);

impl NodeId {
    /// Position of the slot in the arena.
    pub fn slot(&self) -> usize {
        self.0.into_raw_parts().0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{slot}@{generation}")
    }
}

/// Capability every payload stored in a tree must provide.
///
/// `accepts_child` is consulted before a node is attached through
/// `add_child` or `replace_child`; a `false` answer aborts the operation with
/// [`crate::errors::TreeError::InvalidChild`] and nothing is mutated.
pub trait NodeData {
    /// Whether `candidate` may be attached below a node carrying `self`.
    fn accepts_child(&self, candidate: &Self) -> bool;

    /// Named attribute used by [`crate::render::Key::Field`].
    fn field(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Arena slot of a single node.
///
/// The children vector is the only ownership edge; `parent` is a plain id.
/// The three cached views are filled on first read and dropped together by
/// every structural change that can affect them.
#[derive(Debug)]
pub struct TreeNode<T> {
    /// Payload of the concrete node variant
    pub data: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) is_leaf: bool,
    pub(crate) traversed: OnceLock<Vec<NodeId>>,
    pub(crate) leaves: OnceLock<Vec<NodeId>>,
    pub(crate) path_to_root: OnceLock<Vec<NodeId>>,
}

impl<T> TreeNode<T> {
    pub(crate) fn new(data: T) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            is_leaf: true,
            traversed: OnceLock::new(),
            leaves: OnceLock::new(),
            path_to_root: OnceLock::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub(crate) fn sync_leaf_flag(&mut self) {
        self.is_leaf = self.children.is_empty();
    }

    pub(crate) fn reset_caches(&mut self) {
        self.traversed.take();
        self.leaves.take();
        self.path_to_root.take();
    }

    pub(crate) fn reset_path(&mut self) {
        self.path_to_root.take();
    }
}

/// Which child `replace_child` should act on.
pub enum Selector<'a, T> {
    /// The child with exactly this id.
    Node(NodeId),
    /// Every child whose slot satisfies the predicate.
    Matching(Box<dyn Fn(&TreeNode<T>) -> bool + 'a>),
}

impl<'a, T> Selector<'a, T> {
    pub fn matching(predicate: impl Fn(&TreeNode<T>) -> bool + 'a) -> Self {
        Selector::Matching(Box::new(predicate))
    }

    pub(crate) fn matches(&self, id: NodeId, node: &TreeNode<T>) -> bool {
        match self {
            Selector::Node(wanted) => *wanted == id,
            Selector::Matching(predicate) => predicate(node),
        }
    }
}

impl<T> From<NodeId> for Selector<'_, T> {
    fn from(id: NodeId) -> Self {
        Selector::Node(id)
    }
}

impl<T> fmt::Debug for Selector<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Node(id) => f.debug_tuple("Node").field(id).finish(),
            Selector::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}
