//! Ordered N-ary trees with parent links.
//!
//! Nodes live in a [`TreeArena`] and are addressed by [`NodeId`]. Children
//! are owned by their parent, the parent link is a plain id. Structural
//! queries go through the read-only [`NodeRef`] handle, which serves
//! pre-order traversal, leaf iteration and the path to the root from
//! per-node caches; every mutation drops the caches it can affect.
//!
//! ```
//! use simpletree::{NodeData, TreeArena, TreeRepresentation};
//!
//! struct Name(&'static str);
//!
//! impl NodeData for Name {
//!     fn accepts_child(&self, _candidate: &Self) -> bool {
//!         true
//!     }
//! }
//!
//! impl std::fmt::Display for Name {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str(self.0)
//!     }
//! }
//!
//! let mut tree = TreeArena::new();
//! let root = tree.insert(Name("root"));
//! let child = tree.insert(Name("child"));
//! tree.add_child(root, child)?;
//!
//! let node = tree.node(child)?;
//! assert_eq!(node.position_in_tree(), "1");
//! assert_eq!(
//!     TreeRepresentation::new().render(tree.node(root)?)?,
//!     "└── root\n    └── child\n"
//! );
//! # Ok::<(), simpletree::TreeError>(())
//! ```

pub mod arena;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod node;
pub mod outline;
pub mod query;
pub mod render;
pub mod tree_traits;
pub mod util;

pub use arena::TreeArena;
pub use errors::{TreeError, TreeResult};
pub use node::{NodeData, NodeId, Selector, TreeNode};
pub use query::{format_leaves, Leaves, NodeRef, Nodes};
pub use render::{Key, TreeRepresentation};
pub use tree_traits::TreeNodeConvert;
