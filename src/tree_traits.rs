use std::convert::Infallible;
use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::errors::TreeResult;
use crate::node::NodeData;
use crate::query::{NodeRef, Nodes};
use crate::render::Key;

/// Conversion of a subtree into a `termtree` tree, the plain display style.
pub trait TreeNodeConvert {
    type Data;

    fn to_tree_string(&self) -> Tree<String>;

    fn to_keyed_tree(&self, key: &Key<'_, Self::Data>) -> TreeResult<Tree<String>>;
}

impl<T: NodeData + fmt::Display> TreeNodeConvert for NodeRef<'_, T> {
    type Data = T;

    #[instrument(level = "trace", skip(self), fields(root = %self.id()))]
    fn to_tree_string(&self) -> Tree<String> {
        match build_tree(*self, |node| Ok::<_, Infallible>(node.data().to_string())) {
            Ok(tree) => tree,
            Err(never) => match never {},
        }
    }

    fn to_keyed_tree(&self, key: &Key<'_, T>) -> TreeResult<Tree<String>> {
        build_tree(*self, |node| key.resolve(node))
    }
}

/// Builds the termtree of `root` with an explicit stack, labelling nodes in
/// pre-order.
fn build_tree<'a, T, E>(
    root: NodeRef<'a, T>,
    mut label: impl FnMut(NodeRef<'a, T>) -> Result<String, E>,
) -> Result<Tree<String>, E> {
    let mut current: (String, Vec<Tree<String>>, Nodes<'a, T>) =
        (label(root)?, Vec::new(), root.children());
    let mut open = Vec::new();
    loop {
        if let Some(child) = current.2.next() {
            let frame = (label(child)?, Vec::new(), child.children());
            open.push(std::mem::replace(&mut current, frame));
            continue;
        }
        let (text, leaves, _) = current;
        let tree = Tree::new(text).with_leaves(leaves);
        match open.pop() {
            Some(mut parent) => {
                parent.1.push(tree);
                current = parent;
            }
            None => return Ok(tree),
        }
    }
}
