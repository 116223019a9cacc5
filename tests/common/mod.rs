//! Sample trees shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;

use rstest::fixture;
use simpletree::util::testing;
use simpletree::{NodeData, NodeId, TreeArena};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Branch,
    /// Accepts no children
    Sealed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: &'static str,
    pub kind: Kind,
}

impl NodeData for Node {
    fn accepts_child(&self, _candidate: &Self) -> bool {
        self.kind == Kind::Branch
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Arena plus name lookup for the nodes it was built with.
pub struct Sample {
    pub tree: TreeArena<Node>,
    pub ids: HashMap<&'static str, NodeId>,
}

impl Sample {
    pub fn id(&self, name: &str) -> NodeId {
        self.ids[name]
    }

    pub fn insert(&mut self, name: &'static str, kind: Kind) -> NodeId {
        let id = self.tree.insert(Node { name, kind });
        self.ids.insert(name, id);
        id
    }

    pub fn attach(&mut self, parent: &str, name: &'static str) -> NodeId {
        let parent = self.id(parent);
        let id = self.insert(name, Kind::Branch);
        self.tree.add_child(parent, id).unwrap();
        id
    }

    pub fn names(&self, ids: impl IntoIterator<Item = NodeId>) -> Vec<&'static str> {
        ids.into_iter()
            .map(|id| self.tree.data(id).unwrap().name)
            .collect()
    }
}

// root
// ├── child1
// ├── child2
// │   ├── grandchild1
// │   └── grandchild2
// ├── child3
// └── child4
//     └── grandchild3
#[fixture]
pub fn shallow() -> Sample {
    testing::init_test_setup();
    let mut sample = Sample {
        tree: TreeArena::new(),
        ids: HashMap::new(),
    };
    sample.insert("root", Kind::Branch);
    for name in ["child1", "child2", "child3", "child4"] {
        sample.attach("root", name);
    }
    sample.attach("child2", "grandchild1");
    sample.attach("child2", "grandchild2");
    sample.attach("child4", "grandchild3");
    sample
}

// shallow plus greatgrandchild1 and greatgrandchild2 below grandchild1
#[fixture]
pub fn deep(mut shallow: Sample) -> Sample {
    shallow.attach("grandchild1", "greatgrandchild1");
    shallow.attach("grandchild1", "greatgrandchild2");
    shallow
}

/// Checks parent/child consistency and the leaf flag for every live node.
pub fn assert_consistent(tree: &TreeArena<Node>) {
    for root in tree.roots() {
        for node in root.traverse() {
            assert_eq!(node.is_leaf(), node.children_ids().is_empty());
            for child in node.children() {
                assert_eq!(child.parent(), Some(node));
                let count = node
                    .children_ids()
                    .iter()
                    .filter(|&&id| id == child.id())
                    .count();
                assert_eq!(count, 1);
            }
        }
    }
}
