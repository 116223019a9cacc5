//! Box-drawing rendering of a subtree.
//!
//! ```text
//! └── root
//!     ├── child1
//!     ├── child2
//!     │   ├── grandchild1
//!     │   └── grandchild2
//!     └── child3
//! ```

use std::fmt;

use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::node::NodeData;
use crate::query::NodeRef;

pub const DEFAULT_WIDTH: usize = 3;

const LAST_HOOK: char = '└';
const CONTINUE_HOOK: char = '├';
const NO_HOOK: char = '│';
const HORIZONTAL: char = '─';

/// How a node is turned into the text of its line.
pub enum Key<'a, T> {
    /// The payload's `Display` form.
    Display,
    /// A named payload field, see [`NodeData::field`].
    Field(String),
    /// The dotted coordinate of the node.
    Position,
    /// The depth of the node.
    Level,
    With(Box<dyn Fn(NodeRef<'_, T>) -> String + 'a>),
}

impl<'a, T> Key<'a, T> {
    pub fn with(f: impl Fn(NodeRef<'_, T>) -> String + 'a) -> Self {
        Key::With(Box::new(f))
    }

    /// Maps a configured key name to a key. Unknown names are taken as
    /// field names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "display" => Key::Display,
            "position" => Key::Position,
            "level" => Key::Level,
            field => Key::Field(field.to_string()),
        }
    }
}

impl<T: NodeData + fmt::Display> Key<'_, T> {
    pub fn resolve(&self, node: NodeRef<'_, T>) -> TreeResult<String> {
        match self {
            Key::Display => Ok(node.data().to_string()),
            Key::Field(name) => node.data().field(name).ok_or_else(|| TreeError::TypeMismatch {
                key: name.clone(),
                reason: format!("node {} has no field '{}'", node.id(), name),
            }),
            Key::Position => Ok(node.position_in_tree()),
            Key::Level => Ok(node.level().to_string()),
            Key::With(f) => Ok(f(node)),
        }
    }
}

impl<T> Default for Key<'_, T> {
    fn default() -> Self {
        Key::Display
    }
}

impl<T> fmt::Debug for Key<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Display => f.write_str("Display"),
            Key::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Key::Position => f.write_str("Position"),
            Key::Level => f.write_str("Level"),
            Key::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Renders every node of a subtree on its own line, in pre-order.
///
/// `width` is the number of horizontal characters between a branch hook
/// and the label (the last one is a space).
#[derive(Debug)]
pub struct TreeRepresentation<'a, T> {
    key: Key<'a, T>,
    width: usize,
}

impl<T> Default for TreeRepresentation<'_, T> {
    fn default() -> Self {
        Self {
            key: Key::Display,
            width: DEFAULT_WIDTH,
        }
    }
}

impl<'a, T> TreeRepresentation<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: Key<'a, T>) -> Self {
        self.key = key;
        self
    }

    pub fn with_width(mut self, width: usize) -> TreeResult<Self> {
        if width == 0 {
            return Err(TreeError::InvalidWidth(width));
        }
        self.width = width;
        Ok(self)
    }

    pub fn key(&self) -> &Key<'a, T> {
        &self.key
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Indentation in front of the hook: one column group per ancestor, with
    /// a vertical line wherever that ancestor still has siblings below it.
    fn prefix(&self, node: NodeRef<'_, T>) -> String {
        let mut groups: Vec<String> = node
            .reversed_path_to_root()
            .skip(1)
            .map(|ancestor| {
                if ancestor.is_last_child() {
                    " ".repeat(self.width + 1)
                } else {
                    format!("{NO_HOOK}{}", " ".repeat(self.width))
                }
            })
            .collect();
        groups.reverse();
        groups.concat()
    }

    fn hook(node: NodeRef<'_, T>) -> char {
        if node.is_last_child() {
            LAST_HOOK
        } else {
            CONTINUE_HOOK
        }
    }

    fn horizontal(&self) -> String {
        format!("{} ", HORIZONTAL.to_string().repeat(self.width - 1))
    }
}

impl<T: NodeData + fmt::Display> TreeRepresentation<'_, T> {
    #[instrument(level = "debug", skip(self, node), fields(root = %node.id()))]
    pub fn render(&self, node: NodeRef<'_, T>) -> TreeResult<String> {
        let horizontal = self.horizontal();
        let mut output = String::new();
        for current in node.traverse() {
            output.push_str(&self.prefix(current));
            output.push(Self::hook(current));
            output.push_str(&horizontal);
            output.push_str(&self.key.resolve(current)?);
            output.push('\n');
        }
        Ok(output)
    }
}
