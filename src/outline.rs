//! Builds trees from indented outlines.
//!
//! ```text
//! # comment lines and blank lines are skipped
//! root
//!   child1
//!   child2
//!     grandchild1
//! ```
//!
//! The depth of a line is its leading indentation divided by the indent
//! width; a tab always counts as one level. Several unindented lines produce
//! several roots.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::arena::TreeArena;
use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeData, NodeId};

pub const DEFAULT_INDENT: usize = 2;

/// Payload of an outline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Text of the line, trimmed
    pub name: String,
    /// 1-based line number in the source
    pub line: usize,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl NodeData for Label {
    fn accepts_child(&self, _candidate: &Self) -> bool {
        true
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "line" => Some(self.line.to_string()),
            _ => None,
        }
    }
}

/// Trees read from one outline, roots in source order.
#[derive(Debug)]
pub struct Outline {
    pub tree: TreeArena<Label>,
    pub roots: Vec<NodeId>,
}

pub struct OutlineBuilder {
    indent: usize,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> TreeResult<Self> {
        if indent == 0 {
            return Err(TreeError::InvalidWidth(indent));
        }
        self.indent = indent;
        Ok(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build_from_file(&self, path: &Path) -> TreeResult<Outline> {
        let content = fs::read_to_string(path)?;
        self.build_from_str(&content)
    }

    #[instrument(level = "debug", skip(self, content))]
    pub fn build_from_str(&self, content: &str) -> TreeResult<Outline> {
        let mut tree = TreeArena::new();
        let mut roots = Vec::new();
        // open[d] is the most recent node on depth d
        let mut open: Vec<NodeId> = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let depth = self.depth_of(raw, line)?;
            if depth > open.len() {
                return Err(TreeError::InvalidOutline {
                    line,
                    reason: format!(
                        "depth {} skips a level, deepest open node is on depth {}",
                        depth,
                        open.len().saturating_sub(1)
                    ),
                });
            }
            open.truncate(depth);

            let id = tree.insert(Label {
                name: text.to_string(),
                line,
            });
            match open.last() {
                Some(&parent) => {
                    tree.add_child(parent, id)?;
                }
                None => roots.push(id),
            }
            open.push(id);
        }

        debug!(nodes = tree.len(), roots = roots.len(), "outline parsed");
        Ok(Outline { tree, roots })
    }

    fn depth_of(&self, raw: &str, line: usize) -> TreeResult<usize> {
        let mut tabs = 0;
        let mut spaces = 0;
        for c in raw.chars() {
            match c {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                _ => break,
            }
        }
        if spaces % self.indent != 0 {
            return Err(TreeError::InvalidOutline {
                line,
                reason: format!(
                    "{} leading spaces is not a multiple of the indent width {}",
                    spaces, self.indent
                ),
            });
        }
        Ok(tabs + spaces / self.indent)
    }
}
