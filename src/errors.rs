use thiserror::Error;

use crate::node::NodeId;

/// Contract violations raised by tree operations.
///
/// Every mutating operation validates before it touches the arena, so an
/// error always leaves the tree exactly as it was.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("node {child} rejected as child of {parent}")]
    InvalidChild { parent: NodeId, child: NodeId },

    #[error("node {child} is not a child of {parent}")]
    ChildNotFound { parent: NodeId, child: NodeId },

    #[error("no child of {parent} matches the selector")]
    NotFound { parent: NodeId },

    #[error("occurrence {index} out of range, only {matches} matching children")]
    IndexOutOfRange { index: usize, matches: usize },

    #[error("node {child} is already attached to {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("attaching {0} would create a cycle")]
    CycleDetected(NodeId),

    #[error("key '{key}' cannot be applied: {reason}")]
    TypeMismatch { key: String, reason: String },

    #[error("indentation width must be greater than 0, got {0}")]
    InvalidWidth(usize),

    #[error("invalid outline at line {line}: {reason}")]
    InvalidOutline { line: usize, reason: String },

    #[error("failed to read outline: {0}")]
    Io(#[from] std::io::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
