//! Error types for tree operations

use tether_types::{NodeHandle, TypeTag};
use thiserror::Error;

/// Errors that can occur while building or mutating a scene tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The handle does not name a node (never allocated or already freed).
    #[error("stale node handle: {0}")]
    StaleHandle(NodeHandle),

    /// The node is queued for destruction.
    #[error("node {0} is dead")]
    DeadNode(NodeHandle),

    /// The node already has a parent.
    #[error("node {0} already has a parent")]
    AlreadyParented(NodeHandle),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeHandle, child: NodeHandle },

    /// The node is not a direct child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeHandle, child: NodeHandle },

    /// The root node cannot be detached or freed.
    #[error("operation not allowed on the root node")]
    RootNode,

    /// The type is not in the catalog.
    #[error("unknown type: {0}")]
    UnknownType(TypeTag),

    /// The type was registered twice.
    #[error("type already registered: {0}")]
    DuplicateType(TypeTag),

    /// The type cannot be placed in the tree.
    #[error("type {0} is not a node type")]
    NotANodeType(TypeTag),

    /// No further node indices can be allocated.
    #[error("node arena is full")]
    ArenaFull,
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
