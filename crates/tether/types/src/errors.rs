//! Error types for the binding layer
//!
//! Per-slot problems are [`SlotFailure`] values recorded in a report. They
//! only become a [`BindError`] when the run-time policy aggregates them.

use crate::{MemberId, TypeTag};
use serde::{Deserialize, Serialize};

/// Why an auto-instantiated slot could not be populated
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum AutoInstantiateFailure {
    #[error("no default constructor")]
    NoDefaultConstructor,

    #[error("constructor failed: {0}")]
    ConstructorFailed(String),

    #[error("{0} is not tree-attachable")]
    NotAttachable(TypeTag),

    #[error("attach failed: {0}")]
    AttachFailed(String),

    #[error("assignment failed: {0}")]
    AssignmentFailed(String),
}

/// Failure of a single slot during a resolution pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotFailure {
    #[error("no live node named '{search_key}' of type {expected} below '{root}'")]
    BindingNotFound {
        search_key: String,
        expected: TypeTag,
        root: String,
    },

    #[error("node '{path}' has type {found}, expected {expected} or a subtype")]
    BindingTypeMismatch {
        path: String,
        expected: TypeTag,
        found: TypeTag,
    },

    #[error("failed to assign node '{path}' to {member}: {cause}")]
    AssignmentFailed {
        member: MemberId,
        path: String,
        cause: String,
    },

    #[error("auto-instantiation of {member} ({declared_type}) failed: {reason}")]
    AutoInstantiationFailed {
        member: MemberId,
        declared_type: TypeTag,
        reason: AutoInstantiateFailure,
    },
}

impl SlotFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            SlotFailure::BindingNotFound { .. } => FailureKind::BindingNotFound,
            SlotFailure::BindingTypeMismatch { .. } => FailureKind::BindingTypeMismatch,
            SlotFailure::AssignmentFailed { .. } => FailureKind::AssignmentFailed,
            SlotFailure::AutoInstantiationFailed { .. } => FailureKind::AutoInstantiationFailed,
        }
    }
}

/// Coarse classification of a [`SlotFailure`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    BindingNotFound,
    BindingTypeMismatch,
    AssignmentFailed,
    AutoInstantiationFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::BindingNotFound => "binding not found",
            FailureKind::BindingTypeMismatch => "binding type mismatch",
            FailureKind::AssignmentFailed => "assignment failed",
            FailureKind::AutoInstantiationFailed => "auto-instantiation failed",
        };
        f.write_str(label)
    }
}

/// One entry of an aggregate failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSlot {
    pub name: String,
    pub kind: FailureKind,
    pub diagnostic: String,
}

impl FailedSlot {
    fn join_names(failed: &[FailedSlot]) -> String {
        failed
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Errors that can occur in binding operations
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("Failed to resolve slots on {host}: {}", FailedSlot::join_names(.failed))]
    AggregateBindingFailure { host: String, failed: Vec<FailedSlot> },

    #[error("Host type already declared: {0}")]
    DuplicateHostType(TypeTag),

    #[error("Duplicate slot member {member} on {host_type}")]
    DuplicateMember { host_type: TypeTag, member: MemberId },

    #[error("Invalid slot {member}: {reason}")]
    InvalidSlot { member: MemberId, reason: String },
}

impl BindError {
    /// Names of the failed slots, in declaration order. Empty for
    /// declaration errors.
    pub fn failed_slot_names(&self) -> Vec<&str> {
        match self {
            BindError::AggregateBindingFailure { failed, .. } => {
                failed.iter().map(|f| f.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Result type alias for binding operations
pub type BindResult<T> = Result<T, BindError>;
