//! Hosts: objects whose slots the resolver populates

use std::collections::{BTreeMap, BTreeSet};
use tether_types::{MemberId, NodeHandle, TypeTag};

/// Error raised by a host when a slot value cannot be stored
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotAssignError {
    #[error("{host_type} has no member {member}")]
    UnknownMember { host_type: TypeTag, member: MemberId },

    #[error("member {0} is read-only")]
    ReadOnly(MemberId),

    #[error("{0}")]
    Rejected(String),
}

/// Capability of a host that can have its slots bound.
///
/// The host is itself a node in the tree (`host_node`), and holds only
/// non-owning handles to the nodes bound into its slots.
pub trait Bindable {
    /// Registry key used to enumerate this host's slots
    fn host_type(&self) -> TypeTag;

    /// The host's own position in the tree
    fn host_node(&self) -> NodeHandle;

    /// Current value of a slot, if set
    fn slot_value(&self, member: &MemberId) -> Option<NodeHandle>;

    /// Store a bound node into a slot
    fn set_slot_value(&mut self, member: &MemberId, node: NodeHandle)
        -> Result<(), SlotAssignError>;

    /// Reset a slot to its empty default
    fn clear_slot_value(&mut self, member: &MemberId);
}

/// A host whose slot storage is a plain map, for hosts described by data
#[derive(Clone, Debug)]
pub struct DynamicHost {
    node: NodeHandle,
    host_type: TypeTag,
    values: BTreeMap<MemberId, NodeHandle>,
    read_only: BTreeSet<MemberId>,
}

impl DynamicHost {
    pub fn new(node: NodeHandle, host_type: impl Into<TypeTag>) -> Self {
        Self {
            node,
            host_type: host_type.into(),
            values: BTreeMap::new(),
            read_only: BTreeSet::new(),
        }
    }

    /// Make assignments to `member` fail
    pub fn with_read_only(mut self, member: impl Into<MemberId>) -> Self {
        self.read_only.insert(member.into());
        self
    }

    pub fn get(&self, member: &str) -> Option<NodeHandle> {
        self.values.get(&MemberId::new(member)).copied()
    }

    /// All bound members
    pub fn values(&self) -> &BTreeMap<MemberId, NodeHandle> {
        &self.values
    }
}

impl Bindable for DynamicHost {
    fn host_type(&self) -> TypeTag {
        self.host_type.clone()
    }

    fn host_node(&self) -> NodeHandle {
        self.node
    }

    fn slot_value(&self, member: &MemberId) -> Option<NodeHandle> {
        self.values.get(member).copied()
    }

    fn set_slot_value(
        &mut self,
        member: &MemberId,
        node: NodeHandle,
    ) -> Result<(), SlotAssignError> {
        if self.read_only.contains(member) {
            return Err(SlotAssignError::ReadOnly(member.clone()));
        }
        self.values.insert(member.clone(), node);
        Ok(())
    }

    fn clear_slot_value(&mut self, member: &MemberId) {
        self.values.remove(member);
    }
}
