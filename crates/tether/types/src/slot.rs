//! Slot descriptors: what a host type declares for binding

use crate::{BindError, BindResult, MemberId, TypeTag};
use serde::{Deserialize, Serialize};

/// How a slot gets its value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Must be found in the subtree; absence is a failure
    Required,
    /// May be found; absence is silent
    Optional,
    /// Freshly constructed and attached under the host
    AutoInstantiate,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SlotKind::Required => "required",
            SlotKind::Optional => "optional",
            SlotKind::AutoInstantiate => "auto-instantiate",
        };
        f.write_str(label)
    }
}

/// A declared slot on a host type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    /// The member this slot populates
    pub member: MemberId,
    /// Exact type or base type accepted by the slot
    pub declared_type: TypeTag,
    /// Binding strategy
    pub kind: SlotKind,
    /// Node name to search for. Empty for auto-instantiated slots.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search_key: String,
}

impl SlotDescriptor {
    pub fn new(
        member: impl Into<MemberId>,
        declared_type: impl Into<TypeTag>,
        kind: SlotKind,
        search_key: impl Into<String>,
    ) -> Self {
        Self {
            member: member.into(),
            declared_type: declared_type.into(),
            kind,
            search_key: search_key.into(),
        }
    }

    /// A slot that must be bound to a node named `search_key`
    pub fn required(
        member: impl Into<MemberId>,
        search_key: impl Into<String>,
        declared_type: impl Into<TypeTag>,
    ) -> Self {
        Self::new(member, declared_type, SlotKind::Required, search_key)
    }

    /// A slot that is bound only if a node named `search_key` exists
    pub fn optional(
        member: impl Into<MemberId>,
        search_key: impl Into<String>,
        declared_type: impl Into<TypeTag>,
    ) -> Self {
        Self::new(member, declared_type, SlotKind::Optional, search_key)
    }

    /// A slot populated with a new default instance attached under the host
    pub fn auto_instantiate(member: impl Into<MemberId>, declared_type: impl Into<TypeTag>) -> Self {
        Self::new(member, declared_type, SlotKind::AutoInstantiate, String::new())
    }

    /// The node name this slot resolves against: the search key, or the
    /// member name for auto-instantiated slots.
    pub fn lookup_name(&self) -> &str {
        match self.kind {
            SlotKind::AutoInstantiate => self.member.as_str(),
            SlotKind::Required | SlotKind::Optional => &self.search_key,
        }
    }

    /// Check the descriptor's structural invariants
    pub fn validate(&self) -> BindResult<()> {
        if self.member.as_str().trim().is_empty() {
            return Err(BindError::InvalidSlot {
                member: self.member.clone(),
                reason: "member identity must not be empty".into(),
            });
        }
        if self.declared_type.as_str().trim().is_empty() {
            return Err(BindError::InvalidSlot {
                member: self.member.clone(),
                reason: "declared type must not be empty".into(),
            });
        }
        match self.kind {
            SlotKind::Required | SlotKind::Optional if self.search_key.trim().is_empty() => {
                Err(BindError::InvalidSlot {
                    member: self.member.clone(),
                    reason: format!("{} slot needs a non-empty search key", self.kind),
                })
            }
            SlotKind::AutoInstantiate if !self.search_key.is_empty() => {
                Err(BindError::InvalidSlot {
                    member: self.member.clone(),
                    reason: "auto-instantiated slots are named after their member, not a search key"
                        .into(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_name() {
        let required = SlotDescriptor::required("cannon", "Cannon", "Turret");
        assert_eq!(required.lookup_name(), "Cannon");

        let auto = SlotDescriptor::auto_instantiate("timer", "Timer");
        assert_eq!(auto.lookup_name(), "timer");
        assert!(auto.search_key.is_empty());
    }

    #[test]
    fn test_validate_empty_search_key() {
        let slot = SlotDescriptor::required("cannon", "", "Turret");
        assert!(matches!(
            slot.validate(),
            Err(BindError::InvalidSlot { .. })
        ));

        let slot = SlotDescriptor::optional("radar", "  ", "Radar");
        assert!(slot.validate().is_err());
    }

    #[test]
    fn test_validate_auto_with_search_key() {
        let slot = SlotDescriptor::new("timer", "Timer", SlotKind::AutoInstantiate, "Clock");
        assert!(slot.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(SlotDescriptor::required("cannon", "Cannon", "Turret")
            .validate()
            .is_ok());
        assert!(SlotDescriptor::auto_instantiate("timer", "Timer")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&SlotKind::AutoInstantiate).unwrap();
        assert_eq!(json, "\"auto_instantiate\"");
    }
}
