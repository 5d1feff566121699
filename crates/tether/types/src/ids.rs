//! Identifiers: node handles, type tags and member identities

use serde::{Deserialize, Serialize};

// ── Node Handle ──────────────────────────────────────────────────────

/// Generational reference to a node stored in a scene tree arena.
///
/// The `generation` is bumped every time an arena slot is freed, so a handle
/// kept across a free never aliases the node that later reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle {
    pub index: u32,
    pub generation: u32,
}

impl NodeHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// ── Type Tag ─────────────────────────────────────────────────────────

/// Name of a node or slot type
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(pub String);

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ── Member Identity ──────────────────────────────────────────────────

/// Identity of a slot member on a host (the field name)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MemberId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display() {
        let handle = NodeHandle::new(3, 1);
        assert_eq!(handle.to_string(), "#3v1");
    }

    #[test]
    fn test_handles_differ_by_generation() {
        assert_ne!(NodeHandle::new(0, 0), NodeHandle::new(0, 1));
    }

    #[test]
    fn test_type_tag_serializes_as_string() {
        let tag = TypeTag::new("Turret");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"Turret\"");
        assert_eq!(format!("{}", tag), "Turret");
    }

    #[test]
    fn test_member_id_from_str() {
        let member: MemberId = "cannon".into();
        assert_eq!(member.as_str(), "cannon");
    }
}
