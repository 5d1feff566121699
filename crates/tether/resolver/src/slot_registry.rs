//! Slot registry: stores the slot declarations of each host type
//!
//! Declarations are immutable once registered. Enumeration returns slots in
//! declaration order, and an empty slice for a type that declared nothing.

use std::collections::{HashMap, HashSet};
use tether_types::{BindError, BindResult, MemberId, SlotDescriptor, TypeTag};

/// Static slot declaration for a host type.
///
/// ```rust
/// use tether_resolver::{SlotDeclaration, SlotRegistry, SlotSetBuilder};
/// use tether_types::TypeTag;
///
/// struct Tank;
///
/// impl SlotDeclaration for Tank {
///     fn host_type() -> TypeTag {
///         TypeTag::new("Tank")
///     }
///
///     fn declare_slots(slots: SlotSetBuilder) -> SlotSetBuilder {
///         slots
///             .required("cannon", "Cannon", "Turret")
///             .optional("radar", "Radar", "Radar")
///             .auto_instantiate("reload_timer", "Timer")
///     }
/// }
///
/// let mut registry = SlotRegistry::new();
/// registry.register::<Tank>().unwrap();
/// assert_eq!(registry.enumerate_slots(&TypeTag::new("Tank")).len(), 3);
/// ```
pub trait SlotDeclaration {
    fn host_type() -> TypeTag;

    fn declare_slots(slots: SlotSetBuilder) -> SlotSetBuilder;
}

/// Builder collecting slots in declaration order
#[derive(Clone, Debug, Default)]
pub struct SlotSetBuilder {
    slots: Vec<SlotDescriptor>,
}

impl SlotSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(
        self,
        member: impl Into<MemberId>,
        search_key: impl Into<String>,
        declared_type: impl Into<TypeTag>,
    ) -> Self {
        self.slot(SlotDescriptor::required(member, search_key, declared_type))
    }

    pub fn optional(
        self,
        member: impl Into<MemberId>,
        search_key: impl Into<String>,
        declared_type: impl Into<TypeTag>,
    ) -> Self {
        self.slot(SlotDescriptor::optional(member, search_key, declared_type))
    }

    pub fn auto_instantiate(
        self,
        member: impl Into<MemberId>,
        declared_type: impl Into<TypeTag>,
    ) -> Self {
        self.slot(SlotDescriptor::auto_instantiate(member, declared_type))
    }

    pub fn slot(mut self, slot: SlotDescriptor) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn build(self) -> Vec<SlotDescriptor> {
        self.slots
    }
}

/// Registry of slot declarations, keyed by host type
#[derive(Clone, Debug)]
pub struct SlotRegistry {
    declarations: HashMap<TypeTag, Vec<SlotDescriptor>>,
}

impl SlotRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            declarations: HashMap::new(),
        }
    }

    /// Declare the slots of a host type
    ///
    /// Validates every slot before storing. A host type can only be
    /// declared once.
    pub fn declare(&mut self, host_type: TypeTag, slots: Vec<SlotDescriptor>) -> BindResult<()> {
        if self.declarations.contains_key(&host_type) {
            return Err(BindError::DuplicateHostType(host_type));
        }

        let mut members = HashSet::new();
        for slot in &slots {
            slot.validate()?;
            if !members.insert(&slot.member) {
                return Err(BindError::DuplicateMember {
                    host_type,
                    member: slot.member.clone(),
                });
            }
        }

        tracing::info!(host_type = %host_type, slots = slots.len(), "Host slots declared");
        self.declarations.insert(host_type, slots);
        Ok(())
    }

    /// Declare the slots of a host type through its [`SlotDeclaration`]
    pub fn register<T: SlotDeclaration>(&mut self) -> BindResult<()> {
        let slots = T::declare_slots(SlotSetBuilder::new()).build();
        self.declare(T::host_type(), slots)
    }

    /// Declared slots of `host_type`, in declaration order
    pub fn enumerate_slots(&self, host_type: &TypeTag) -> &[SlotDescriptor] {
        self.declarations
            .get(host_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if a host type has a declaration (possibly empty)
    pub fn contains(&self, host_type: &TypeTag) -> bool {
        self.declarations.contains_key(host_type)
    }

    /// Declared host types, sorted
    pub fn host_types(&self) -> Vec<&TypeTag> {
        let mut types: Vec<&TypeTag> = self.declarations.keys().collect();
        types.sort();
        types
    }

    /// Total number of declared host types
    pub fn count(&self) -> usize {
        self.declarations.len()
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_types::SlotKind;

    struct Tank;

    impl SlotDeclaration for Tank {
        fn host_type() -> TypeTag {
            TypeTag::new("Tank")
        }

        fn declare_slots(slots: SlotSetBuilder) -> SlotSetBuilder {
            slots
                .required("cannon", "Cannon", "Turret")
                .optional("radar", "Radar", "Radar")
                .auto_instantiate("reload_timer", "Timer")
        }
    }

    #[test]
    fn test_register_and_enumerate() {
        let mut registry = SlotRegistry::new();
        registry.register::<Tank>().unwrap();

        let slots = registry.enumerate_slots(&TypeTag::new("Tank"));
        let members: Vec<&str> = slots.iter().map(|s| s.member.as_str()).collect();
        assert_eq!(members, vec!["cannon", "radar", "reload_timer"]);
        assert_eq!(slots[2].kind, SlotKind::AutoInstantiate);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_enumeration_is_stable() {
        let mut registry = SlotRegistry::new();
        registry.register::<Tank>().unwrap();
        let first = registry.enumerate_slots(&TypeTag::new("Tank")).to_vec();
        let second = registry.enumerate_slots(&TypeTag::new("Tank")).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_host_is_empty() {
        let registry = SlotRegistry::new();
        assert!(registry.enumerate_slots(&TypeTag::new("Nothing")).is_empty());
        assert!(!registry.contains(&TypeTag::new("Nothing")));
    }

    #[test]
    fn test_empty_declaration() {
        let mut registry = SlotRegistry::new();
        registry.declare(TypeTag::new("Idle"), Vec::new()).unwrap();
        assert!(registry.contains(&TypeTag::new("Idle")));
        assert!(registry.enumerate_slots(&TypeTag::new("Idle")).is_empty());
    }

    #[test]
    fn test_declarations_are_immutable() {
        let mut registry = SlotRegistry::new();
        registry.register::<Tank>().unwrap();
        let result = registry.declare(TypeTag::new("Tank"), Vec::new());
        assert!(matches!(result, Err(BindError::DuplicateHostType(_))));
        assert_eq!(registry.enumerate_slots(&TypeTag::new("Tank")).len(), 3);
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let mut registry = SlotRegistry::new();
        let slots = SlotSetBuilder::new()
            .required("cannon", "Cannon", "Turret")
            .optional("cannon", "Backup", "Turret")
            .build();
        let result = registry.declare(TypeTag::new("Tank"), slots);
        assert!(matches!(result, Err(BindError::DuplicateMember { .. })));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_invalid_slot_rejected() {
        let mut registry = SlotRegistry::new();
        let slots = SlotSetBuilder::new().required("cannon", "", "Turret").build();
        let result = registry.declare(TypeTag::new("Tank"), slots);
        assert!(matches!(result, Err(BindError::InvalidSlot { .. })));
    }

    #[test]
    fn test_host_types_sorted() {
        let mut registry = SlotRegistry::new();
        registry.declare(TypeTag::new("Zeta"), Vec::new()).unwrap();
        registry.declare(TypeTag::new("Alpha"), Vec::new()).unwrap();
        let types: Vec<&str> = registry.host_types().iter().map(|t| t.as_str()).collect();
        assert_eq!(types, vec!["Alpha", "Zeta"]);
    }
}
