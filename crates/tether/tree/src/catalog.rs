//! Type catalog: subtype relation and default construction
//!
//! Every type that appears in a tree or in a slot declaration is registered
//! here with an optional base type. Base types must be registered before the
//! types that extend them, which keeps the hierarchy acyclic.

use crate::error::{TreeError, TreeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tether_types::{AutoInstantiateFailure, TypeTag};

/// Whether instances of a type can live in the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCapability {
    /// Tree-attachable node type
    Node,
    /// Plain value type; cannot be attached
    Value,
}

/// A freshly constructed, not yet attached instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub type_tag: TypeTag,
    pub capability: TypeCapability,
}

/// Zero-argument initializer for a type
pub type Constructor = Arc<dyn Fn() -> Result<Instance, String> + Send + Sync>;

/// Registration entry for one type
#[derive(Clone)]
pub struct TypeDescriptor {
    pub tag: TypeTag,
    pub base: Option<TypeTag>,
    pub capability: TypeCapability,
    constructor: Option<Constructor>,
}

impl TypeDescriptor {
    /// A node type without a default constructor
    pub fn node(tag: impl Into<TypeTag>) -> Self {
        Self {
            tag: tag.into(),
            base: None,
            capability: TypeCapability::Node,
            constructor: None,
        }
    }

    /// A value type without a default constructor
    pub fn value(tag: impl Into<TypeTag>) -> Self {
        Self {
            tag: tag.into(),
            base: None,
            capability: TypeCapability::Value,
            constructor: None,
        }
    }

    pub fn extends(mut self, base: impl Into<TypeTag>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Give the type a zero-argument constructor producing an instance of
    /// itself
    pub fn default_constructible(mut self) -> Self {
        let instance = Instance {
            type_tag: self.tag.clone(),
            capability: self.capability,
        };
        self.constructor = Some(Arc::new(move || Ok(instance.clone())));
        self
    }

    /// Use a custom zero-argument constructor
    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<Instance, String> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructor.is_some()
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("tag", &self.tag)
            .field("base", &self.base)
            .field("capability", &self.capability)
            .field("default_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Registry of known types
#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    types: HashMap<TypeTag, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. Its base, if any, must already be registered.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> TreeResult<()> {
        if self.types.contains_key(&descriptor.tag) {
            return Err(TreeError::DuplicateType(descriptor.tag));
        }
        if let Some(base) = &descriptor.base {
            if !self.types.contains_key(base) {
                return Err(TreeError::UnknownType(base.clone()));
            }
        }
        tracing::debug!(type_tag = %descriptor.tag, base = ?descriptor.base, "Type registered");
        self.types.insert(descriptor.tag.clone(), descriptor);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, descriptor: TypeDescriptor) -> TreeResult<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn get(&self, tag: &TypeTag) -> Option<&TypeDescriptor> {
        self.types.get(tag)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.types.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn is_node_type(&self, tag: &TypeTag) -> bool {
        matches!(
            self.types.get(tag).map(|d| d.capability),
            Some(TypeCapability::Node)
        )
    }

    /// True if `found` is `expected` or derives from it
    pub fn is_assignable(&self, found: &TypeTag, expected: &TypeTag) -> bool {
        let mut current = Some(found);
        while let Some(tag) = current {
            if tag == expected {
                return true;
            }
            current = self.types.get(tag).and_then(|d| d.base.as_ref());
        }
        false
    }

    /// Run the zero-argument constructor of `tag`
    pub fn instantiate(&self, tag: &TypeTag) -> Result<Instance, AutoInstantiateFailure> {
        let constructor = self
            .types
            .get(tag)
            .and_then(|d| d.constructor.as_ref())
            .ok_or(AutoInstantiateFailure::NoDefaultConstructor)?;
        constructor().map_err(AutoInstantiateFailure::ConstructorFailed)
    }
}
