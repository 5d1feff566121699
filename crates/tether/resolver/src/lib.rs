//! Slot resolution for Tether scene trees
//!
//! A host declares named slots; when it enters the tree, the resolver binds
//! each slot to a node in the host's subtree, or constructs one, and then
//! decides whether the failures it collected are fatal.
//!
//! # Key Principle
//!
//! **Every slot is processed, and only the aggregate can fail.**
//!
//! Per-slot problems are recorded in a [`ResolutionReport`](tether_types::ResolutionReport).
//! At design time they are logged and the report is returned; at run time
//! they become a single `AggregateBindingFailure` naming every failed slot.
//!
//! # Architecture
//!
//! - [`SlotRegistry`]: Stores the slot declarations of each host type
//! - [`Bindable`]: Capability of a host whose slots can be set
//! - [`match_slot`]: Search-key matching over a subtree
//! - [`Resolver`]: Runs a pass and applies the failure policy
//!
//! # Example
//!
//! ```rust
//! use tether_resolver::{DynamicHost, Resolver, ResolverConfig, SlotRegistry, SlotSetBuilder};
//! use tether_tree::{SceneTree, TypeCatalog, TypeDescriptor};
//! use tether_types::{ExecutionMode, TypeTag};
//!
//! let catalog = TypeCatalog::new()
//!     .with(TypeDescriptor::node("Tank"))
//!     .and_then(|c| c.with(TypeDescriptor::node("Turret")))
//!     .and_then(|c| c.with(TypeDescriptor::node("Timer").default_constructible()))
//!     .unwrap();
//! let mut tree = SceneTree::new(catalog, "Tank", "Tank").unwrap();
//! let cannon = tree.spawn_child(tree.root(), "Cannon", "Turret").unwrap();
//!
//! let mut registry = SlotRegistry::new();
//! registry
//!     .declare(
//!         TypeTag::new("Tank"),
//!         SlotSetBuilder::new()
//!             .required("cannon", "cannon", "Turret")
//!             .auto_instantiate("reload_timer", "Timer")
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let resolver = Resolver::new(registry, ResolverConfig::default());
//! let mut host = DynamicHost::new(tree.root(), "Tank");
//! let report = resolver
//!     .resolve_host(&mut host, &mut tree, ExecutionMode::RunTime)
//!     .unwrap();
//!
//! assert!(!report.has_failures());
//! assert_eq!(host.get("cannon"), Some(cannon));
//! assert!(host.get("reload_timer").is_some());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod host;
pub mod matching;
pub mod resolver;
pub mod slot_registry;

// Re-export main types
pub use config::{AutoInstantiatePolicy, ResolverConfig};
pub use host::{Bindable, DynamicHost, SlotAssignError};
pub use matching::{match_slot, SlotMatch};
pub use resolver::Resolver;
pub use slot_registry::{SlotDeclaration, SlotRegistry, SlotSetBuilder};
