//! Scene manifests: types, a node tree and host slot declarations
//!
//! ```yaml
//! types:
//!   - name: Node
//!   - name: Turret
//!     base: Node
//!   - name: Timer
//!     base: Node
//!     constructor: default
//! tree:
//!   name: Tank
//!   type: Node
//!   children:
//!     - name: Cannon
//!       type: Turret
//! hosts:
//!   Node:
//!     - member: cannon
//!       kind: required
//!       key: cannon
//!       type: Turret
//! resolver:
//!   auto_instantiate: reuse_live
//! ```

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tether_resolver::{DynamicHost, ResolverConfig, SlotRegistry};
use tether_tree::{SceneTree, TypeCatalog, TypeDescriptor};
use tether_types::{NodeHandle, SlotDescriptor, SlotKind, TypeTag};

/// Whether a declared type is a tree node or a plain value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Node,
    Value,
}

/// Which constructors a declared type offers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorSpec {
    /// Has a zero-argument constructor
    Default,
    /// Only constructors that take arguments
    #[default]
    Parameterized,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub constructor: ConstructorSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "default_alive")]
    pub alive: bool,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_alive() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSpec {
    pub member: String,
    pub kind: SlotKind,
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Assignments to this member fail
    #[serde(default)]
    pub read_only: bool,
}

/// A complete scene description
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Types in registration order; bases come before derived types
    #[serde(default)]
    pub types: Vec<TypeSpec>,
    pub tree: NodeSpec,
    /// Slot declarations per host type, in declaration order
    #[serde(default)]
    pub hosts: BTreeMap<String, Vec<SlotSpec>>,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Manifest {
    /// Load a manifest; `.json` files are read as JSON, anything else as YAML
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let manifest = if is_json {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        tracing::debug!(path = %path.display(), "Manifest loaded");
        Ok(manifest)
    }

    pub fn catalog(&self) -> CliResult<TypeCatalog> {
        let mut catalog = TypeCatalog::new();
        for spec in &self.types {
            let mut descriptor = match spec.kind {
                TypeKind::Node => TypeDescriptor::node(spec.name.as_str()),
                TypeKind::Value => TypeDescriptor::value(spec.name.as_str()),
            };
            if let Some(base) = &spec.base {
                descriptor = descriptor.extends(base.as_str());
            }
            if spec.constructor == ConstructorSpec::Default {
                descriptor = descriptor.default_constructible();
            }
            catalog.register(descriptor)?;
        }
        Ok(catalog)
    }

    /// Build the scene tree. Nodes marked dead are queued for destruction
    /// after the whole tree exists.
    pub fn build_tree(&self) -> CliResult<SceneTree> {
        if !self.tree.alive {
            return Err(CliError::Manifest("the root node cannot be dead".into()));
        }
        let mut tree = SceneTree::new(
            self.catalog()?,
            self.tree.name.as_str(),
            self.tree.type_name.as_str(),
        )?;

        let mut dead = Vec::new();
        let root = tree.root();
        spawn_children(&mut tree, root, &self.tree.children, &mut dead)?;
        for node in dead {
            if tree.is_alive(node) {
                tree.queue_free(node)?;
            }
        }
        Ok(tree)
    }

    pub fn registry(&self) -> CliResult<SlotRegistry> {
        let mut registry = SlotRegistry::new();
        for (host_type, slots) in &self.hosts {
            let slots = slots
                .iter()
                .map(|s| {
                    SlotDescriptor::new(s.member.as_str(), s.type_name.as_str(), s.kind, s.key.as_str())
                })
                .collect();
            registry.declare(TypeTag::new(host_type.as_str()), slots)?;
        }
        Ok(registry)
    }

    /// A host for `node`, with this manifest's read-only members applied
    pub fn host_for(&self, node: NodeHandle, host_type: &TypeTag) -> DynamicHost {
        let read_only = self
            .hosts
            .get(host_type.as_str())
            .into_iter()
            .flatten()
            .filter(|s| s.read_only);

        read_only.fold(DynamicHost::new(node, host_type.clone()), |host, slot| {
            host.with_read_only(slot.member.as_str())
        })
    }
}

fn spawn_children(
    tree: &mut SceneTree,
    parent: NodeHandle,
    specs: &[NodeSpec],
    dead: &mut Vec<NodeHandle>,
) -> CliResult<()> {
    for spec in specs {
        let node = tree.spawn_child(parent, spec.name.as_str(), spec.type_name.as_str())?;
        if !spec.alive {
            dead.push(node);
        }
        spawn_children(tree, node, &spec.children, dead)?;
    }
    Ok(())
}
