//! Scene tree: an arena of named, typed nodes with generational handles
//!
//! The tree owns every node. Children are ordered by insertion, and that
//! order is the traversal order used by all searches.
//!
//! Destruction is deferred: [`SceneTree::queue_free`] marks a node and its
//! subtree dead, and [`SceneTree::flush_freed`] later releases the arena
//! slots. Between the two, handles still resolve but the nodes are not
//! alive.

use crate::catalog::{Instance, TypeCapability, TypeCatalog};
use crate::error::{TreeError, TreeResult};
use tether_types::{NodeHandle, TypeTag};

// ── Node Storage ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeData {
    name: String,
    type_tag: TypeTag,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    alive: bool,
}

#[derive(Clone, Debug)]
struct Entry {
    generation: u32,
    node: Option<NodeData>,
}

// ── Scene Tree ───────────────────────────────────────────────────────

/// An arena-backed tree of nodes
#[derive(Clone, Debug)]
pub struct SceneTree {
    catalog: TypeCatalog,
    entries: Vec<Entry>,
    free: Vec<u32>,
    root: NodeHandle,
}

impl SceneTree {
    /// Create a tree with a single root node
    pub fn new(
        catalog: TypeCatalog,
        root_name: impl Into<String>,
        root_type: impl Into<TypeTag>,
    ) -> TreeResult<Self> {
        let mut tree = Self {
            catalog,
            entries: Vec::new(),
            free: Vec::new(),
            root: NodeHandle::new(0, 0),
        };
        tree.root = tree.create_node(root_name, root_type)?;
        Ok(tree)
    }

    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Number of nodes currently allocated, dead or alive
    pub fn node_count(&self) -> usize {
        self.entries.iter().filter(|e| e.node.is_some()).count()
    }

    // ── Observers ────────────────────────────────────────────────────

    fn node(&self, handle: NodeHandle) -> Option<&NodeData> {
        self.entries
            .get(handle.index as usize)
            .filter(|e| e.generation == handle.generation)
            .and_then(|e| e.node.as_ref())
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeData> {
        self.entries
            .get_mut(handle.index as usize)
            .filter(|e| e.generation == handle.generation)
            .and_then(|e| e.node.as_mut())
    }

    fn require(&self, handle: NodeHandle) -> TreeResult<&NodeData> {
        self.node(handle).ok_or(TreeError::StaleHandle(handle))
    }

    /// True if the handle still names an allocated node (dead or alive)
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.node(handle).is_some()
    }

    pub fn name(&self, handle: NodeHandle) -> Option<&str> {
        self.node(handle).map(|n| n.name.as_str())
    }

    pub fn type_of(&self, handle: NodeHandle) -> Option<&TypeTag> {
        self.node(handle).map(|n| &n.type_tag)
    }

    /// Children in insertion order. Empty for a stale handle.
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.node(handle)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.node(handle).and_then(|n| n.parent)
    }

    /// False for stale handles and for nodes queued for destruction
    pub fn is_alive(&self, handle: NodeHandle) -> bool {
        self.node(handle).map(|n| n.alive).unwrap_or(false)
    }

    /// True if the node's type is `expected` or a subtype of it
    pub fn is_instance_of(&self, handle: NodeHandle, expected: &TypeTag) -> bool {
        self.type_of(handle)
            .map(|found| self.catalog.is_assignable(found, expected))
            .unwrap_or(false)
    }

    /// True if `ancestor` is a strict ancestor of `node`
    pub fn is_ancestor_of(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.parent(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.parent(handle);
        }
        false
    }

    /// Slash-separated path from the root, e.g. `/Tank/Turret/Cannon`
    pub fn path(&self, handle: NodeHandle) -> String {
        if !self.contains(handle) {
            return format!("<freed {}>", handle);
        }
        let mut names = Vec::new();
        let mut current = Some(handle);
        while let Some(h) = current {
            match self.node(h) {
                Some(node) => {
                    names.push(node.name.as_str());
                    current = node.parent;
                }
                None => break,
            }
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    // ── Construction ─────────────────────────────────────────────────

    fn allocate(&mut self, data: NodeData) -> TreeResult<NodeHandle> {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.node = Some(data);
            Ok(NodeHandle::new(index, entry.generation))
        } else {
            let index = next_index(self.entries.len())?;
            self.entries.push(Entry {
                generation: 0,
                node: Some(data),
            });
            Ok(NodeHandle::new(index, 0))
        }
    }

    /// Create a detached node of a registered node type
    pub fn create_node(
        &mut self,
        name: impl Into<String>,
        type_tag: impl Into<TypeTag>,
    ) -> TreeResult<NodeHandle> {
        let type_tag = type_tag.into();
        match self.catalog.get(&type_tag).map(|d| d.capability) {
            None => return Err(TreeError::UnknownType(type_tag)),
            Some(TypeCapability::Value) => return Err(TreeError::NotANodeType(type_tag)),
            Some(TypeCapability::Node) => {}
        }
        self.allocate(NodeData {
            name: name.into(),
            type_tag,
            parent: None,
            children: Vec::new(),
            alive: true,
        })
    }

    /// Append a detached node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> TreeResult<()> {
        if !self.require(parent)?.alive {
            return Err(TreeError::DeadNode(parent));
        }
        if self.require(child)?.parent.is_some() {
            return Err(TreeError::AlreadyParented(child));
        }
        if child == self.root || child == parent || self.is_ancestor_of(child, parent) {
            return Err(TreeError::CycleDetected { parent, child });
        }

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Create a node and append it under `parent`
    pub fn spawn_child(
        &mut self,
        parent: NodeHandle,
        name: impl Into<String>,
        type_tag: impl Into<TypeTag>,
    ) -> TreeResult<NodeHandle> {
        let child = self.create_node(name, type_tag)?;
        if let Err(err) = self.add_child(parent, child) {
            self.release(child);
            return Err(err);
        }
        Ok(child)
    }

    /// Attach a constructed instance as the last child of `parent`
    pub fn attach_instance(
        &mut self,
        parent: NodeHandle,
        instance: Instance,
        name: impl Into<String>,
    ) -> TreeResult<NodeHandle> {
        if instance.capability != TypeCapability::Node {
            return Err(TreeError::NotANodeType(instance.type_tag));
        }
        self.spawn_child(parent, name, instance.type_tag)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: impl Into<String>) -> TreeResult<()> {
        let node = self
            .node_mut(handle)
            .ok_or(TreeError::StaleHandle(handle))?;
        node.name = name.into();
        Ok(())
    }

    // ── Detachment & Destruction ─────────────────────────────────────

    /// Remove `child` from `parent` without freeing it
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> TreeResult<()> {
        if self.require(child)?.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        Ok(())
    }

    /// Remove a node from whatever parent it has
    pub fn detach(&mut self, handle: NodeHandle) -> TreeResult<()> {
        if handle == self.root {
            return Err(TreeError::RootNode);
        }
        match self.require(handle)?.parent {
            Some(parent) => self.remove_child(parent, handle),
            None => Ok(()),
        }
    }

    /// Mark a node and its whole subtree as dead. The nodes stay reachable
    /// through their handles until [`SceneTree::flush_freed`].
    pub fn queue_free(&mut self, handle: NodeHandle) -> TreeResult<()> {
        if handle == self.root {
            return Err(TreeError::RootNode);
        }
        self.require(handle)?;
        for node in self.subtree(handle) {
            if let Some(data) = self.node_mut(node) {
                data.alive = false;
            }
        }
        tracing::trace!(node = %handle, "Node queued for destruction");
        Ok(())
    }

    /// Release every dead node. Returns how many were freed.
    pub fn flush_freed(&mut self) -> usize {
        let dead: Vec<NodeHandle> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match &entry.node {
                Some(node) if !node.alive => Some(NodeHandle::new(index as u32, entry.generation)),
                _ => None,
            })
            .collect();

        for &handle in &dead {
            if let Some(parent) = self.parent(handle) {
                if let Some(node) = self.node_mut(parent) {
                    node.children.retain(|c| *c != handle);
                }
            }
        }
        for &handle in &dead {
            self.release(handle);
        }
        dead.len()
    }

    /// Detach and free a subtree immediately
    pub fn free_now(&mut self, handle: NodeHandle) -> TreeResult<()> {
        self.detach(handle)?;
        for node in self.subtree(handle) {
            self.release(node);
        }
        Ok(())
    }

    fn release(&mut self, handle: NodeHandle) {
        if let Some(entry) = self.entries.get_mut(handle.index as usize) {
            if entry.generation == handle.generation && entry.node.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(handle.index);
            }
        }
    }

    /// `handle` and all of its descendants, dead or alive, in pre-order
    pub(crate) fn subtree(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }
}

/// Index for a fresh arena slot appended after `len` existing ones
fn next_index(len: usize) -> TreeResult<u32> {
    u32::try_from(len).map_err(|_| TreeError::ArenaFull)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeDescriptor;

    fn make_catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog
            .register(TypeDescriptor::node("Node").default_constructible())
            .unwrap();
        catalog
            .register(TypeDescriptor::node("Turret").extends("Node"))
            .unwrap();
        catalog
            .register(TypeDescriptor::value("Stats").default_constructible())
            .unwrap();
        catalog
    }

    fn make_tree() -> (SceneTree, NodeHandle, NodeHandle) {
        let mut tree = SceneTree::new(make_catalog(), "Tank", "Node").unwrap();
        let root = tree.root();
        let hull = tree.spawn_child(root, "Hull", "Node").unwrap();
        let cannon = tree.spawn_child(hull, "Cannon", "Turret").unwrap();
        (tree, hull, cannon)
    }

    #[test]
    fn test_create_tree() {
        let (tree, hull, cannon) = make_tree();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.children(tree.root()), &[hull]);
        assert_eq!(tree.parent(cannon), Some(hull));
        assert_eq!(tree.name(cannon), Some("Cannon"));
        assert_eq!(tree.type_of(cannon), Some(&TypeTag::new("Turret")));
        assert_eq!(tree.path(cannon), "/Tank/Hull/Cannon");
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = SceneTree::new(make_catalog(), "Root", "Node").unwrap();
        let root = tree.root();
        let names = ["c", "a", "b"];
        for name in names {
            tree.spawn_child(root, name, "Node").unwrap();
        }
        let order: Vec<&str> = tree
            .children(root)
            .iter()
            .filter_map(|h| tree.name(*h))
            .collect();
        assert_eq!(order, names);
    }

    #[test]
    fn test_is_instance_of() {
        let (tree, hull, cannon) = make_tree();
        assert!(tree.is_instance_of(cannon, &TypeTag::new("Node")));
        assert!(tree.is_instance_of(cannon, &TypeTag::new("Turret")));
        assert!(!tree.is_instance_of(hull, &TypeTag::new("Turret")));
    }

    #[test]
    fn test_value_type_not_attachable() {
        let mut tree = SceneTree::new(make_catalog(), "Root", "Node").unwrap();
        let root = tree.root();
        let result = tree.spawn_child(root, "Stats", "Stats");
        assert!(matches!(result, Err(TreeError::NotANodeType(_))));

        let result = tree.spawn_child(root, "Ghost", "Ghost");
        assert!(matches!(result, Err(TreeError::UnknownType(_))));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_queue_free_marks_subtree_dead() {
        let (mut tree, hull, cannon) = make_tree();
        tree.queue_free(hull).unwrap();

        assert!(tree.contains(hull));
        assert!(tree.contains(cannon));
        assert!(!tree.is_alive(hull));
        assert!(!tree.is_alive(cannon));
        assert!(tree.is_alive(tree.root()));
    }

    #[test]
    fn test_flush_invalidates_handles() {
        let (mut tree, hull, cannon) = make_tree();
        tree.queue_free(hull).unwrap();
        assert_eq!(tree.flush_freed(), 2);

        assert!(!tree.contains(hull));
        assert!(!tree.contains(cannon));
        assert!(tree.children(tree.root()).is_empty());

        // The freed slot is reused with a new generation
        let root = tree.root();
        let fresh = tree.spawn_child(root, "Hull", "Node").unwrap();
        assert_eq!(fresh.generation, 1);
        assert!(!tree.contains(hull));
        assert!(!tree.contains(cannon));
        assert!(tree.is_alive(fresh));
    }

    #[test]
    fn test_root_is_protected() {
        let (mut tree, _, _) = make_tree();
        let root = tree.root();
        assert_eq!(tree.queue_free(root), Err(TreeError::RootNode));
        assert_eq!(tree.detach(root), Err(TreeError::RootNode));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let (mut tree, hull, cannon) = make_tree();
        tree.detach(hull).unwrap();
        let result = tree.add_child(cannon, hull);
        assert!(matches!(result, Err(TreeError::CycleDetected { .. })));
    }

    #[test]
    fn test_add_child_rejects_parented() {
        let (mut tree, _hull, cannon) = make_tree();
        let root = tree.root();
        let result = tree.add_child(root, cannon);
        assert_eq!(result, Err(TreeError::AlreadyParented(cannon)));
    }

    #[test]
    fn test_add_child_to_dead_parent() {
        let (mut tree, hull, _) = make_tree();
        tree.queue_free(hull).unwrap();
        let result = tree.spawn_child(hull, "Late", "Node");
        assert_eq!(result, Err(TreeError::DeadNode(hull)));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_free_now() {
        let (mut tree, hull, cannon) = make_tree();
        tree.free_now(hull).unwrap();
        assert!(!tree.contains(hull));
        assert!(!tree.contains(cannon));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_remove_child_not_a_child() {
        let (mut tree, _hull, cannon) = make_tree();
        let root = tree.root();
        let result = tree.remove_child(root, cannon);
        assert!(matches!(result, Err(TreeError::NotAChild { .. })));
    }

    #[test]
    fn test_stale_path() {
        let (mut tree, hull, _) = make_tree();
        tree.free_now(hull).unwrap();
        assert!(tree.path(hull).starts_with("<freed"));
    }

    #[test]
    fn test_next_index_bounds() {
        assert_eq!(next_index(3), Ok(3));
        assert_eq!(next_index(u32::MAX as usize), Ok(u32::MAX));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_next_index_arena_full() {
        assert_eq!(next_index(u32::MAX as usize + 1), Err(TreeError::ArenaFull));
    }
}
