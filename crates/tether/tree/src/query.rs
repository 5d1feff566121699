//! Subtree queries and structural helpers
//!
//! All searches share the same rules:
//! - depth-first, pre-order, children in insertion order;
//! - the starting node itself is never a result;
//! - dead nodes are absent, and so is everything below them.

use crate::error::{TreeError, TreeResult};
use crate::tree::SceneTree;
use tether_types::{NodeHandle, TypeTag};

/// Case-insensitive node name comparison.
///
/// Tree paths are case-sensitive, slot names are not.
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Pre-order iterator over the live descendants of a node
pub struct Descendants<'a> {
    tree: &'a SceneTree,
    stack: Vec<NodeHandle>,
}

impl<'a> Descendants<'a> {
    fn new(tree: &'a SceneTree, root: NodeHandle) -> Self {
        let stack = if tree.is_alive(root) {
            tree.children(root).iter().rev().copied().collect()
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.stack.pop() {
            if !self.tree.is_alive(handle) {
                continue;
            }
            self.stack
                .extend(self.tree.children(handle).iter().rev().copied());
            return Some(handle);
        }
        None
    }
}

impl SceneTree {
    /// Live descendants of `root` in pre-order
    pub fn descendants(&self, root: NodeHandle) -> Descendants<'_> {
        Descendants::new(self, root)
    }

    /// Live direct children of `parent`
    pub fn live_children(&self, parent: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        self.children(parent)
            .iter()
            .copied()
            .filter(move |c| self.is_alive(*c))
    }

    /// First live descendant whose name matches `name`, ignoring case
    pub fn find_child_ignore_case(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.descendants(root)
            .find(|h| self.name(*h).is_some_and(|n| names_match(n, name)))
    }

    /// First live direct child of type `type_tag` (or a subtype)
    pub fn find_first_direct_child(
        &self,
        parent: NodeHandle,
        type_tag: &TypeTag,
    ) -> Option<NodeHandle> {
        self.live_children(parent)
            .find(|c| self.is_instance_of(*c, type_tag))
    }

    /// First live direct child of type `type_tag` whose name matches,
    /// ignoring case
    pub fn find_first_direct_child_named(
        &self,
        parent: NodeHandle,
        type_tag: &TypeTag,
        name: &str,
    ) -> Option<NodeHandle> {
        self.live_children(parent).find(|c| {
            self.is_instance_of(*c, type_tag)
                && self.name(*c).is_some_and(|n| names_match(n, name))
        })
    }

    /// All live direct children of type `type_tag`
    pub fn find_direct_children(&self, parent: NodeHandle, type_tag: &TypeTag) -> Vec<NodeHandle> {
        self.live_children(parent)
            .filter(|c| self.is_instance_of(*c, type_tag))
            .collect()
    }

    /// Live direct children of type `type_tag` that are not also of type
    /// `excluded`
    pub fn find_direct_children_excluding(
        &self,
        parent: NodeHandle,
        type_tag: &TypeTag,
        excluded: &TypeTag,
    ) -> Vec<NodeHandle> {
        self.live_children(parent)
            .filter(|c| self.is_instance_of(*c, type_tag) && !self.is_instance_of(*c, excluded))
            .collect()
    }

    /// First live descendant of type `type_tag`
    pub fn find_first_child_recursive(
        &self,
        root: NodeHandle,
        type_tag: &TypeTag,
    ) -> Option<NodeHandle> {
        self.descendants(root)
            .find(|h| self.is_instance_of(*h, type_tag))
    }

    /// First live descendant of type `type_tag` whose name matches,
    /// ignoring case
    pub fn find_first_child_recursive_named(
        &self,
        root: NodeHandle,
        type_tag: &TypeTag,
        name: &str,
    ) -> Option<NodeHandle> {
        self.descendants(root).find(|h| {
            self.is_instance_of(*h, type_tag)
                && self.name(*h).is_some_and(|n| names_match(n, name))
        })
    }

    /// Every live descendant of type `type_tag`, in pre-order
    pub fn find_all_children_recursive(
        &self,
        root: NodeHandle,
        type_tag: &TypeTag,
    ) -> Vec<NodeHandle> {
        self.descendants(root)
            .filter(|h| self.is_instance_of(*h, type_tag))
            .collect()
    }

    /// Nearest live ancestor of type `type_tag`
    pub fn find_ancestor(&self, node: NodeHandle, type_tag: &TypeTag) -> Option<NodeHandle> {
        if !self.is_alive(node) {
            return None;
        }
        let mut current = self.parent(node);
        while let Some(handle) = current {
            if !self.is_alive(handle) {
                return None;
            }
            if self.is_instance_of(handle, type_tag) {
                return Some(handle);
            }
            current = self.parent(handle);
        }
        None
    }

    /// Move `child` (with its subtree) to the end of `new_parent`'s children
    pub fn adopt_node(&mut self, new_parent: NodeHandle, child: NodeHandle) -> TreeResult<()> {
        if !self.contains(child) {
            return Err(TreeError::StaleHandle(child));
        }
        if !self.contains(new_parent) {
            return Err(TreeError::StaleHandle(new_parent));
        }
        if !self.is_alive(new_parent) {
            return Err(TreeError::DeadNode(new_parent));
        }
        if child == self.root() {
            return Err(TreeError::RootNode);
        }
        if child == new_parent || self.is_ancestor_of(child, new_parent) {
            return Err(TreeError::CycleDetected {
                parent: new_parent,
                child,
            });
        }
        self.detach(child)?;
        self.add_child(new_parent, child)
    }

    /// Detach (without freeing) every child of `parent`. Returns the
    /// detached handles in their former order.
    pub fn detach_all_children(&mut self, parent: NodeHandle) -> TreeResult<Vec<NodeHandle>> {
        if !self.contains(parent) {
            return Err(TreeError::StaleHandle(parent));
        }
        let children = self.children(parent).to_vec();
        for child in &children {
            self.remove_child(parent, *child)?;
        }
        Ok(children)
    }

    /// Queue every child of `parent` for destruction
    pub fn delete_all_children(&mut self, parent: NodeHandle) -> TreeResult<()> {
        if !self.contains(parent) {
            return Err(TreeError::StaleHandle(parent));
        }
        for child in self.children(parent).to_vec() {
            self.queue_free(child)?;
        }
        Ok(())
    }
}
