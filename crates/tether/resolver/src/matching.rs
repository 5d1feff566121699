//! Search-key matching over a subtree

use tether_tree::{names_match, SceneTree};
use tether_types::{NodeHandle, SlotDescriptor, TypeTag};

/// Result of searching a subtree for a slot's node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotMatch {
    /// First live node with a matching name and compatible type
    Found(NodeHandle),
    /// No candidate, but a live node with the same name has the wrong type
    TypeMismatch { node: NodeHandle, found: TypeTag },
    /// No live node with that name at all
    NotFound,
}

/// Find the node for `slot` among the live descendants of `root`.
///
/// Traversal is pre-order in child insertion order; the first candidate
/// wins. When there is no candidate, the first same-named node decides
/// between a type mismatch and absence.
pub fn match_slot(tree: &SceneTree, root: NodeHandle, slot: &SlotDescriptor) -> SlotMatch {
    let mut same_name: Option<(NodeHandle, &TypeTag)> = None;

    for node in tree.descendants(root) {
        let (Some(name), Some(type_tag)) = (tree.name(node), tree.type_of(node)) else {
            continue;
        };
        if !names_match(name, &slot.search_key) {
            continue;
        }
        if tree.catalog().is_assignable(type_tag, &slot.declared_type) {
            return SlotMatch::Found(node);
        }
        if same_name.is_none() {
            same_name = Some((node, type_tag));
        }
    }

    match same_name {
        Some((node, found)) => SlotMatch::TypeMismatch {
            node,
            found: found.clone(),
        },
        None => SlotMatch::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_tree::{TypeCatalog, TypeDescriptor};

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeDescriptor::node("Node"))
            .and_then(|c| c.with(TypeDescriptor::node("Turret").extends("Node")))
            .and_then(|c| c.with(TypeDescriptor::node("HeavyTurret").extends("Turret")))
            .and_then(|c| c.with(TypeDescriptor::node("Wheel").extends("Node")))
            .unwrap()
    }

    fn cannon_slot() -> SlotDescriptor {
        SlotDescriptor::required("cannon", "Cannon", "Turret")
    }

    #[test]
    fn test_exact_match() {
        let mut tree = SceneTree::new(catalog(), "Tank", "Node").unwrap();
        let root = tree.root();
        let cannon = tree.spawn_child(root, "Cannon", "Turret").unwrap();
        assert_eq!(match_slot(&tree, root, &cannon_slot()), SlotMatch::Found(cannon));
    }

    #[test]
    fn test_subtype_matches() {
        let mut tree = SceneTree::new(catalog(), "Tank", "Node").unwrap();
        let root = tree.root();
        let cannon = tree.spawn_child(root, "cannon", "HeavyTurret").unwrap();
        assert_eq!(match_slot(&tree, root, &cannon_slot()), SlotMatch::Found(cannon));
    }

    #[test]
    fn test_mismatch_then_later_candidate() {
        let mut tree = SceneTree::new(catalog(), "Tank", "Node").unwrap();
        let root = tree.root();
        tree.spawn_child(root, "Cannon", "Wheel").unwrap();
        let hull = tree.spawn_child(root, "Hull", "Node").unwrap();
        let cannon = tree.spawn_child(hull, "Cannon", "Turret").unwrap();
        assert_eq!(match_slot(&tree, root, &cannon_slot()), SlotMatch::Found(cannon));
    }

    #[test]
    fn test_mismatch_reports_first_same_name() {
        let mut tree = SceneTree::new(catalog(), "Tank", "Node").unwrap();
        let root = tree.root();
        let wheel = tree.spawn_child(root, "Cannon", "Wheel").unwrap();
        tree.spawn_child(root, "CANNON", "Node").unwrap();
        assert_eq!(
            match_slot(&tree, root, &cannon_slot()),
            SlotMatch::TypeMismatch {
                node: wheel,
                found: TypeTag::new("Wheel"),
            }
        );
    }

    #[test]
    fn test_root_is_not_searched() {
        let tree = SceneTree::new(catalog(), "Cannon", "Turret").unwrap();
        assert_eq!(
            match_slot(&tree, tree.root(), &cannon_slot()),
            SlotMatch::NotFound
        );
    }

    #[test]
    fn test_dead_node_is_invisible() {
        let mut tree = SceneTree::new(catalog(), "Tank", "Node").unwrap();
        let root = tree.root();
        let cannon = tree.spawn_child(root, "Cannon", "Wheel").unwrap();
        tree.queue_free(cannon).unwrap();
        assert_eq!(match_slot(&tree, root, &cannon_slot()), SlotMatch::NotFound);
    }
}
