use proptest::prelude::*;
use tether_resolver::{DynamicHost, Resolver, ResolverConfig, SlotRegistry};
use tether_tree::{SceneTree, TypeCatalog, TypeDescriptor};
use tether_types::{ExecutionMode, NodeHandle, SlotDescriptor, SlotKind, TypeTag};

const NAMES: [&str; 4] = ["Cannon", "CANNON", "Hull", "Radar"];
const TYPES: [&str; 4] = ["Node", "Turret", "HeavyTurret", "Wheel"];

fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(TypeDescriptor::node("Node"))
        .and_then(|c| c.with(TypeDescriptor::node("Turret").extends("Node")))
        .and_then(|c| c.with(TypeDescriptor::node("HeavyTurret").extends("Turret")))
        .and_then(|c| c.with(TypeDescriptor::node("Wheel").extends("Node")))
        .and_then(|c| c.with(TypeDescriptor::node("Tank").extends("Node")))
        .unwrap()
}

/// (parent index into earlier nodes, name, type, dead)
fn arb_nodes() -> impl Strategy<Value = Vec<(usize, usize, usize, bool)>> {
    prop::collection::vec(
        (any::<usize>(), 0..NAMES.len(), 0..TYPES.len(), prop::bool::weighted(0.2)),
        0..24,
    )
}

fn build_tree(nodes: &[(usize, usize, usize, bool)]) -> SceneTree {
    let mut tree = SceneTree::new(catalog(), "Tank", "Tank").unwrap();
    let mut handles = vec![tree.root()];
    for &(parent, name, ty, _) in nodes {
        let parent = handles[parent % handles.len()];
        let handle = tree.spawn_child(parent, NAMES[name], TYPES[ty]).unwrap();
        handles.push(handle);
    }
    for (i, &(_, _, _, dead)) in nodes.iter().enumerate() {
        let handle = handles[i + 1];
        if dead && tree.is_alive(handle) {
            tree.queue_free(handle).unwrap();
        }
    }
    tree
}

fn brute_force(tree: &SceneTree, node: NodeHandle, slot: &SlotDescriptor) -> Option<NodeHandle> {
    for &child in tree.children(node) {
        if !tree.is_alive(child) {
            continue;
        }
        let name_ok = tree
            .name(child)
            .is_some_and(|n| n.to_lowercase() == slot.search_key.to_lowercase());
        let type_ok = tree.is_instance_of(child, &slot.declared_type);
        if name_ok && type_ok {
            return Some(child);
        }
        if let Some(found) = brute_force(tree, child, slot) {
            return Some(found);
        }
    }
    None
}

fn resolver_with(slots: Vec<SlotDescriptor>) -> Resolver {
    let mut registry = SlotRegistry::new();
    registry.declare(TypeTag::new("Tank"), slots).unwrap();
    Resolver::new(registry, ResolverConfig::default())
}

proptest! {
    #[test]
    fn prop_required_binds_first_candidate(
        nodes in arb_nodes(),
        key in 0..NAMES.len(),
        ty in 0..TYPES.len(),
    ) {
        let mut tree = build_tree(&nodes);
        let slot = SlotDescriptor::required("target", NAMES[key], TYPES[ty]);
        let expected = brute_force(&tree, tree.root(), &slot);

        let resolver = resolver_with(vec![slot]);
        let mut host = DynamicHost::new(tree.root(), "Tank");
        let report = resolver
            .resolve_host(&mut host, &mut tree, ExecutionMode::DesignTime)
            .unwrap();

        prop_assert_eq!(report.outcomes.len(), 1);
        prop_assert_eq!(report.outcomes[0].node(), expected);
        prop_assert_eq!(host.get("target"), expected);
        prop_assert_eq!(report.has_failures(), expected.is_none());
        if let Some(node) = expected {
            prop_assert!(tree.is_alive(node));
        }
    }

    #[test]
    fn prop_optional_never_fails(
        nodes in arb_nodes(),
        key in 0..NAMES.len(),
        ty in 0..TYPES.len(),
    ) {
        let mut tree = build_tree(&nodes);
        let resolver = resolver_with(vec![SlotDescriptor::optional("target", NAMES[key], TYPES[ty])]);
        let mut host = DynamicHost::new(tree.root(), "Tank");

        let report = resolver
            .resolve_host(&mut host, &mut tree, ExecutionMode::RunTime)
            .unwrap();
        prop_assert!(!report.has_failures());
        prop_assert!(report.outcomes[0].diagnostic.is_none());
    }

    #[test]
    fn prop_failures_follow_declaration_order(
        nodes in arb_nodes(),
        picks in prop::collection::vec((0..NAMES.len(), 0..TYPES.len()), 1..6),
    ) {
        let mut tree = build_tree(&nodes);
        let slots: Vec<SlotDescriptor> = picks
            .iter()
            .enumerate()
            .map(|(i, &(key, ty))| SlotDescriptor::required(format!("slot{i}"), NAMES[key], TYPES[ty]))
            .collect();
        let expected: Vec<String> = slots
            .iter()
            .filter(|s| brute_force(&tree, tree.root(), s).is_none())
            .map(|s| s.member.to_string())
            .collect();

        let resolver = resolver_with(slots.clone());
        let mut host = DynamicHost::new(tree.root(), "Tank");
        let report = resolver
            .resolve_host(&mut host, &mut tree, ExecutionMode::DesignTime)
            .unwrap();

        prop_assert_eq!(report.outcomes.len(), slots.len());
        prop_assert!(report.outcomes.iter().all(|o| o.slot.kind == SlotKind::Required));
        prop_assert_eq!(report.failed_slot_names(), expected.iter().map(String::as_str).collect::<Vec<_>>());

        let run_time = resolver.resolve_host(&mut host, &mut tree, ExecutionMode::RunTime);
        match run_time {
            Ok(report) => {
                prop_assert!(expected.is_empty() && !report.has_failures());
            }
            Err(err) => {
                prop_assert_eq!(
                    err.failed_slot_names(),
                    expected.iter().map(String::as_str).collect::<Vec<_>>()
                );
            }
        }
    }
}
