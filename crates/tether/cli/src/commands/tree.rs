//! Print a manifest's tree

use crate::error::CliResult;
use crate::manifest::Manifest;
use crate::output::{self, OutputFormat};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tether_tree::SceneTree;
use tether_types::NodeHandle;

/// Serializable view of a node and its children
#[derive(Debug, Serialize)]
struct NodeView {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    path: String,
    alive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeView>,
}

impl NodeView {
    fn build(tree: &SceneTree, node: NodeHandle) -> Self {
        Self {
            name: tree.name(node).unwrap_or_default().to_string(),
            type_name: tree.type_of(node).map(ToString::to_string).unwrap_or_default(),
            path: tree.path(node),
            alive: tree.is_alive(node),
            children: tree
                .children(node)
                .iter()
                .map(|&child| NodeView::build(tree, child))
                .collect(),
        }
    }

    fn print(&self, depth: usize) {
        let label = format!("{}{} ({})", "  ".repeat(depth), self.name, self.type_name);
        if self.alive {
            println!("{}", label);
        } else {
            println!("{} {}", label.dimmed(), "[dead]".red());
        }
        for child in &self.children {
            child.print(depth + 1);
        }
    }
}

pub fn execute(manifest_path: &Path, format: OutputFormat) -> CliResult<()> {
    let manifest = Manifest::load(manifest_path)?;
    let tree = manifest.build_tree()?;
    let view = NodeView::build(&tree, tree.root());

    match format {
        OutputFormat::Table => {
            output::print_heading("Scene Tree");
            view.print(0);
            println!();
            println!("  {} nodes", tree.node_count());
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(&view, format),
    }
}
