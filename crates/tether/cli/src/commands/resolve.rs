//! Resolve every host in a manifest's tree

use crate::error::CliResult;
use crate::manifest::Manifest;
use crate::output::{self, OutputFormat};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tether_resolver::Resolver;
use tether_types::{ExecutionMode, ResolutionOutcome, ResolutionReport, SlotStatus};

/// Table row for one slot outcome
#[derive(Debug, Serialize, Tabled)]
struct OutcomeRow {
    slot: String,
    kind: String,
    status: String,
    node: String,
    detail: String,
}

impl From<&ResolutionOutcome> for OutcomeRow {
    fn from(outcome: &ResolutionOutcome) -> Self {
        let (status, node) = match &outcome.status {
            SlotStatus::Bound { path, .. } => ("bound", path.clone()),
            SlotStatus::Skipped => ("skipped", String::new()),
            SlotStatus::Failed { .. } => ("failed", String::new()),
        };
        Self {
            slot: outcome.slot_name().to_string(),
            kind: outcome.slot.kind.to_string(),
            status: status.to_string(),
            node,
            detail: outcome.diagnostic.clone().unwrap_or_default(),
        }
    }
}

/// Play the tree-entry hook for every host in the manifest.
///
/// Hosts are the live nodes, root included, whose type has a slot
/// declaration; each is resolved once, in pre-order. A run-time failure
/// prints the reports gathered so far and then ends the command.
pub fn execute(manifest_path: &Path, mode: ExecutionMode, format: OutputFormat) -> CliResult<()> {
    let manifest = Manifest::load(manifest_path)?;
    let mut tree = manifest.build_tree()?;
    let resolver = Resolver::new(manifest.registry()?, manifest.resolver.clone());

    let root = tree.root();
    let hosts: Vec<_> = std::iter::once(root)
        .chain(tree.descendants(root))
        .filter_map(|node| {
            let host_type = tree.type_of(node)?;
            resolver
                .registry()
                .contains(host_type)
                .then(|| (node, host_type.clone()))
        })
        .collect();
    tracing::info!(hosts = hosts.len(), mode = %mode, "Resolving hosts");

    let mut reports = Vec::with_capacity(hosts.len());
    for (node, host_type) in hosts {
        let mut host = manifest.host_for(node, &host_type);
        match resolver.resolve_host(&mut host, &mut tree, mode) {
            Ok(report) => reports.push(report),
            Err(err) => {
                if !reports.is_empty() {
                    print_reports(&reports, format)?;
                }
                return Err(err.into());
            }
        }
    }

    print_reports(&reports, format)
}

fn print_reports(reports: &[ResolutionReport], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(&reports, format),
        OutputFormat::Table => {
            if reports.is_empty() {
                println!("{}", "No hosts declare slots".dimmed());
            }
            for report in reports {
                output::print_heading(&format!(
                    "{} ({}) [{}]",
                    report.host, report.host_type, report.mode
                ));
                let rows: Vec<OutcomeRow> = report.outcomes.iter().map(OutcomeRow::from).collect();
                output::print_output(rows, format)?;

                let summary = report.summary();
                println!(
                    "  {} bound, {} skipped, {} failed",
                    summary.bound.to_string().green(),
                    summary.skipped,
                    summary.failed.to_string().red()
                );
                println!();
            }
            Ok(())
        }
    }
}
