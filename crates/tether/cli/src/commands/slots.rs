//! List declared slots

use crate::error::CliResult;
use crate::manifest::Manifest;
use crate::output::{self, OutputFormat};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Table row for one declared slot
#[derive(Debug, Serialize, Tabled)]
struct SlotRow {
    host: String,
    member: String,
    kind: String,
    /// Node name the slot resolves against
    lookup: String,
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    declared_type: String,
}

pub fn execute(manifest_path: &Path, format: OutputFormat) -> CliResult<()> {
    let manifest = Manifest::load(manifest_path)?;
    let registry = manifest.registry()?;

    let rows: Vec<SlotRow> = registry
        .host_types()
        .into_iter()
        .flat_map(|host_type| {
            registry
                .enumerate_slots(host_type)
                .iter()
                .map(move |slot| SlotRow {
                    host: host_type.to_string(),
                    member: slot.member.to_string(),
                    kind: slot.kind.to_string(),
                    lookup: slot.lookup_name().to_string(),
                    declared_type: slot.declared_type.to_string(),
                })
        })
        .collect();

    output::print_output(rows, format)
}
