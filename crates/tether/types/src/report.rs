//! Resolution reports: the outcome of one resolution pass

use crate::{BindError, FailedSlot, NodeHandle, SlotDescriptor, SlotFailure, SlotKind, TypeTag};
use serde::{Deserialize, Serialize};

// ── Execution Mode ───────────────────────────────────────────────────

/// Context the resolver uses to choose its failure policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Editor or tooling: failures are logged, the host keeps initializing
    DesignTime,
    /// Deployed build: any failure aborts host initialization
    RunTime,
}

impl ExecutionMode {
    pub fn is_design_time(&self) -> bool {
        matches!(self, ExecutionMode::DesignTime)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::DesignTime => f.write_str("design-time"),
            ExecutionMode::RunTime => f.write_str("run-time"),
        }
    }
}

// ── Slot Outcome ─────────────────────────────────────────────────────

/// Status of a single slot after a pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotStatus {
    /// The slot now references `node`
    Bound { node: NodeHandle, path: String },
    /// Optional slot left empty
    Skipped,
    /// The slot could not be populated
    Failed { failure: SlotFailure },
}

/// Outcome of one slot in one pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub slot: SlotDescriptor,
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl ResolutionOutcome {
    pub fn bound(slot: SlotDescriptor, node: NodeHandle, path: impl Into<String>) -> Self {
        Self {
            slot,
            status: SlotStatus::Bound {
                node,
                path: path.into(),
            },
            diagnostic: None,
        }
    }

    pub fn skipped(slot: SlotDescriptor) -> Self {
        Self {
            slot,
            status: SlotStatus::Skipped,
            diagnostic: None,
        }
    }

    /// A skipped slot carrying a note, for optional slots whose match could
    /// not be assigned
    pub fn skipped_with_note(slot: SlotDescriptor, note: impl Into<String>) -> Self {
        Self {
            slot,
            status: SlotStatus::Skipped,
            diagnostic: Some(note.into()),
        }
    }

    pub fn failed(slot: SlotDescriptor, failure: SlotFailure) -> Self {
        let diagnostic = Some(failure.to_string());
        Self {
            slot,
            status: SlotStatus::Failed { failure },
            diagnostic,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.status, SlotStatus::Bound { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, SlotStatus::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SlotStatus::Failed { .. })
    }

    /// The node this slot was bound to, if any
    pub fn node(&self) -> Option<NodeHandle> {
        match &self.status {
            SlotStatus::Bound { node, .. } => Some(*node),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&SlotFailure> {
        match &self.status {
            SlotStatus::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    /// Name used when reporting this slot
    pub fn slot_name(&self) -> &str {
        self.slot.member.as_str()
    }
}

// ── Resolution Report ────────────────────────────────────────────────

/// Per-slot outcomes of one pass, in slot-declaration order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Tree path of the host
    pub host: String,
    /// Registry key the slots were enumerated from
    pub host_type: TypeTag,
    pub mode: ExecutionMode,
    pub outcomes: Vec<ResolutionOutcome>,
}

impl ResolutionReport {
    pub fn new(host: impl Into<String>, host_type: TypeTag, mode: ExecutionMode) -> Self {
        Self {
            host: host.into(),
            host_type,
            mode,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: ResolutionOutcome) {
        self.outcomes.push(outcome);
    }

    /// True when the host declared no slots at all
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(ResolutionOutcome::is_failed)
    }

    /// Names of failed slots in declaration order
    pub fn failed_slot_names(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(ResolutionOutcome::slot_name)
            .collect()
    }

    /// Failed outcomes paired with their failure
    pub fn failures(&self) -> impl Iterator<Item = (&ResolutionOutcome, &SlotFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure().map(|f| (o, f)))
    }

    /// Outcome for a given member, if declared
    pub fn outcome(&self, member: &str) -> Option<&ResolutionOutcome> {
        self.outcomes.iter().find(|o| o.slot.member.as_str() == member)
    }

    /// Summary counts
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.outcomes.len(),
            ..ReportSummary::default()
        };
        for outcome in &self.outcomes {
            match outcome.status {
                SlotStatus::Bound { .. } => summary.bound += 1,
                SlotStatus::Skipped => summary.skipped += 1,
                SlotStatus::Failed { .. } => summary.failed += 1,
            }
            if outcome.slot.kind == SlotKind::AutoInstantiate && outcome.is_bound() {
                summary.instantiated += 1;
            }
        }
        summary
    }

    /// Build the aggregate error for this report's failures
    pub fn to_aggregate_error(&self) -> BindError {
        BindError::AggregateBindingFailure {
            host: self.host.clone(),
            failed: self
                .failures()
                .map(|(outcome, failure)| FailedSlot {
                    name: outcome.slot_name().to_string(),
                    kind: failure.kind(),
                    diagnostic: failure.to_string(),
                })
                .collect(),
        }
    }
}

/// Outcome counts for a report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub bound: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Auto-instantiated slots that ended up bound
    pub instantiated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, TypeTag};

    fn not_found(key: &str) -> SlotFailure {
        SlotFailure::BindingNotFound {
            search_key: key.into(),
            expected: TypeTag::new("Turret"),
            root: "/Tank".into(),
        }
    }

    fn make_report() -> ResolutionReport {
        let mut report =
            ResolutionReport::new("/Tank", TypeTag::new("Tank"), ExecutionMode::DesignTime);
        report.push(ResolutionOutcome::failed(
            SlotDescriptor::required("a", "A", "Turret"),
            not_found("A"),
        ));
        report.push(ResolutionOutcome::bound(
            SlotDescriptor::required("b", "B", "Turret"),
            NodeHandle::new(2, 0),
            "/Tank/B",
        ));
        report.push(ResolutionOutcome::skipped(SlotDescriptor::optional(
            "radar", "Radar", "Radar",
        )));
        report.push(ResolutionOutcome::failed(
            SlotDescriptor::required("c", "C", "Turret"),
            not_found("C"),
        ));
        report
    }

    #[test]
    fn test_failed_names_in_declaration_order() {
        let report = make_report();
        assert!(report.has_failures());
        assert_eq!(report.failed_slot_names(), vec!["a", "c"]);
    }

    #[test]
    fn test_summary() {
        let summary = make_report().summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.bound, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.instantiated, 0);
    }

    #[test]
    fn test_outcome_diagnostics() {
        let report = make_report();
        assert!(report.outcome("radar").unwrap().diagnostic.is_none());
        assert!(report.outcome("b").unwrap().diagnostic.is_none());
        assert_eq!(
            report.outcome("a").unwrap().diagnostic.as_deref(),
            Some("no live node named 'A' of type Turret below '/Tank'")
        );
        assert_eq!(report.outcome("b").unwrap().node(), Some(NodeHandle::new(2, 0)));
    }

    #[test]
    fn test_aggregate_error() {
        let err = make_report().to_aggregate_error();
        match err {
            BindError::AggregateBindingFailure { host, failed } => {
                assert_eq!(host, "/Tank");
                assert_eq!(failed.len(), 2);
                assert_eq!(failed[0].kind, FailureKind::BindingNotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_report() {
        let report = ResolutionReport::new("/Idle", TypeTag::new("Idle"), ExecutionMode::RunTime);
        assert!(report.is_empty());
        assert!(!report.has_failures());
        assert!(report.failed_slot_names().is_empty());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ExecutionMode::DesignTime.to_string(), "design-time");
        assert!(!ExecutionMode::RunTime.is_design_time());
    }
}
