//! The resolver: one pass over a host's declared slots
//!
//! Every slot is processed, failures included, before the failure policy
//! looks at the finished report:
//!
//! ```text
//! Start -> Scan all slots -> Aggregate -> Apply policy -> Return | Raise
//! ```

use crate::config::{AutoInstantiatePolicy, ResolverConfig};
use crate::host::Bindable;
use crate::matching::{match_slot, SlotMatch};
use crate::slot_registry::SlotRegistry;
use tether_tree::{SceneTree, TypeCapability};
use tether_types::{
    AutoInstantiateFailure, BindResult, ExecutionMode, NodeHandle, ResolutionOutcome,
    ResolutionReport, SlotDescriptor, SlotFailure, SlotKind,
};
use tracing::{debug, error, warn};

/// Binds host slots against a subtree and applies the failure policy
#[derive(Clone, Debug)]
pub struct Resolver {
    registry: SlotRegistry,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(registry: SlotRegistry, config: ResolverConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `host` against the host's own subtree
    pub fn resolve_host<H: Bindable + ?Sized>(
        &self,
        host: &mut H,
        tree: &mut SceneTree,
        mode: ExecutionMode,
    ) -> BindResult<ResolutionReport> {
        let root = host.host_node();
        self.resolve(host, tree, root, mode)
    }

    /// Resolve every declared slot of `host` against the subtree at `root`.
    ///
    /// Returns the full report, unless there were failures in
    /// [`ExecutionMode::RunTime`], in which case the aggregate error is
    /// returned instead. Bound nodes are written into the host as they are
    /// found, so a failed run-time pass may still leave some slots set.
    /// Every slot that does not end up bound is cleared.
    pub fn resolve<H: Bindable + ?Sized>(
        &self,
        host: &mut H,
        tree: &mut SceneTree,
        root: NodeHandle,
        mode: ExecutionMode,
    ) -> BindResult<ResolutionReport> {
        let host_type = host.host_type();
        let host_path = tree.path(host.host_node());
        let _span =
            tracing::debug_span!("resolve", host = %host_path, mode = %mode).entered();

        let mut report = ResolutionReport::new(host_path, host_type.clone(), mode);
        for slot in self.registry.enumerate_slots(&host_type) {
            let outcome = match slot.kind {
                SlotKind::Required | SlotKind::Optional => {
                    self.bind_matched(host, tree, root, slot)
                }
                SlotKind::AutoInstantiate => self.auto_instantiate(host, tree, slot),
            };
            if !outcome.is_bound() {
                host.clear_slot_value(&slot.member);
            }
            report.push(outcome);
        }

        let summary = report.summary();
        debug!(
            bound = summary.bound,
            skipped = summary.skipped,
            failed = summary.failed,
            "Resolution pass complete"
        );

        self.apply_policy(report)
    }

    fn bind_matched<H: Bindable + ?Sized>(
        &self,
        host: &mut H,
        tree: &SceneTree,
        root: NodeHandle,
        slot: &SlotDescriptor,
    ) -> ResolutionOutcome {
        let required = slot.kind == SlotKind::Required;

        match match_slot(tree, root, slot) {
            SlotMatch::Found(node) => {
                let path = tree.path(node);
                match host.set_slot_value(&slot.member, node) {
                    Ok(()) => {
                        if self.config.log_bound_paths {
                            debug!(slot = %slot.member, path = %path, "Found node");
                        }
                        ResolutionOutcome::bound(slot.clone(), node, path)
                    }
                    Err(err) if required => ResolutionOutcome::failed(
                        slot.clone(),
                        SlotFailure::AssignmentFailed {
                            member: slot.member.clone(),
                            path,
                            cause: err.to_string(),
                        },
                    ),
                    Err(err) => {
                        warn!(
                            slot = %slot.member,
                            path = %path,
                            error = %err,
                            "Optional slot not assigned"
                        );
                        ResolutionOutcome::skipped_with_note(
                            slot.clone(),
                            format!("failed to assign node '{path}': {err}"),
                        )
                    }
                }
            }
            SlotMatch::TypeMismatch { node, found } if required => ResolutionOutcome::failed(
                slot.clone(),
                SlotFailure::BindingTypeMismatch {
                    path: tree.path(node),
                    expected: slot.declared_type.clone(),
                    found,
                },
            ),
            SlotMatch::NotFound if required => ResolutionOutcome::failed(
                slot.clone(),
                SlotFailure::BindingNotFound {
                    search_key: slot.search_key.clone(),
                    expected: slot.declared_type.clone(),
                    root: tree.path(root),
                },
            ),
            SlotMatch::TypeMismatch { .. } | SlotMatch::NotFound => {
                ResolutionOutcome::skipped(slot.clone())
            }
        }
    }

    fn auto_instantiate<H: Bindable + ?Sized>(
        &self,
        host: &mut H,
        tree: &mut SceneTree,
        slot: &SlotDescriptor,
    ) -> ResolutionOutcome {
        let host_node = host.host_node();

        if self.config.auto_instantiate == AutoInstantiatePolicy::ReuseLive {
            if let Some(existing) = host.slot_value(&slot.member) {
                if tree.is_alive(existing) && tree.parent(existing) == Some(host_node) {
                    debug!(slot = %slot.member, node = %existing, "Reusing live instance");
                    return ResolutionOutcome::bound(slot.clone(), existing, tree.path(existing));
                }
            }
        }

        let fail = |reason: AutoInstantiateFailure| {
            ResolutionOutcome::failed(
                slot.clone(),
                SlotFailure::AutoInstantiationFailed {
                    member: slot.member.clone(),
                    declared_type: slot.declared_type.clone(),
                    reason,
                },
            )
        };

        let instance = match tree.catalog().instantiate(&slot.declared_type) {
            Ok(instance) => instance,
            Err(reason) => return fail(reason),
        };
        if instance.capability != TypeCapability::Node {
            return fail(AutoInstantiateFailure::NotAttachable(instance.type_tag));
        }

        let child = match tree.attach_instance(host_node, instance, slot.member.as_str()) {
            Ok(child) => child,
            Err(err) => return fail(AutoInstantiateFailure::AttachFailed(err.to_string())),
        };

        if let Err(err) = host.set_slot_value(&slot.member, child) {
            if let Err(cleanup) = tree.free_now(child) {
                warn!(node = %child, error = %cleanup, "Could not free orphaned instance");
            }
            return fail(AutoInstantiateFailure::AssignmentFailed(err.to_string()));
        }

        let path = tree.path(child);
        if self.config.log_bound_paths {
            debug!(slot = %slot.member, path = %path, "Instantiated node");
        }
        ResolutionOutcome::bound(slot.clone(), child, path)
    }

    fn apply_policy(&self, report: ResolutionReport) -> BindResult<ResolutionReport> {
        if !report.has_failures() {
            if report.is_empty() && self.config.note_empty_hosts {
                debug!(host_type = %report.host_type, "Host declares no bindable slots");
            }
            return Ok(report);
        }

        match report.mode {
            ExecutionMode::DesignTime => {
                for (outcome, failure) in report.failures() {
                    warn!(
                        slot = outcome.slot_name(),
                        kind = %failure.kind(),
                        "{failure}"
                    );
                }
                error!(
                    failed = ?report.failed_slot_names(),
                    "Failed to resolve slots, continuing at design time"
                );
                Ok(report)
            }
            ExecutionMode::RunTime => Err(report.to_aggregate_error()),
        }
    }
}
