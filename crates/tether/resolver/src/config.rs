//! Resolver configuration

use serde::{Deserialize, Serialize};

/// What to do with an auto-instantiated slot that is already bound
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoInstantiatePolicy {
    /// Keep the current value if it is a live child of the host
    #[default]
    ReuseLive,
    /// Always construct and attach a new instance
    AlwaysCreate,
}

/// Configuration for a [`Resolver`](crate::Resolver)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Re-invocation behaviour for auto-instantiated slots
    pub auto_instantiate: AutoInstantiatePolicy,
    /// Log a note when a host declares no slots at all
    pub note_empty_hosts: bool,
    /// Debug-log the tree path of every bound node
    pub log_bound_paths: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            auto_instantiate: AutoInstantiatePolicy::ReuseLive,
            note_empty_hosts: true,
            log_bound_paths: true,
        }
    }
}
