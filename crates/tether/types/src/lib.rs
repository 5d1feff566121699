//! Tether Domain Types
//!
//! Tether binds named member slots on a **host** to nodes found in the
//! host's own subtree. This crate holds the vocabulary shared by the tree,
//! the registry and the resolver.
//!
//! # Key Concepts
//!
//! - **NodeHandle**: A generational, non-owning reference into a scene tree.
//!   A handle can outlive the node it names; the tree then reports it as
//!   absent.
//! - **TypeTag**: The declared type of a node or a slot.
//! - **SlotDescriptor**: One declared slot on a host type: member identity,
//!   declared type, binding kind and search key.
//! - **ResolutionReport**: The per-slot outcomes of one resolution pass, in
//!   declaration order.
//! - **ExecutionMode**: Design time downgrades failures to diagnostics, run
//!   time raises them as one aggregate error.
//!
//! # Design Principles
//!
//! 1. Every slot outcome is a value. Only the aggregate, gated by mode,
//!    becomes an error.
//! 2. Liveness is explicit. A dead node is absent even if its handle is valid.
//! 3. Declarations are immutable once registered.

#![deny(unsafe_code)]

mod errors;
mod ids;
mod report;
mod slot;

pub use errors::*;
pub use ids::*;
pub use report::*;
pub use slot::*;
