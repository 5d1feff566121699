//! Scene tree for Tether
//!
//! Nodes live in an arena owned by [`SceneTree`] and are addressed by
//! generational [`NodeHandle`](tether_types::NodeHandle)s. Each node has a
//! name, a declared type, ordered children and a liveness flag.
//!
//! A node queued for destruction stays reachable through its handle until
//! [`SceneTree::flush_freed`] runs, but every search treats it as absent.
//!
//! The [`TypeCatalog`] carried by the tree answers the two type questions
//! binding needs: "is `A` the same as or a subtype of `B`" and "can a default
//! instance of `T` be constructed and attached".

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod query;
pub mod tree;

pub use catalog::{Constructor, Instance, TypeCapability, TypeCatalog, TypeDescriptor};
pub use error::{TreeError, TreeResult};
pub use query::{names_match, Descendants};
pub use tree::SceneTree;
