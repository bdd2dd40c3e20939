//! Network topology module.
//!
//! This module contains the declarative topology graph: node and link
//! types, the builder with its inspection queries, and the fixed
//! five-host, five-switch lab topology.

pub mod builder;
pub mod five_five;
pub mod types;

// Re-export key types and functions for easier access
pub use builder::Topology;
pub use five_five::five_five_topology;
pub use types::{Link, LinkParams, Node, NodeId, NodeKind};
