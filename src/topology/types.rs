//! Topology type definitions.
//!
//! Plain data types for the declarative topology graph: node handles,
//! node kinds, links, and optional link-quality parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque handle to a declared node, returned by `add_host`/`add_switch`
/// and consumed by `add_link`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Positional index of the node in declaration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role of a declared node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// End-system capable of running applications, no forwarding role
    Host,
    /// Forwarding node connecting multiple links
    Switch,
}

/// A declared node: a unique short name plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

/// Optional link-quality parameters.
///
/// All fields default to `None`, meaning the emulation engine's own
/// defaults apply. Unset fields are omitted from the generated engine
/// document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LinkParams {
    /// Link bandwidth in Mbit/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth_mbit: Option<f64>,
    /// One-way propagation delay
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub delay: Option<Duration>,
    /// Packet loss in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_percent: Option<f64>,
    /// Maximum queue size in packets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_queue: Option<u32>,
}

impl LinkParams {
    /// True when every field is unset and the engine defaults apply.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// An undirected link between two declared nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub params: LinkParams,
}

impl Link {
    /// True if this link touches `id` on either side.
    pub fn touches(&self, id: NodeId) -> bool {
        self.a == id || self.b == id
    }

    /// The other endpoint, if `id` is one of the two.
    pub fn peer_of(&self, id: NodeId) -> Option<NodeId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}
