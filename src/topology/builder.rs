//! Topology construction and inspection.
//!
//! The `Topology` struct collects host, switch, and link declarations in
//! order and exposes read-only queries over the resulting graph. No
//! validation happens here: duplicate names or dangling handles flow into
//! the generated engine document and are rejected engine-side with an
//! engine-defined error.

use crate::topology::types::{Link, LinkParams, Node, NodeId, NodeKind};

/// Declarative topology graph: an ordered set of nodes and undirected
/// links, built once and immutable for the session's lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a host node and return its handle.
    pub fn add_host(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(name.into(), NodeKind::Host)
    }

    /// Declare a switch node and return its handle.
    pub fn add_switch(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(name.into(), NodeKind::Switch)
    }

    fn add_node(&mut self, name: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { name, kind });
        id
    }

    /// Declare an undirected link with default link parameters.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) {
        self.add_link_with(a, b, LinkParams::default());
    }

    /// Declare an undirected link with explicit bandwidth/delay/loss/queue
    /// parameters.
    pub fn add_link_with(&mut self, a: NodeId, b: NodeId, params: LinkParams) {
        self.links.push(Link { a, b, params });
    }

    /// Declared nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Declared links in declaration order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Node behind a handle, if the handle is in range.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node handle by name. First declaration wins when names
    /// collide; the collision itself is the engine's to reject.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Handles of all declared hosts, in declaration order.
    pub fn hosts(&self) -> Vec<NodeId> {
        self.ids_of_kind(NodeKind::Host)
    }

    /// Handles of all declared switches, in declaration order.
    pub fn switches(&self) -> Vec<NodeId> {
        self.ids_of_kind(NodeKind::Switch)
    }

    fn ids_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == kind)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Number of declared hosts.
    pub fn host_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Host).count()
    }

    /// Number of declared switches.
    pub fn switch_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Switch).count()
    }

    /// Number of links touching a node.
    pub fn degree(&self, id: NodeId) -> usize {
        self.links.iter().filter(|l| l.touches(id)).count()
    }

    /// Handles of the nodes directly linked to `id`.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.links.iter().filter_map(|l| l.peer_of(id)).collect()
    }

    /// True if a link between `a` and `b` is declared, in either order.
    pub fn has_link(&self, a: NodeId, b: NodeId) -> bool {
        self.links
            .iter()
            .any(|l| (l.a == a && l.b == b) || (l.a == b && l.b == a))
    }

    /// True if every declared node is reachable from every other over the
    /// declared links. An empty topology counts as connected.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![NodeId(0)];
        visited[0] = true;
        while let Some(id) = stack.pop() {
            for peer in self.neighbors(id) {
                if let Some(seen) = visited.get_mut(peer.0) {
                    if !*seen {
                        *seen = true;
                        stack.push(peer);
                    }
                }
            }
        }
        visited.into_iter().all(|seen| seen)
    }
}
