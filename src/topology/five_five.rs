//! The fixed five-host, five-switch lab topology.
//!
//! Hosts hang off the switch core as leaves; the four switch-switch links
//! form the backbone through s1. All links use the engine's default
//! parameters. The switch-switch links are the intended place to attach
//! bandwidth and delay constraints via `add_link_with` when exploring
//! shaped variants.

use crate::topology::builder::Topology;

/// Build the five-host, five-switch lab graph.
///
/// Deterministic: every call declares the same nodes and links in the
/// same order.
pub fn five_five_topology() -> Topology {
    let mut topo = Topology::new();

    // Hosts
    let h1 = topo.add_host("h1");
    let h2 = topo.add_host("h2");
    let h3 = topo.add_host("h3");
    let h4 = topo.add_host("h4");
    let h5 = topo.add_host("h5");

    // Switches
    let s1 = topo.add_switch("s1");
    let s2 = topo.add_switch("s2");
    let s3 = topo.add_switch("s3");
    let s4 = topo.add_switch("s4");
    let s5 = topo.add_switch("s5");

    // Host-switch links (default link parameters)
    topo.add_link(h1, s2);
    topo.add_link(h2, s2);
    topo.add_link(h3, s3);
    topo.add_link(h4, s3);
    topo.add_link(h5, s4);

    // Switch-switch backbone
    topo.add_link(s2, s1);
    topo.add_link(s1, s3);
    topo.add_link(s1, s4);
    topo.add_link(s4, s5);

    topo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_hosts_five_switches() {
        let topo = five_five_topology();
        assert_eq!(topo.host_count(), 5);
        assert_eq!(topo.switch_count(), 5);
        assert_eq!(topo.links().len(), 9);
    }

    #[test]
    fn test_all_links_use_default_params() {
        let topo = five_five_topology();
        assert!(topo.links().iter().all(|l| l.params.is_default()));
    }

    #[test]
    fn test_builds_are_deterministic() {
        assert_eq!(five_five_topology(), five_five_topology());
    }
}
