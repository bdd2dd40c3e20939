//! Regression tests for the lab topology and session artifacts.

use std::collections::BTreeSet;

use netlab::config::Config;
use netlab::engine::{write_engine_document, ProcessEngine};
use netlab::session::{Session, SessionState};
use netlab::topology::{five_five_topology, NodeKind};

/// Expected link set of the lab graph, as unordered name pairs.
const EXPECTED_LINKS: [(&str, &str); 9] = [
    ("h1", "s2"),
    ("h2", "s2"),
    ("h3", "s3"),
    ("h4", "s3"),
    ("h5", "s4"),
    ("s2", "s1"),
    ("s1", "s3"),
    ("s1", "s4"),
    ("s4", "s5"),
];

fn link_name_set(topo: &netlab::topology::Topology) -> BTreeSet<(String, String)> {
    topo.links()
        .iter()
        .map(|l| {
            let a = topo.node(l.a).unwrap().name.clone();
            let b = topo.node(l.b).unwrap().name.clone();
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect()
}

#[test]
fn test_five_hosts_and_five_switches() {
    let topo = five_five_topology();
    assert_eq!(topo.host_count(), 5);
    assert_eq!(topo.switch_count(), 5);
    assert_eq!(topo.nodes().len(), 10);
}

#[test]
fn test_every_host_is_a_leaf_on_one_switch() {
    let topo = five_five_topology();
    for id in topo.hosts() {
        assert_eq!(topo.degree(id), 1, "host {} is not a leaf", topo.node(id).unwrap().name);
        let peer = topo.neighbors(id)[0];
        assert_eq!(
            topo.node(peer).unwrap().kind,
            NodeKind::Switch,
            "host {} is not attached to a switch",
            topo.node(id).unwrap().name
        );
    }
}

#[test]
fn test_graph_is_a_single_connected_component() {
    let topo = five_five_topology();
    assert!(topo.is_connected());
}

#[test]
fn test_exact_link_set_and_no_others() {
    let topo = five_five_topology();
    let expected: BTreeSet<(String, String)> = EXPECTED_LINKS
        .iter()
        .map(|(a, b)| {
            if a <= b {
                (a.to_string(), b.to_string())
            } else {
                (b.to_string(), a.to_string())
            }
        })
        .collect();
    assert_eq!(link_name_set(&topo), expected);
    assert_eq!(topo.links().len(), EXPECTED_LINKS.len());
}

#[test]
fn test_two_builds_are_identical() {
    let first = five_five_topology();
    let second = five_five_topology();
    assert_eq!(first, second);
    assert_eq!(link_name_set(&first), link_name_set(&second));
}

#[test]
fn test_engine_document_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let topo = five_five_topology();
    let path = write_engine_document(&topo, "info", dir.path()).unwrap();

    let yaml = std::fs::read_to_string(&path).unwrap();
    assert!(yaml.contains("log_level: info"));
    for (a, b) in EXPECTED_LINKS {
        assert!(yaml.contains(a) && yaml.contains(b));
    }

    let registry: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("node_registry.json")).unwrap(),
    )
    .unwrap();
    let entries = registry.as_array().unwrap();
    assert_eq!(entries.len(), 10);
    let hosts = entries.iter().filter(|e| e["kind"] == "host").count();
    let switches = entries.iter().filter(|e| e["kind"] == "switch").count();
    assert_eq!(hosts, 5);
    assert_eq!(switches, 5);
}

#[test]
fn test_session_start_stop_without_shell_releases_resources() {
    // `cat` stands in for an engine that exits cleanly when told to quit.
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.directory = dir.path().to_string_lossy().to_string();
    config.engine.command = "cat".to_string();

    let engine = ProcessEngine::new(config);
    let mut session = Session::new(engine, five_five_topology());

    session.build().unwrap();
    session.start().unwrap();
    session.stop().unwrap();
    assert_eq!(session.state(), SessionState::Stopped);
}
