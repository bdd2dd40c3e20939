//! Engine document generation.
//!
//! Renders a `Topology` into the YAML document consumed by the external
//! engine, plus a JSON node registry for tooling. Unset link parameters
//! are omitted so the engine applies its own defaults. Nothing is
//! validated here: unknown handles and duplicate names are passed through
//! for the engine to reject.

use crate::topology::{LinkParams, Topology};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level document handed to the engine.
#[derive(Serialize, Debug)]
pub struct EngineDocument {
    general: DocGeneral,
    network: DocNetwork,
}

#[derive(Serialize, Debug)]
struct DocGeneral {
    log_level: String,
}

#[derive(Serialize, Debug)]
struct DocNetwork {
    nodes: Vec<DocNode>,
    links: Vec<DocLink>,
}

#[derive(Serialize, Debug)]
struct DocNode {
    name: String,
    kind: crate::topology::NodeKind,
}

#[derive(Serialize, Debug)]
struct DocLink {
    endpoints: [String; 2],
    #[serde(flatten)]
    params: LinkParams,
}

/// Registry entry written next to the document, one per declared node.
#[derive(Serialize, Debug)]
struct RegistryEntry {
    index: usize,
    name: String,
    kind: crate::topology::NodeKind,
    degree: usize,
}

impl EngineDocument {
    /// Render a topology into the engine's document form.
    pub fn render(topology: &Topology, log_level: &str) -> Self {
        let nodes = topology
            .nodes()
            .iter()
            .map(|n| DocNode {
                name: n.name.clone(),
                kind: n.kind,
            })
            .collect();

        let links = topology
            .links()
            .iter()
            .map(|l| DocLink {
                endpoints: [endpoint_name(topology, l.a), endpoint_name(topology, l.b)],
                params: l.params.clone(),
            })
            .collect();

        Self {
            general: DocGeneral {
                log_level: log_level.to_string(),
            },
            network: DocNetwork { nodes, links },
        }
    }

    /// Serialize to the YAML text handed to the engine.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).wrap_err("Failed to serialize engine document")
    }
}

/// Name behind a handle; dangling handles pass through as their raw index
/// for the engine to reject.
fn endpoint_name(topology: &Topology, id: crate::topology::NodeId) -> String {
    topology
        .node(id)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Write the engine document and node registry into `output_dir`.
///
/// Returns the path of the YAML document for the engine invocation.
pub fn write_engine_document(
    topology: &Topology,
    log_level: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).wrap_err_with(|| {
        format!("Failed to create output directory '{}'", output_dir.display())
    })?;

    let document = EngineDocument::render(topology, log_level);
    let document_path = output_dir.join("network.yaml");
    fs::write(&document_path, document.to_yaml()?)
        .wrap_err_with(|| format!("Failed to write '{}'", document_path.display()))?;

    let registry: Vec<RegistryEntry> = topology
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, n)| RegistryEntry {
            index,
            name: n.name.clone(),
            kind: n.kind,
            degree: topology.degree(crate::topology::NodeId(index)),
        })
        .collect();
    let registry_path = output_dir.join("node_registry.json");
    let registry_json =
        serde_json::to_string_pretty(&registry).wrap_err("Failed to serialize node registry")?;
    fs::write(&registry_path, registry_json)
        .wrap_err_with(|| format!("Failed to write '{}'", registry_path.display()))?;

    log::info!(
        "Generated engine document at {:?} ({} nodes, {} links)",
        document_path,
        topology.nodes().len(),
        topology.links().len()
    );

    Ok(document_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{five_five_topology, LinkParams, Topology};
    use std::time::Duration;

    #[test]
    fn test_render_five_five() {
        let doc = EngineDocument::render(&five_five_topology(), "info");
        let yaml = doc.to_yaml().unwrap();

        assert!(yaml.contains("log_level: info"));
        for name in ["h1", "h2", "h3", "h4", "h5", "s1", "s2", "s3", "s4", "s5"] {
            assert!(yaml.contains(name), "missing node {name}");
        }
        // Default link parameters stay out of the document
        assert!(!yaml.contains("bandwidth_mbit"));
        assert!(!yaml.contains("delay"));
    }

    #[test]
    fn test_render_includes_set_link_params() {
        let mut topo = Topology::new();
        let s1 = topo.add_switch("s1");
        let s2 = topo.add_switch("s2");
        topo.add_link_with(
            s1,
            s2,
            LinkParams {
                bandwidth_mbit: Some(100.0),
                delay: Some(Duration::from_millis(2)),
                loss_percent: Some(0.5),
                max_queue: Some(1000),
            },
        );

        let yaml = EngineDocument::render(&topo, "info").to_yaml().unwrap();
        assert!(yaml.contains("bandwidth_mbit: 100.0"));
        assert!(yaml.contains("delay: 2ms"));
        assert!(yaml.contains("loss_percent: 0.5"));
        assert!(yaml.contains("max_queue: 1000"));
    }

    #[test]
    fn test_dangling_handle_passes_through() {
        let mut incomplete = Topology::new();
        let s1 = incomplete.add_switch("s1");

        let mut other = Topology::new();
        let _ = other.add_switch("x1");
        let x2 = other.add_switch("x2");

        // Handle from a different topology: emitted raw, engine rejects it
        incomplete.add_link(s1, x2);
        let yaml = EngineDocument::render(&incomplete, "info").to_yaml().unwrap();
        assert!(yaml.contains("'#1'") || yaml.contains("\"#1\""), "got: {yaml}");
    }

    #[test]
    fn test_write_engine_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_engine_document(&five_five_topology(), "info", dir.path()).unwrap();

        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "network.yaml");
        assert!(dir.path().join("node_registry.json").exists());

        let registry: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("node_registry.json")).unwrap())
                .unwrap();
        assert_eq!(registry.as_array().unwrap().len(), 10);
        assert_eq!(registry[0]["name"], "h1");
        assert_eq!(registry[0]["kind"], "host");
        assert_eq!(registry[0]["degree"], 1);
    }
}
