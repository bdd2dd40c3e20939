//! Emulation engine interface.
//!
//! The engine is external: it owns packet forwarding, virtual interface
//! creation, and namespace isolation. This module defines the seam the
//! session runner drives, four lifecycle operations over a declarative
//! topology, plus the production implementation backed by a spawned
//! engine process.

pub mod emit;
pub mod process;

use crate::topology::Topology;
use color_eyre::Result;

pub use emit::{write_engine_document, EngineDocument};
pub use process::ProcessEngine;

/// Seam to the external network-emulation engine.
///
/// Implementations report failures through engine-defined errors; no
/// recovery policy is layered on top. The session runner guarantees the
/// calls arrive in lifecycle order.
pub trait EmulationEngine {
    /// Materialize the declarative configuration. Creates no virtual
    /// resources yet.
    fn build(&mut self, topology: &Topology) -> Result<()>;

    /// Bring up the emulated network: virtual interfaces, addressing.
    fn start(&mut self) -> Result<()>;

    /// Present the engine's interactive command shell to the operator.
    /// Blocks until the operator leaves the shell.
    fn interact(&mut self) -> Result<()>;

    /// Tear down all emulated resources.
    fn stop(&mut self) -> Result<()>;
}
