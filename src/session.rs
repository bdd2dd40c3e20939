//! Session runner.
//!
//! Drives an emulation engine through the fixed lifecycle
//! `Unbuilt → Built → Running → Stopped`. The machine is strictly linear:
//! each operation is permitted in exactly one state, out-of-order calls
//! fail with a typed error, and there is no retry or partial-failure
//! handling: the first engine error propagates.

use crate::engine::EmulationEngine;
use crate::topology::Topology;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};

/// Lifecycle states of an emulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unbuilt,
    Built,
    Running,
    Stopped,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Unbuilt => "unbuilt",
            SessionState::Built => "built",
            SessionState::Running => "running",
            SessionState::Stopped => "stopped",
        }
    }
}

/// Session lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {operation} while session is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
}

/// One emulation session: a topology, an engine, and the current
/// lifecycle state. The session owns the emulated resources exclusively
/// from start until stop.
pub struct Session<E: EmulationEngine> {
    engine: E,
    topology: Topology,
    state: SessionState,
}

impl<E: EmulationEngine> Session<E> {
    pub fn new(engine: E, topology: Topology) -> Self {
        Self {
            engine,
            topology,
            state: SessionState::Unbuilt,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    fn expect_state(&self, operation: &'static str, expected: SessionState) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::InvalidTransition {
                operation,
                state: self.state.name(),
            });
        }
        Ok(())
    }

    /// Materialize the engine configuration from the topology.
    pub fn build(&mut self) -> Result<()> {
        self.expect_state("build", SessionState::Unbuilt)?;
        self.engine
            .build(&self.topology)
            .wrap_err("Engine failed to build the network")?;
        self.state = SessionState::Built;
        Ok(())
    }

    /// Bring up the emulated network.
    pub fn start(&mut self) -> Result<()> {
        self.expect_state("start", SessionState::Built)?;
        self.engine
            .start()
            .wrap_err("Engine failed to start the network")?;
        self.state = SessionState::Running;
        Ok(())
    }

    /// Block in the engine's interactive shell until the operator leaves
    /// it. The session stays running; `stop` is still required.
    pub fn interact(&mut self) -> Result<()> {
        self.expect_state("interact", SessionState::Running)?;
        self.engine
            .interact()
            .wrap_err("Interactive session failed")
    }

    /// Tear down all emulated resources.
    pub fn stop(&mut self) -> Result<()> {
        self.expect_state("stop", SessionState::Running)?;
        self.engine
            .stop()
            .wrap_err("Engine failed to stop the network")?;
        self.state = SessionState::Stopped;
        Ok(())
    }

    /// Run the whole lifecycle: build, start, optionally the interactive
    /// shell, stop. After a start or shell failure a best-effort stop runs
    /// so virtual resources are not left dangling, then the original error
    /// is returned.
    pub fn run(&mut self, interactive: bool) -> Result<()> {
        self.build()?;
        info!(
            "Built network: {} hosts, {} switches, {} links",
            self.topology.host_count(),
            self.topology.switch_count(),
            self.topology.links().len()
        );

        if let Err(start_err) = self.start() {
            // Start may have brought resources partway up before failing;
            // ask the engine to release them and keep the original error.
            if let Err(stop_err) = self.engine.stop() {
                warn!("Teardown after failed start also failed: {:#}", stop_err);
            }
            return Err(start_err);
        }
        info!("Network is up");

        let shell_result = if interactive {
            self.interact()
        } else {
            Ok(())
        };

        if let Err(session_err) = &shell_result {
            warn!("Interactive session ended with error: {:#}", session_err);
        }

        match self.stop() {
            Ok(()) => {
                info!("Network stopped");
                shell_result
            }
            Err(stop_err) => match shell_result {
                // Keep the first failure; the stop failure is logged
                Err(session_err) => {
                    warn!("Teardown also failed: {:#}", stop_err);
                    Err(session_err)
                }
                Ok(()) => Err(stop_err),
            },
        }
    }
}
