//! Process-backed emulation engine.
//!
//! Drives an external engine binary: `build` writes the engine document,
//! `start` spawns the engine on it with its stdin piped, `interact`
//! forwards operator lines into that stdin, and `stop` sends the engine's
//! quit command and reaps the process. Engine failures surface as errors
//! with no recovery policy on top.

use crate::config::Config;
use crate::engine::emit::write_engine_document;
use crate::engine::EmulationEngine;
use crate::topology::Topology;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Emulation engine backed by a spawned external process.
pub struct ProcessEngine {
    config: Config,
    document_path: Option<PathBuf>,
    child: Option<Child>,
}

impl ProcessEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            document_path: None,
            child: None,
        }
    }

    /// Path of the generated engine document, once built.
    pub fn document_path(&self) -> Option<&PathBuf> {
        self.document_path.as_ref()
    }

    fn running_child(&mut self) -> Result<&mut Child> {
        self.child
            .as_mut()
            .ok_or_else(|| eyre!("Engine process is not running"))
    }
}

impl EmulationEngine for ProcessEngine {
    fn build(&mut self, topology: &Topology) -> Result<()> {
        let output_dir = PathBuf::from(&self.config.output.directory);
        let path =
            write_engine_document(topology, &self.config.general.log_level, &output_dir)?;
        self.document_path = Some(path);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let document_path = self
            .document_path
            .clone()
            .ok_or_else(|| eyre!("No engine document generated; build first"))?;

        info!(
            "Starting engine: {} {:?} {:?}",
            self.config.engine.command, self.config.engine.args, document_path
        );
        let child = Command::new(&self.config.engine.command)
            .args(&self.config.engine.args)
            .arg(&document_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .wrap_err_with(|| {
                format!(
                    "Failed to launch engine command '{}'",
                    self.config.engine.command
                )
            })?;

        self.child = Some(child);
        Ok(())
    }

    fn interact(&mut self) -> Result<()> {
        let quit_command = self.config.engine.quit_command.clone();
        let child = self.running_child()?;
        let child_stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| eyre!("Engine process has no stdin handle"))?;

        info!("Opening interactive shell (type '{}' to leave)", quit_command);
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.wrap_err("Failed to read operator input")?;
            if writeln!(child_stdin, "{}", line).is_err() {
                // Engine went away mid-session; stop() reports its status
                warn!("Engine closed its input; leaving interactive shell");
                break;
            }
            child_stdin
                .flush()
                .wrap_err("Failed to forward operator input to engine")?;
            if line.trim() == quit_command {
                break;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let quit_command = self.config.engine.quit_command.clone();
        let mut child = self
            .child
            .take()
            .ok_or_else(|| eyre!("Engine process is not running"))?;

        // Closing stdin after the quit command is the engine's teardown
        // signal; a write failure just means it already exited.
        if let Some(mut child_stdin) = child.stdin.take() {
            let _ = writeln!(child_stdin, "{}", quit_command);
            let _ = child_stdin.flush();
        }

        let status = match child.wait() {
            Ok(status) => status,
            Err(err) => {
                child.kill().ok();
                child.wait().ok();
                return Err(err).wrap_err("Failed to wait for engine process");
            }
        };

        if status.success() {
            info!("Engine stopped cleanly");
            Ok(())
        } else {
            Err(eyre!("Engine exited with status {}", status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::five_five_topology;

    fn test_config(dir: &std::path::Path, command: &str) -> Config {
        let mut config = Config::default();
        config.output.directory = dir.to_string_lossy().to_string();
        config.engine.command = command.to_string();
        config
    }

    #[test]
    fn test_build_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = ProcessEngine::new(test_config(dir.path(), "true"));

        engine.build(&five_five_topology()).unwrap();
        let path = engine.document_path().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_start_without_build_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = ProcessEngine::new(test_config(dir.path(), "true"));
        assert!(engine.start().is_err());
    }

    #[test]
    fn test_start_stop_without_shell_releases_process() {
        // `cat` exits cleanly when its stdin is closed, standing in for an
        // engine that tears down on quit.
        let dir = tempfile::tempdir().unwrap();
        let mut engine = ProcessEngine::new(test_config(dir.path(), "cat"));

        engine.build(&five_five_topology()).unwrap();
        engine.start().unwrap();
        engine.stop().unwrap();
        assert!(engine.child.is_none());
    }

    #[test]
    fn test_stop_reports_engine_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path(), "false");
        config.engine.args = vec![];
        let mut engine = ProcessEngine::new(config);

        engine.build(&five_five_topology()).unwrap();
        engine.start().unwrap();
        assert!(engine.stop().is_err());
    }

    #[test]
    fn test_missing_engine_binary_fails_on_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine =
            ProcessEngine::new(test_config(dir.path(), "definitely-not-a-real-engine"));

        engine.build(&five_five_topology()).unwrap();
        assert!(engine.start().is_err());
    }
}
