use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use netlab::config::Config;
use netlab::engine::ProcessEngine;
use netlab::session::Session;
use netlab::topology::five_five_topology;

/// Topology descriptor and session runner for network emulation labs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the runner configuration YAML file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the generated engine document and node registry
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the engine command from the configuration
    #[arg(long)]
    engine: Option<String>,

    /// Skip the interactive shell: build, start, stop
    #[arg(long)]
    no_cli: bool,

    /// Write the engine document and exit without launching the engine
    #[arg(long)]
    dump_only: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting NetLab session runner");

    // Load runner configuration, falling back to defaults
    let mut config = match &args.config {
        Some(path) => {
            info!("Configuration file: {:?}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };
    if let Some(output) = &args.output {
        config.output.directory = output.to_string_lossy().to_string();
    }
    if let Some(engine) = &args.engine {
        config.engine.command = engine.clone();
    }
    config.validate()?;
    info!("Output directory: {}", config.output.directory);
    info!("Engine command: {}", config.engine.command);

    // Clean up artifacts from a previous session
    let output_dir = PathBuf::from(&config.output.directory);
    if output_dir.exists() && output_dir != Path::new(".") {
        fs::remove_dir_all(&output_dir).wrap_err_with(|| {
            format!("Failed to remove output directory '{}'", output_dir.display())
        })?;
    }

    // Declare the lab topology
    let topology = five_five_topology();
    info!(
        "Declared topology: {} hosts, {} switches, {} links",
        topology.host_count(),
        topology.switch_count(),
        topology.links().len()
    );

    if args.dump_only {
        let path = netlab::engine::write_engine_document(
            &topology,
            &config.general.log_level,
            &output_dir,
        )?;
        info!("Engine document written to {:?}, not launching engine", path);
        return Ok(());
    }

    // Run the session: build, start, shell (unless suppressed), stop
    let engine = ProcessEngine::new(config);
    let mut session = Session::new(engine, topology);
    session.run(!args.no_cli)?;

    info!("Session completed successfully");
    Ok(())
}
