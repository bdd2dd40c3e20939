//! # NetLab - Topology descriptor and session runner for network emulation labs
//!
//! This library declares a fixed five-host, five-switch network topology,
//! renders it into the declarative document an external network-emulation
//! engine consumes, and drives that engine through one interactive session.
//!
//! ## Overview
//!
//! All actual packet forwarding, virtual interface creation, and namespace
//! isolation happen inside the external engine. NetLab's job is the
//! declaration and the lifecycle: build the graph, hand it over, open the
//! engine's shell for the operator, and tear everything down on exit. No
//! validation is performed locally; engine errors propagate and end the
//! session.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `topology`: node/link types, the graph builder, and the fixed lab graph
//! - `engine`: the `EmulationEngine` seam, document emission, and the
//!   process-backed engine implementation
//! - `session`: the linear `Unbuilt → Built → Running → Stopped` lifecycle
//! - `config`: runner configuration (engine command, output paths, logging)
//! - `perf`: stop-and-wait TCP throughput probe for hosts inside the network
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use netlab::config::Config;
//! use netlab::engine::ProcessEngine;
//! use netlab::session::Session;
//! use netlab::topology::five_five_topology;
//!
//! let config = Config::default();
//! let engine = ProcessEngine::new(config);
//! let mut session = Session::new(engine, five_five_topology());
//!
//! // Build, start, interactive shell, stop
//! session.run(true)?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! The library uses `color_eyre` for error reporting with context and
//! `thiserror` enums for typed configuration and lifecycle errors. There is
//! no recovery policy: the first engine failure terminates the session.

pub mod config;
pub mod engine;
pub mod perf;
pub mod session;
pub mod topology;
