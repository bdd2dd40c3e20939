//! iPerfer: stop-and-wait TCP throughput probe.
//!
//! Thin CLI over `netlab::perf`, meant to run on hosts inside the
//! emulated network. One side runs `-s`, the other `-c`.

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use env_logger::Env;

/// Stop-and-wait TCP throughput probe for emulated networks
///
/// `-h` is the server hostname, so help is long-form only.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Args {
    /// Run in server mode
    #[arg(short = 's', long, conflicts_with = "client")]
    server: bool,

    /// Run in client mode
    #[arg(short = 'c', long)]
    client: bool,

    /// Server hostname (client mode only)
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// Port number (1024 <= port <= 65535)
    #[arg(short, long)]
    port: u16,

    /// Duration in seconds (client mode only, must be > 0)
    #[arg(short, long)]
    time: Option<f64>,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if args.port < 1024 {
        return Err(eyre!("port number must be in the range of [1024, 65535]"));
    }

    if args.server {
        if args.host.is_some() || args.time.is_some() {
            return Err(eyre!("extra arguments provided in server mode"));
        }
        netlab::perf::run_server(args.port)?;
        return Ok(());
    }

    if args.client {
        let host = args
            .host
            .ok_or_else(|| eyre!("missing required --host argument in client mode"))?;
        let time = args
            .time
            .ok_or_else(|| eyre!("missing required --time argument in client mode"))?;
        if time <= 0.0 {
            return Err(eyre!("time argument must be greater than 0"));
        }
        netlab::perf::run_client(&host, args.port, time)?;
        return Ok(());
    }

    Err(eyre!("one of --server or --client is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_args() {
        let args = Args::parse_from(["iperfer", "-s", "-p", "5201"]);
        assert!(args.server);
        assert!(!args.client);
        assert_eq!(args.port, 5201);
    }

    #[test]
    fn test_client_args() {
        // The canonical invocation: iperfer -c -h <host> -p <port> -t <seconds>
        let args = Args::parse_from([
            "iperfer", "-c", "-h", "h5", "-p", "5201", "-t", "10",
        ]);
        assert!(args.client);
        assert_eq!(args.host.as_deref(), Some("h5"));
        assert_eq!(args.port, 5201);
        assert_eq!(args.time, Some(10.0));
    }

    #[test]
    fn test_short_h_is_host_and_help_is_long_only() {
        let args = Args::try_parse_from(["iperfer", "-c", "-h", "h5", "-p", "5201", "-t", "10"])
            .expect("-h must bind to --host, not help");
        assert_eq!(args.host.as_deref(), Some("h5"));

        let err = Args::try_parse_from(["iperfer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_server_and_client_conflict() {
        assert!(Args::try_parse_from(["iperfer", "-s", "-c", "-p", "5201"]).is_err());
    }

    #[test]
    fn test_port_is_required() {
        assert!(Args::try_parse_from(["iperfer", "-s"]).is_err());
    }
}
