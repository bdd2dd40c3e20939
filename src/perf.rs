//! Stop-and-wait TCP throughput probe.
//!
//! Measurement companion for hosts inside the emulated network. One side
//! runs as a server, the other as a client; they first estimate the RTT
//! with eight one-byte exchanges, then push fixed 80 KB chunks with a
//! one-byte ack after each. Reported throughput subtracts the
//! stop-and-wait overhead (one RTT per chunk) from the wall time.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Instant;

/// Size of one data chunk (80 KB).
pub const CHUNK_SIZE: usize = 80_000;

/// Round trips in the RTT phase; the client times 8, the server sees 7
/// inter-arrival gaps.
pub const RTT_EXCHANGES: usize = 8;

const PROBE_BYTE: u8 = b'M';
const ACK_BYTE: u8 = b'A';

/// Result of one measurement run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Payload bytes moved in the data phase (full chunks only)
    pub total_bytes: u64,
    /// Throughput in Mbit/s after RTT-overhead correction
    pub rate_mbps: f64,
    /// Average RTT in whole milliseconds
    pub rtt_ms: u64,
}

/// Average of the last four samples (or all of them when fewer), in the
/// samples' own unit. Zero when there are none.
pub fn average_last_four(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let start = samples.len().saturating_sub(4);
    let tail = &samples[start..];
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Throughput in Mbit/s with the stop-and-wait overhead removed: each
/// chunk is assumed to have cost one average RTT of waiting. Falls back
/// to the uncorrected wall time when the correction goes negative.
pub fn corrected_rate_mbps(
    total_bytes: u64,
    wall_seconds: f64,
    chunks: u64,
    avg_rtt_seconds: f64,
) -> f64 {
    let mut net_seconds = wall_seconds - chunks as f64 * avg_rtt_seconds;
    if net_seconds < 0.0 {
        net_seconds = wall_seconds;
    }
    if net_seconds > 0.0 {
        (total_bytes as f64 * 8.0 / net_seconds) / 1e6
    } else {
        0.0
    }
}

/// Summary line in the probe's fixed format, e.g.
/// `Sent=4000 KB, Rate=9.512 Mbps, RTT=3ms`.
pub fn format_summary(direction: &str, summary: &Summary) -> String {
    format!(
        "{}={} KB, Rate={:.3} Mbps, RTT={}ms",
        direction,
        summary.total_bytes / 1000,
        summary.rate_mbps,
        summary.rtt_ms
    )
}

/// Serve one measurement session on `port` and report what was received.
pub fn run_server(port: u16) -> Result<Summary> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .wrap_err_with(|| format!("Failed to bind to port {port}"))?;
    serve_on(listener)
}

/// Serve one measurement session on an already-bound listener.
pub fn serve_on(listener: TcpListener) -> Result<Summary> {
    info!("iPerfer server started");

    let (mut stream, peer) = listener
        .accept()
        .wrap_err("Failed to accept client connection")?;
    info!("Client connected from {peer}");
    drop(listener);

    // RTT phase: the gap between sending one ack and receiving the next
    // probe is one round trip. The first probe has no preceding ack.
    let mut rtt_samples = Vec::with_capacity(RTT_EXCHANGES - 1);
    let mut last_ack_sent: Option<Instant> = None;
    let mut probe = [0u8; 1];
    for _ in 0..RTT_EXCHANGES {
        stream
            .read_exact(&mut probe)
            .wrap_err("RTT measurement: receive failed")?;
        if let Some(sent_at) = last_ack_sent {
            rtt_samples.push(sent_at.elapsed().as_secs_f64() * 1e3);
        }
        stream
            .write_all(&[ACK_BYTE])
            .wrap_err("RTT measurement: ack send failed")?;
        last_ack_sent = Some(Instant::now());
    }
    let avg_rtt_ms = average_last_four(&rtt_samples);

    // Data phase: exact 80 KB chunks until the client closes. A trailing
    // partial chunk is discarded, matching the stop-and-wait contract.
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut total_bytes: u64 = 0;
    let mut chunks: u64 = 0;
    let data_start = Instant::now();
    loop {
        if stream.read_exact(&mut chunk).is_err() {
            break;
        }
        total_bytes += CHUNK_SIZE as u64;
        chunks += 1;
        if stream.write_all(&[ACK_BYTE]).is_err() {
            break;
        }
    }
    let wall_seconds = data_start.elapsed().as_secs_f64();

    let summary = Summary {
        total_bytes,
        rate_mbps: corrected_rate_mbps(total_bytes, wall_seconds, chunks, avg_rtt_ms / 1e3),
        rtt_ms: avg_rtt_ms.round() as u64,
    };
    info!("{}", format_summary("Received", &summary));
    Ok(summary)
}

/// Run a measurement against `host:port` for `duration_seconds` and
/// report what was sent.
pub fn run_client(host: &str, port: u16, duration_seconds: f64) -> Result<Summary> {
    let mut stream = TcpStream::connect((host, port))
        .wrap_err_with(|| format!("Could not connect to {host}:{port}"))?;

    // RTT phase: eight timed probe/ack round trips
    let mut rtt_samples = Vec::with_capacity(RTT_EXCHANGES);
    let mut ack = [0u8; 1];
    for _ in 0..RTT_EXCHANGES {
        let sent_at = Instant::now();
        stream
            .write_all(&[PROBE_BYTE])
            .wrap_err("RTT measurement: send failed")?;
        stream
            .read_exact(&mut ack)
            .wrap_err("RTT measurement: ack receive failed")?;
        rtt_samples.push(sent_at.elapsed().as_secs_f64() * 1e3);
    }
    let avg_rtt_ms = average_last_four(&rtt_samples);

    // Data phase: stop-and-wait 80 KB chunks for the requested duration
    let chunk = vec![0u8; CHUNK_SIZE];
    let mut total_bytes: u64 = 0;
    let mut chunks: u64 = 0;
    let data_start = Instant::now();
    while data_start.elapsed().as_secs_f64() < duration_seconds {
        stream
            .write_all(&chunk)
            .wrap_err("Data transfer: send failed")?;
        total_bytes += CHUNK_SIZE as u64;
        chunks += 1;
        stream
            .read_exact(&mut ack)
            .wrap_err("Data transfer: ack receive failed (server closed?)")?;
    }
    let wall_seconds = data_start.elapsed().as_secs_f64();
    drop(stream);

    let summary = Summary {
        total_bytes,
        rate_mbps: corrected_rate_mbps(total_bytes, wall_seconds, chunks, avg_rtt_ms / 1e3),
        rtt_ms: avg_rtt_ms.round() as u64,
    };
    info!("{}", format_summary("Sent", &summary));
    Ok(summary)
}
