//! Subcommand implementations

use bfd_core::{BfdState, Result};
use bfd_packet::{
    random_discriminator, BfdControlPacket, ControlHeader, DecodeStats, DecoderConfig,
    PacketDecoder,
};
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info, warn, Level};

use crate::args::parse_params;

/// Options for the encode subcommand
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub my_disc: Option<u32>,
    pub your_disc: u32,
    pub state: BfdState,
    pub diag: u8,
    pub detect_mult: u8,
    pub tx: u32,
    pub rx: u32,
    pub echo_rx: u32,
    pub poll: bool,
    pub final_bit: bool,
}

/// Parse a hex datagram, ignoring whitespace, `:` separators and one `0x`/`0X` prefix
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let cleaned: String = digits
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    Ok(hex::decode(cleaned)?)
}

/// Decode every datagram, printing one line per packet.
///
/// Rejected datagrams are reported and skipped; the returned statistics tell
/// the caller whether any were rejected.
pub fn run_decode(
    packets: &[String],
    file: Option<&Path>,
    source: SocketAddr,
    params: &[String],
) -> Result<DecodeStats> {
    let config = DecoderConfig::from_params(&parse_params(params)?)?;
    debug!("Decoder configuration: {:?}", config);
    let decoder = PacketDecoder::with_config(config);

    let datagrams = match file {
        Some(path) => {
            info!("Reading datagram from {}", path.display());
            vec![std::fs::read(path)?]
        }
        None => packets
            .iter()
            .map(|p| parse_hex(p))
            .collect::<Result<Vec<_>>>()?,
    };

    for (index, data) in datagrams.iter().enumerate() {
        match decoder.decode(data, source) {
            Ok(packet) => println!("[{}] {}", index, format_packet(&packet)),
            Err(err) => {
                warn!("Datagram {} rejected ({}): {}", index, err.kind(), err);
                println!("[{}] rejected: {}", index, err);
            }
        }
    }

    let stats = decoder.stats();
    info!(
        "Decoded {} datagrams: {} accepted, {} rejected",
        stats.packets_received, stats.packets_accepted, stats.packets_rejected
    );
    Ok(stats)
}

/// Map `-v` occurrences to the maximum log level
pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Process exit status for a decode run: 0 when every datagram was
/// accepted, 1 when any was rejected, 2 when the run could not start
pub fn decode_exit_status(outcome: &Result<DecodeStats>) -> u8 {
    match outcome {
        Ok(stats) if stats.packets_rejected == 0 => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

/// [`decode_exit_status`] as an [`ExitCode`]
pub fn decode_exit_code(outcome: &Result<DecodeStats>) -> ExitCode {
    ExitCode::from(decode_exit_status(outcome))
}

/// Build the header described by `opts` and return its hex encoding
pub fn run_encode(opts: &EncodeOptions) -> String {
    let my_disc = opts.my_disc.unwrap_or_else(|| {
        let disc = random_discriminator();
        debug!("Generated discriminator {:#010x}", disc);
        disc
    });

    let header = ControlHeader::new(my_disc, opts.your_disc)
        .with_state(opts.state)
        .with_raw_diagnostic(opts.diag)
        .with_detect_mult(opts.detect_mult)
        .with_intervals(opts.tx, opts.rx)
        .with_echo_interval(opts.echo_rx)
        .with_poll(opts.poll)
        .with_final(opts.final_bit);

    hex::encode(header.to_bytes())
}

/// One-line human readable rendering of a decoded packet
pub fn format_packet<S: std::fmt::Display>(packet: &BfdControlPacket<S>) -> String {
    let mut out = format!(
        "from {} v{} state={} diag={}",
        packet.source(),
        packet.version(),
        packet.state(),
        packet.diagnostic()
    );
    if let Some(kind) = packet.diagnostic_kind() {
        let _ = write!(out, " ({})", kind);
    }

    let flags: Vec<&str> = [
        (packet.poll(), "P"),
        (packet.final_bit(), "F"),
        (packet.control_plane_independent(), "C"),
        (packet.authentication_present(), "A"),
        (packet.demand_mode(), "D"),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .map(|(_, name)| *name)
    .collect();
    if !flags.is_empty() {
        let _ = write!(out, " flags={}", flags.join(""));
    }

    let _ = write!(
        out,
        " mult={} len={} my={:#010x} your={:#010x} tx={}us rx={}us echo={}us",
        packet.detect_mult(),
        packet.length(),
        packet.my_discriminator(),
        packet.your_discriminator(),
        packet.desired_min_tx_interval(),
        packet.required_min_rx_interval(),
        packet.required_min_echo_rx_interval()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfd_core::Error;

    fn peer() -> SocketAddr {
        "192.0.2.9:3784".parse().unwrap()
    }

    fn options() -> EncodeOptions {
        EncodeOptions {
            my_disc: Some(1),
            your_disc: 0,
            state: BfdState::Down,
            diag: 0,
            detect_mult: 5,
            tx: 500_000,
            rx: 500_000,
            echo_rx: 500_000,
            poll: false,
            final_bit: false,
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x2040").unwrap(), vec![0x20, 0x40]);
        assert_eq!(parse_hex(" 20 40 05 ").unwrap(), vec![0x20, 0x40, 0x05]);
        assert_eq!(parse_hex("20:40").unwrap(), vec![0x20, 0x40]);
        assert_eq!(parse_hex("0X2040").unwrap(), vec![0x20, 0x40]);
        assert!(matches!(parse_hex("2g"), Err(Error::Hex(_))));
        assert!(matches!(parse_hex("0x0x2040"), Err(Error::Hex(_))));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(1), Level::INFO);
        assert_eq!(log_level(2), Level::DEBUG);
        assert_eq!(log_level(3), Level::TRACE);
        assert_eq!(log_level(u8::MAX), Level::TRACE);
    }

    #[test]
    fn test_decode_exit_status() {
        let accepted = vec![run_encode(&options())];
        let outcome = run_decode(&accepted, None, peer(), &[]);
        assert_eq!(decode_exit_status(&outcome), 0);

        let mixed = vec![run_encode(&options()), "fd0200bb81002d".to_string()];
        let outcome = run_decode(&mixed, None, peer(), &[]);
        assert_eq!(decode_exit_status(&outcome), 1);

        let outcome = run_decode(&accepted, None, peer(), &["bogus=1".to_string()]);
        assert_eq!(decode_exit_status(&outcome), 2);

        let outcome = run_decode(&["zz".to_string()], None, peer(), &[]);
        assert_eq!(decode_exit_status(&outcome), 2);
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            run_encode(&options()),
            "204005180000000100000000\
             0007a1200007a1200007a120"
        );
    }

    #[test]
    fn test_encode_random_discriminator() {
        let opts = EncodeOptions {
            my_disc: None,
            ..options()
        };
        let bytes = parse_hex(&run_encode(&opts)).unwrap();
        let packet = BfdControlPacket::decode(&bytes, peer()).unwrap();
        assert_ne!(packet.my_discriminator(), 0);
    }

    #[test]
    fn test_decode_counts_rejections() {
        let packets = vec![
            run_encode(&options()),
            "fd0200bb81002d".to_string(),
            run_encode(&EncodeOptions {
                state: BfdState::Up,
                ..options()
            }),
        ];

        let stats = run_decode(&packets, None, peer(), &[]).unwrap();
        assert_eq!(stats.packets_received, 3);
        assert_eq!(stats.packets_accepted, 1);
        assert_eq!(stats.rejected("below_minimum_size"), 1);
        assert_eq!(stats.rejected("zero_your_discriminator"), 1);
    }

    #[test]
    fn test_decode_params() {
        let packets = vec![run_encode(&EncodeOptions {
            detect_mult: 0,
            ..options()
        })];

        let stats = run_decode(&packets, None, peer(), &[]).unwrap();
        assert_eq!(stats.packets_accepted, 1);

        let strict = vec!["reject_zero_detect_mult=true".to_string()];
        let stats = run_decode(&packets, None, peer(), &strict).unwrap();
        assert_eq!(stats.rejected("zero_detect_mult"), 1);

        let unknown = vec!["bogus=1".to_string()];
        assert!(run_decode(&packets, None, peer(), &unknown).is_err());
    }

    #[test]
    fn test_decode_missing_file() {
        let err = run_decode(&[], Some(Path::new("/nonexistent/bfd.bin")), peer(), &[])
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_format_packet() {
        let bytes = ControlHeader::new(0x10, 0x20)
            .with_state(BfdState::Up)
            .with_raw_diagnostic(3)
            .with_poll(true)
            .to_bytes();
        let packet = BfdControlPacket::decode(&bytes, peer()).unwrap();
        let line = format_packet(&packet);

        assert!(line.starts_with("from 192.0.2.9:3784 v1 state=Up diag=3"));
        assert!(line.contains("(Neighbor Signaled Session Down)"));
        assert!(line.contains("flags=P "));
        assert!(line.contains("my=0x00000010 your=0x00000020"));
    }
}
