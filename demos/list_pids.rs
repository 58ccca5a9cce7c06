use clap::Parser;
use std::{collections::BTreeMap, process::ExitCode};
use tracing::{debug, error, info};
use ts_packets::errors::Result;
use ts_packets::{DecodeMode, OpenMode, TSPacket, TSReader};

#[derive(Parser, Debug)]
#[command(version, about = "List the PIDs in a transport stream file", long_about = None)]
struct Args {
    /// Transport stream file to scan
    #[arg(short, long)]
    path: String,

    /// Only count packets with these PIDs
    #[arg(long, value_parser = parse_pid)]
    pid: Vec<u16>,

    /// Skip constraint checks when decoding headers
    #[arg(long)]
    forgiving: bool,
}

fn parse_pid(text: &str) -> std::result::Result<u16, String> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::init();

    let mode = if args.forgiving {
        DecodeMode::Forgiving
    } else {
        DecodeMode::Validating
    };

    let mut reader = match TSReader::open(&args.path, OpenMode::Read) {
        Ok(reader) => reader,
        Err(e) => {
            error!("Could not open {}: {}", args.path, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Scanning {}", reader);

    // PID -> (packets, packets that failed to decode)
    let mut pids: BTreeMap<u16, (u64, u64)> = BTreeMap::new();
    let packets: Box<dyn Iterator<Item = Result<TSPacket>> + '_> = if args.pid.is_empty() {
        Box::new(reader.packets())
    } else {
        Box::new(reader.filtered(args.pid.iter().copied()))
    };

    for packet in packets {
        let packet = match packet {
            Ok(packet) => packet,
            Err(e) => {
                error!("Stopped reading: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let entry = pids.entry(packet.pid()).or_default();
        entry.0 += 1;
        if let Err(e) = packet.decode(mode) {
            debug!("{}: {}", packet, e);
            entry.1 += 1;
        }
    }

    println!("PIDs in video file [{}]:", args.path);
    for (pid, (count, bad)) in pids {
        println!("{:#06x}: {} packets, {} failed to decode", pid, count, bad);
    }

    ExitCode::SUCCESS
}
