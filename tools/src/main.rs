use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use codec::{DatagramDecoder, DecoderConfig, EvictionPolicy};
use glob::Pattern;
use photon_tools::{decode_record, format_decode_pretty, inspect_datagram, InspectReport};

#[derive(Parser)]
#[command(
    name = "photon-tools",
    version,
    about = "Photon datagram inspection and decoding tools"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the peer header and command table of captured frames.
    Inspect {
        /// Capture file, or a directory of captures.
        path: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Decode captured frames into messages.
    Decode {
        /// Capture file, or a directory of captures decoded in name order.
        path: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Skip commands whose declared length is outside 0-666.
        #[arg(long)]
        legacy_filter: bool,
        /// Keep incomplete fragments forever.
        #[arg(long)]
        no_eviction: bool,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Glob filter applied to file names when `path` is a directory.
    #[arg(long)]
    glob: Option<String>,
    /// Bytes of link-layer header in front of each UDP payload.
    #[arg(long, default_value_t = wire::DEFAULT_LINK_HEADER_LEN)]
    link_header_len: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Inspect {
            path,
            input,
            format,
        } => {
            let config = DecoderConfig::default().with_link_header_len(input.link_header_len);
            for file in collect_inputs(&path, input.glob.as_deref())? {
                let frame = read_capture(&file)?;
                let payload = wire::strip_link_header(&frame, &config.framing)
                    .with_context(|| format!("strip link header of {}", file.display()))?;
                let report = inspect_datagram(payload, &config.framing)
                    .with_context(|| format!("inspect {}", file.display()))?;
                match format {
                    Format::Json => {
                        let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                        println!("{json}");
                    }
                    Format::Pretty => {
                        println!("== {} ({} bytes) ==", file.display(), frame.len());
                        print_inspect_report(&report);
                    }
                }
            }
        }
        Command::Decode {
            path,
            input,
            format,
            legacy_filter,
            no_eviction,
        } => {
            let mut config = if legacy_filter {
                DecoderConfig::legacy()
            } else {
                DecoderConfig::default()
            };
            config = config.with_link_header_len(input.link_header_len);
            if no_eviction {
                config = config.with_eviction(EvictionPolicy::unbounded());
            }

            let registry = game::registry().context("build registry")?;
            let mut decoder = DatagramDecoder::new(registry, config);
            let mut records = Vec::new();
            for file in collect_inputs(&path, input.glob.as_deref())? {
                let frame = read_capture(&file)?;
                records.push(decode_record(
                    &mut decoder,
                    file.display().to_string(),
                    &frame,
                ));
            }
            if decoder.pending_fragments() > 0 {
                log::info!(
                    "{} fragmented messages still incomplete",
                    decoder.pending_fragments()
                );
            }

            match format {
                Format::Json => {
                    let json = serde_json::to_string_pretty(&records).context("serialize json")?;
                    println!("{json}");
                }
                Format::Pretty => print!("{}", format_decode_pretty(&records)),
            }
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

fn read_capture(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read capture {}", path.display()))
}

/// A single file, or the matching files of a directory sorted by name.
fn collect_inputs(path: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("read dir {}", path.display()))? {
        let file = entry?.path();
        if !file.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&file);
            let matches_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        files.push(file);
    }
    files.sort();
    Ok(files)
}

fn print_inspect_report(report: &InspectReport) {
    let header = report.header;
    println!(
        "peer: {} flags: 0x{:02x} commands: {} timestamp: {} challenge: 0x{:08x}",
        header.peer_id, header.flags, header.command_count, header.timestamp, header.challenge
    );
    println!("commands:");
    for command in &report.commands {
        let (Some(kind), None) = (command.kind, &command.error) else {
            let error = command.error.as_deref().unwrap_or("unknown");
            match command.kind {
                Some(kind) => println!("  {kind:?} error: {error}"),
                None => println!("  error: {error}"),
            }
            continue;
        };
        let detail = match (&command.fragment, command.category) {
            (Some(fragment), _) => format!(
                "fragment {}/{} of sequence {} (offset {}, total {})",
                fragment.fragment_number,
                fragment.fragment_count,
                fragment.sequence_number,
                fragment.fragment_offset,
                fragment.total_length
            ),
            (None, Some(category)) => format!("category {category}"),
            (None, None) => "n/a".to_string(),
        };
        println!(
            "  {:?} channel {} seq {}: {} bytes, {detail}",
            kind, command.channel_id, command.reliable_sequence, command.body_len
        );
    }
    if report.trailing_bytes > 0 {
        println!("trailing: {} bytes", report.trailing_bytes);
    }
}
