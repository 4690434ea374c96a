//! Inspection and decoding tools for captured Photon datagrams.
//!
//! - Inspect the peer header and command table of one payload
//! - Decode a sequence of captures through a shared decoder so fragments
//!   spanning files reassemble
//! - Render results as JSON or a compact human-readable listing

use std::fmt::Write as _;

use bytestream::ByteReader;
use codec::{DatagramDecoder, DecodedMessage, UnhandledMessage};
use game::GameMessage;
use serde::Serialize;
use wire::{CommandKind, FragmentHeader, FramerConfig, PeerHeader};

/// Structure of one datagram, without decoding message bodies.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub header: PeerHeader,
    pub commands: Vec<CommandSummary>,
    /// Bytes after the last framed command.
    pub trailing_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandSummary {
    /// `None` on rows that only carry a framing error.
    pub kind: Option<CommandKind>,
    pub channel_id: u8,
    pub declared_len: i32,
    pub reliable_sequence: i32,
    pub body_len: usize,
    /// Category byte of a direct message body.
    pub category: Option<u8>,
    pub fragment: Option<FragmentHeader>,
    /// Framing error that ended or skipped this command.
    pub error: Option<String>,
}

/// Walks the command table of a stripped payload.
pub fn inspect_datagram(payload: &[u8], config: &FramerConfig) -> wire::WireResult<InspectReport> {
    let datagram = wire::decode_datagram(payload, config)?;
    let header = datagram.header;
    let mut commands_iter = datagram.commands;
    let mut commands = Vec::new();
    for result in commands_iter.by_ref() {
        let summary = match result {
            Ok(command) => summarize(&command),
            Err(err) => CommandSummary {
                kind: None,
                channel_id: 0,
                declared_len: 0,
                reliable_sequence: 0,
                body_len: 0,
                category: None,
                fragment: None,
                error: Some(err.to_string()),
            },
        };
        commands.push(summary);
    }
    Ok(InspectReport {
        header,
        commands,
        trailing_bytes: commands_iter.rest().len(),
    })
}

fn summarize(command: &wire::Command<'_>) -> CommandSummary {
    let mut summary = CommandSummary {
        kind: Some(command.kind),
        channel_id: command.channel_id,
        declared_len: command.declared_len,
        reliable_sequence: command.reliable_sequence,
        body_len: command.body.len(),
        category: None,
        fragment: None,
        error: None,
    };
    let mut reader = ByteReader::new(command.body);
    match command.kind {
        CommandKind::Reliable => summary.category = reader.read_u8_after(1).ok(),
        CommandKind::Unreliable => {
            summary.category = reader.read_u8_after(wire::UNRELIABLE_PREFIX_SIZE + 1).ok();
        }
        CommandKind::Fragment => match FragmentHeader::parse(command.body) {
            Ok((header, _)) => summary.fragment = Some(header),
            Err(err) => summary.error = Some(err.to_string()),
        },
        CommandKind::Other(_) => {}
    }
    summary
}

/// Decoded messages of one input file.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeRecord {
    pub source: String,
    pub messages: Vec<DecodedMessage<GameMessage>>,
}

/// Decodes one captured frame and tags the result with its source.
pub fn decode_record(
    decoder: &mut DatagramDecoder<GameMessage>,
    source: impl Into<String>,
    frame: &[u8],
) -> DecodeRecord {
    DecodeRecord {
        source: source.into(),
        messages: decoder.decode_frame(frame),
    }
}

/// One line per message, grouped by source.
pub fn format_decode_pretty(records: &[DecodeRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "== {} ==", record.source);
        for message in &record.messages {
            match message {
                DecodedMessage::Event(m) => {
                    let _ = writeln!(out, "event {}: {m:?}", m.kind());
                }
                DecodedMessage::Request(m) => {
                    let _ = writeln!(out, "request {}: {m:?}", m.kind());
                }
                DecodedMessage::Unhandled(unhandled) => format_unhandled(&mut out, unhandled),
                DecodedMessage::FragmentPending {
                    sequence_number,
                    received,
                    needed,
                } => {
                    let _ = writeln!(
                        out,
                        "fragment sequence {sequence_number}: {received}/{needed}"
                    );
                }
                DecodedMessage::Other => {
                    let _ = writeln!(out, "other");
                }
            }
        }
    }
    out
}

fn format_unhandled(out: &mut String, unhandled: &UnhandledMessage) {
    let code = unhandled
        .code
        .map_or_else(|| "?".to_string(), |code| code.to_string());
    let _ = write!(out, "unhandled {:?} code {code}", unhandled.category);
    if let Some(response) = &unhandled.response {
        let _ = write!(out, " return {}", response.return_code);
    }
    let _ = writeln!(out, " ({} parameters)", unhandled.parameters.len());
    for (id, value) in unhandled.parameters.iter() {
        let _ = writeln!(out, "  {id}: {}", value.type_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytestream::ByteWriter;
    use protocol16::{encode_parameter_table, ParameterTable, Value};

    fn payload() -> Vec<u8> {
        let mut body = ByteWriter::new();
        body.write_u8(0xF3).write_u8(4).write_u8(250);
        encode_parameter_table(&mut body, &ParameterTable::from([(0, Value::Integer(1))]))
            .unwrap();

        let mut writer = ByteWriter::new();
        wire::encode_peer_header(
            &PeerHeader {
                command_count: 2,
                ..PeerHeader::default()
            },
            &mut writer,
        );
        wire::encode_command(CommandKind::Reliable, 0, 1, &body.finish(), &mut writer).unwrap();
        wire::encode_command(CommandKind::Other(1), 0, 2, &[], &mut writer).unwrap();
        writer.finish()
    }

    #[test]
    fn inspect_lists_commands() {
        let report = inspect_datagram(&payload(), &FramerConfig::default()).unwrap();
        assert_eq!(report.header.command_count, 2);
        assert_eq!(report.commands.len(), 2);
        assert_eq!(report.commands[0].category, Some(4));
        assert_eq!(report.commands[1].kind, Some(CommandKind::Other(1)));
        assert_eq!(report.trailing_bytes, 0);
    }

    #[test]
    fn framing_error_row_has_no_kind() {
        let mut writer = ByteWriter::new();
        wire::encode_peer_header(
            &PeerHeader {
                command_count: 2,
                ..PeerHeader::default()
            },
            &mut writer,
        );
        wire::encode_command(CommandKind::Other(1), 0, 1, &[], &mut writer).unwrap();

        let report = inspect_datagram(&writer.finish(), &FramerConfig::default()).unwrap();
        assert_eq!(report.commands.len(), 2);
        assert_eq!(report.commands[0].kind, Some(CommandKind::Other(1)));
        assert_eq!(report.commands[1].kind, None);
        assert!(report.commands[1].error.is_some());
    }

    #[test]
    fn pretty_output_lists_unhandled_parameters() {
        let config = codec::DecoderConfig::default().with_link_header_len(0);
        let mut decoder = DatagramDecoder::new(game::registry().unwrap(), config);
        let record = decode_record(&mut decoder, "capture-0.bin", &payload());
        let text = format_decode_pretty(&[record]);
        assert!(text.contains("== capture-0.bin =="));
        assert!(text.contains("unhandled Event code 250 (1 parameters)"));
        assert!(text.contains("  0: integer"));
        assert!(text.contains("other"));
    }

    #[test]
    fn records_serialize_to_json() {
        let config = codec::DecoderConfig::default().with_link_header_len(0);
        let mut decoder = DatagramDecoder::new(game::registry().unwrap(), config);
        let record = decode_record(&mut decoder, "a", &payload());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"source\":\"a\""));
    }
}
