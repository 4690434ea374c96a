//! Datagram decoding and command framing.

use std::iter::FusedIterator;

use bytestream::{ByteReader, ByteWriter};

use crate::config::FramerConfig;
use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::header::{PeerHeader, COMMAND_HEADER_SIZE};

/// Command kinds the decoder routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    /// Body is a message.
    Reliable,
    /// Body is a 4-byte sequence prefix followed by a message.
    Unreliable,
    /// Body is a fragment header followed by a slice of a larger message.
    Fragment,
    /// Control commands (acks, pings, connects) and anything unrecognized.
    Other(u8),
}

impl CommandKind {
    pub const RELIABLE: u8 = 6;
    pub const UNRELIABLE: u8 = 7;
    pub const FRAGMENT: u8 = 8;

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            Self::RELIABLE => Self::Reliable,
            Self::UNRELIABLE => Self::Unreliable,
            Self::FRAGMENT => Self::Fragment,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Reliable => Self::RELIABLE,
            Self::Unreliable => Self::UNRELIABLE,
            Self::Fragment => Self::FRAGMENT,
            Self::Other(raw) => raw,
        }
    }
}

/// One framed command. The body borrows from the datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub kind: CommandKind,
    pub channel_id: u8,
    pub flags: u8,
    /// Header plus body length as declared on the wire.
    pub declared_len: i32,
    pub reliable_sequence: i32,
    /// Exactly `declared_len - 12` bytes.
    pub body: &'a [u8],
}

/// A decoded datagram: the peer header and a lazy command iterator.
#[derive(Debug, Clone)]
pub struct Datagram<'a> {
    pub header: PeerHeader,
    pub commands: CommandIter<'a>,
}

/// Validates the peer header and prepares command iteration.
pub fn decode_datagram<'a>(payload: &'a [u8], config: &FramerConfig) -> WireResult<Datagram<'a>> {
    let limits = &config.limits;
    if payload.len() < limits.min_datagram_len {
        return Err(DecodeError::DatagramTooSmall {
            actual: payload.len(),
            required: limits.min_datagram_len,
        });
    }
    if payload.len() > limits.max_datagram_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::DatagramBytes,
            limit: limits.max_datagram_bytes,
            actual: payload.len(),
        });
    }

    let mut reader = ByteReader::new(payload);
    let header = PeerHeader::read(&mut reader)?;
    let count = usize::from(header.command_count);
    if count > limits.max_commands {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::CommandCount,
            limit: limits.max_commands,
            actual: count,
        });
    }

    Ok(Datagram {
        header,
        commands: CommandIter {
            reader,
            remaining: count,
            config: config.clone(),
            failed: false,
        },
    })
}

/// Iterator over the commands of one datagram.
///
/// Yields at most `command_count` items. A structural error is yielded once
/// and ends iteration; a filtered command is reported and skipped.
#[derive(Debug, Clone)]
pub struct CommandIter<'a> {
    reader: ByteReader<'a>,
    remaining: usize,
    config: FramerConfig,
    failed: bool,
}

impl<'a> CommandIter<'a> {
    fn read_command(&mut self) -> WireResult<Command<'a>> {
        let available = self.reader.remaining();
        if available < COMMAND_HEADER_SIZE {
            return Err(DecodeError::Truncated {
                needed: COMMAND_HEADER_SIZE,
                available,
            });
        }

        let kind = self.reader.read_u8()?;
        let channel_id = self.reader.read_u8()?;
        let flags = self.reader.read_u8()?;
        let declared_len = self.reader.read_i32_after(1)?;
        let reliable_sequence = self.reader.read_i32()?;

        let body_len = usize::try_from(declared_len)
            .ok()
            .and_then(|len| len.checked_sub(COMMAND_HEADER_SIZE))
            .ok_or(DecodeError::InvalidCommandLength {
                length: declared_len,
            })?;
        let body = self.reader.read_bytes(body_len)?;

        if !self.config.accepts_length(declared_len) {
            return Err(DecodeError::FilteredCommand {
                kind,
                length: declared_len,
            });
        }

        Ok(Command {
            kind: CommandKind::from_raw(kind),
            channel_id,
            flags,
            declared_len,
            reliable_sequence,
            body,
        })
    }

    /// Bytes not yet consumed by framing.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        self.reader.rest()
    }
}

impl<'a> Iterator for CommandIter<'a> {
    type Item = WireResult<Command<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let result = self.read_command();
        if let Err(err) = &result {
            if !err.is_recoverable() {
                self.failed = true;
            }
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl FusedIterator for CommandIter<'_> {}

/// Writes one command: the 12-byte header, then `body`.
pub fn encode_command(
    kind: CommandKind,
    channel_id: u8,
    reliable_sequence: i32,
    body: &[u8],
    writer: &mut ByteWriter,
) -> Result<(), EncodeError> {
    let declared_len = body
        .len()
        .checked_add(COMMAND_HEADER_SIZE)
        .and_then(|len| i32::try_from(len).ok())
        .ok_or(EncodeError::LengthOverflow { length: body.len() })?;
    writer
        .write_u8(kind.raw())
        .write_u8(channel_id)
        .write_u8(0)
        .write_u8(0)
        .write_i32(declared_len)
        .write_i32(reliable_sequence)
        .write_bytes(body);
    Ok(())
}
