//! Peer header layout and framing constants.

use bytestream::{ByteReader, ByteWriter};

use crate::error::WireResult;

/// Peer header size in bytes.
pub const PEER_HEADER_SIZE: usize = 2 + 1 + 1 + 4 + 4;

/// Command header size in bytes; also the smallest valid declared length.
pub const COMMAND_HEADER_SIZE: usize = 1 + 1 + 1 + 1 + 4 + 4;

/// Sequence prefix carried by unreliable command bodies.
pub const UNRELIABLE_PREFIX_SIZE: usize = 4;

/// Ethernet (14) + IPv4 without options (20) + UDP (8).
pub const DEFAULT_LINK_HEADER_LEN: usize = 42;

/// Header at the start of every datagram.
///
/// | offset | size | field         |
/// |--------|------|---------------|
/// | 0      | 2    | peer id       |
/// | 2      | 1    | flags         |
/// | 3      | 1    | command count |
/// | 4      | 4    | timestamp     |
/// | 8      | 4    | challenge     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerHeader {
    pub peer_id: u16,
    pub flags: u8,
    pub command_count: u8,
    pub timestamp: u32,
    pub challenge: i32,
}

impl PeerHeader {
    /// Reads a peer header, advancing the reader by [`PEER_HEADER_SIZE`].
    pub fn read(reader: &mut ByteReader<'_>) -> WireResult<Self> {
        Ok(Self {
            peer_id: reader.read_u16()?,
            flags: reader.read_u8()?,
            command_count: reader.read_u8()?,
            timestamp: reader.read_u32()?,
            challenge: reader.read_i32()?,
        })
    }
}

/// Writes a peer header.
pub fn encode_peer_header(header: &PeerHeader, writer: &mut ByteWriter) {
    writer
        .write_u16(header.peer_id)
        .write_u8(header.flags)
        .write_u8(header.command_count)
        .write_u32(header.timestamp)
        .write_i32(header.challenge);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_sizes() {
        assert_eq!(PEER_HEADER_SIZE, 12);
        assert_eq!(COMMAND_HEADER_SIZE, 12);
    }

    #[test]
    fn peer_header_layout() {
        let header = PeerHeader {
            peer_id: 0x0102,
            flags: 0x03,
            command_count: 2,
            timestamp: 0x0A0B_0C0D,
            challenge: -1,
        };
        let mut writer = ByteWriter::new();
        encode_peer_header(&header, &mut writer);
        let bytes = writer.finish();
        assert_eq!(
            bytes,
            [1, 2, 3, 2, 0x0A, 0x0B, 0x0C, 0x0D, 0xFF, 0xFF, 0xFF, 0xFF]
        );

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(PeerHeader::read(&mut reader).unwrap(), header);
        assert!(reader.is_empty());
    }

    #[test]
    fn short_header_is_truncated() {
        let mut reader = ByteReader::new(&[0; 11]);
        assert!(PeerHeader::read(&mut reader).is_err());
    }
}
