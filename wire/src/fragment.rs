//! Fragment command headers.

use bytestream::{ByteReader, ByteWriter};

use crate::error::{DecodeError, WireResult};

/// Fragment header size in bytes.
pub const FRAGMENT_HEADER_SIZE: usize = 5 * 4;

/// The five big-endian integers leading every fragment command body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentHeader {
    /// Identifies the message being reassembled.
    pub sequence_number: i32,
    pub fragment_count: i32,
    /// Zero-based position of this fragment.
    pub fragment_number: i32,
    pub total_length: i32,
    pub fragment_offset: i32,
}

impl FragmentHeader {
    /// Splits a fragment command body into its validated header and payload.
    pub fn parse(body: &[u8]) -> WireResult<(Self, &[u8])> {
        let mut reader = ByteReader::new(body);
        if reader.remaining() < FRAGMENT_HEADER_SIZE {
            return Err(DecodeError::Truncated {
                needed: FRAGMENT_HEADER_SIZE,
                available: reader.remaining(),
            });
        }
        let header = Self {
            sequence_number: reader.read_i32()?,
            fragment_count: reader.read_i32()?,
            fragment_number: reader.read_i32()?,
            total_length: reader.read_i32()?,
            fragment_offset: reader.read_i32()?,
        };
        header.validate()?;
        Ok((header, reader.rest()))
    }

    /// Checks `count > 0`, `0 <= number < count` and non-negative length/offset.
    pub const fn validate(&self) -> WireResult<()> {
        let fault = if self.fragment_count <= 0 {
            Some(("fragment_count", self.fragment_count))
        } else if self.fragment_number < 0 || self.fragment_number >= self.fragment_count {
            Some(("fragment_number", self.fragment_number))
        } else if self.total_length < 0 {
            Some(("total_length", self.total_length))
        } else if self.fragment_offset < 0 {
            Some(("fragment_offset", self.fragment_offset))
        } else {
            None
        };
        match fault {
            Some((field, value)) => Err(DecodeError::InvalidFragmentHeader { field, value }),
            None => Ok(()),
        }
    }

    /// Fragment count as an index bound. Zero for invalid headers.
    #[must_use]
    pub fn count(&self) -> usize {
        usize::try_from(self.fragment_count).unwrap_or(0)
    }

    /// Fragment number as an index. `usize::MAX` for invalid headers.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.fragment_number).unwrap_or(usize::MAX)
    }
}

/// Writes a fragment header.
pub fn encode_fragment_header(header: &FragmentHeader, writer: &mut ByteWriter) {
    writer
        .write_i32(header.sequence_number)
        .write_i32(header.fragment_count)
        .write_i32(header.fragment_number)
        .write_i32(header.total_length)
        .write_i32(header.fragment_offset);
}
