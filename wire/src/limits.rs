//! Configurable limits for bounded framing.

use crate::header::{COMMAND_HEADER_SIZE, PEER_HEADER_SIZE};

/// Smallest datagram accepted by default: peer header, one command header
/// and a four-byte floor.
pub const MIN_DATAGRAM_LEN: usize = PEER_HEADER_SIZE + COMMAND_HEADER_SIZE + 4;

/// Wire-level limits for datagram framing.
///
/// Body parsing limits belong to higher layers (protocol16/codec).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum datagram size in bytes.
    pub max_datagram_bytes: usize,

    /// Maximum command count announced by the peer header.
    pub max_commands: usize,

    /// Datagrams shorter than this are rejected before framing.
    pub min_datagram_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // largest UDP payload
            max_datagram_bytes: 64 * 1024,
            max_commands: usize::from(u8::MAX),
            min_datagram_len: MIN_DATAGRAM_LEN,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_datagram_bytes: 1500,
            max_commands: 8,
            min_datagram_len: MIN_DATAGRAM_LEN,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    ///
    /// The peer header is still required.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_datagram_bytes: usize::MAX,
            max_commands: usize::MAX,
            min_datagram_len: PEER_HEADER_SIZE,
        }
    }
}
