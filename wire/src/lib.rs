//! Datagram and command framing for the Photon decoder.
//!
//! This crate handles the binary layout of a captured UDP payload: the peer
//! header, the sequence of length-prefixed commands, and fragment headers.
//! It does not look inside message bodies.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Every declared length is validated before slicing.
//! - **Soft failures** - Framing errors end the datagram, not the caller.
//! - **Explicit deployment settings** - The link-layer header length is
//!   configured, never inferred.

mod command;
mod config;
mod error;
mod fragment;
mod header;
mod limits;

pub use command::{decode_datagram, encode_command, Command, CommandIter, CommandKind, Datagram};
pub use config::{strip_link_header, FramerConfig, LEGACY_LENGTH_RANGE};
pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use fragment::{encode_fragment_header, FragmentHeader, FRAGMENT_HEADER_SIZE};
pub use header::{
    encode_peer_header, PeerHeader, COMMAND_HEADER_SIZE, DEFAULT_LINK_HEADER_LEN,
    PEER_HEADER_SIZE, UNRELIABLE_PREFIX_SIZE,
};
pub use limits::{Limits, MIN_DATAGRAM_LEN};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = FramerConfig::default();
        let _ = FramerConfig::legacy();
        let _ = Limits::default();
        let _ = CommandKind::Reliable;
        let _ = PeerHeader::default();
        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn minimum_datagram_covers_headers() {
        assert_eq!(
            MIN_DATAGRAM_LEN,
            PEER_HEADER_SIZE + COMMAND_HEADER_SIZE + UNRELIABLE_PREFIX_SIZE
        );
    }
}
