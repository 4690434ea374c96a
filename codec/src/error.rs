//! Error types for codec operations.

use std::fmt;

use bytestream::ReadError;
use protocol16::ParameterError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding one command.
///
/// [`decode_datagram`](crate::decode_datagram) contains these: a failing
/// command is logged and yields [`DecodedMessage::Other`](crate::DecodedMessage::Other).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Framing or fragment header error.
    Wire(wire::DecodeError),

    /// Message body ended early.
    Read(ReadError),

    /// Tagged value or parameter table error.
    Value(protocol16::DecodeError),

    /// Fragment could not join its assembly.
    Fragment(FragmentError),

    /// A builder rejected its parameters.
    Parameter(ParameterError),

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Reasons a fragment is rejected by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Fragment disagrees with the assembly about the fragment count.
    CountMismatch {
        sequence_number: i32,
        expected: usize,
        found: usize,
    },
}

/// Specific codec limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    FragmentCount,
    ReassembledBytes,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Read(e) => write!(f, "message body error: {e}"),
            Self::Value(e) => write!(f, "value error: {e}"),
            Self::Fragment(e) => write!(f, "fragment error: {e}"),
            Self::Parameter(e) => write!(f, "builder error: {e}"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountMismatch {
                sequence_number,
                expected,
                found,
            } => {
                write!(
                    f,
                    "sequence {sequence_number}: expected {expected} fragments, fragment says {found}"
                )
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FragmentCount => "fragment count",
            Self::ReassembledBytes => "reassembled bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Read(e) => Some(e),
            Self::Value(e) => Some(e),
            Self::Fragment(e) => Some(e),
            Self::Parameter(e) => Some(e),
            Self::LimitsExceeded { .. } => None,
        }
    }
}

impl std::error::Error for FragmentError {}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<ReadError> for CodecError {
    fn from(err: ReadError) -> Self {
        Self::Read(err)
    }
}

impl From<protocol16::DecodeError> for CodecError {
    fn from(err: protocol16::DecodeError) -> Self {
        Self::Value(err)
    }
}

impl From<FragmentError> for CodecError {
    fn from(err: FragmentError) -> Self {
        Self::Fragment(err)
    }
}

impl From<ParameterError> for CodecError {
    fn from(err: ParameterError) -> Self {
        Self::Parameter(err)
    }
}
