//! Error types for datagram framing.

use std::fmt;

use bytestream::ReadError;

/// Result type for wire framing operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Framing errors.
///
/// These are soft at the datagram level: callers discard the datagram (or the
/// remaining commands) and continue with the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Captured frame is shorter than the configured link-layer header.
    LinkHeaderTooShort { actual: usize, required: usize },

    /// Payload is too small to hold a peer header and one command.
    DatagramTooSmall { actual: usize, required: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Fewer bytes remain than a header or declared length requires.
    Truncated { needed: usize, available: usize },

    /// Declared command length is smaller than the command header.
    InvalidCommandLength { length: i32 },

    /// Command skipped by the configured length filter.
    FilteredCommand { kind: u8, length: i32 },

    /// Fragment header fails validation.
    InvalidFragmentHeader { field: &'static str, value: i32 },

    /// Any other read failure.
    Read(ReadError),
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    DatagramBytes,
    CommandCount,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    LengthOverflow { length: usize },
}

impl DecodeError {
    /// Returns `true` if the iterator can continue past this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::FilteredCommand { .. })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkHeaderTooShort { actual, required } => {
                write!(
                    f,
                    "frame too small for link header: {actual} bytes, need {required}"
                )
            }
            Self::DatagramTooSmall { actual, required } => {
                write!(
                    f,
                    "datagram too small: {actual} bytes, need at least {required}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Truncated { needed, available } => {
                write!(f, "truncated command: need {needed} bytes, have {available}")
            }
            Self::InvalidCommandLength { length } => {
                write!(f, "invalid command length: {length}")
            }
            Self::FilteredCommand { kind, length } => {
                write!(f, "command kind {kind} filtered by length {length}")
            }
            Self::InvalidFragmentHeader { field, value } => {
                write!(f, "invalid fragment header: {field} = {value}")
            }
            Self::Read(err) => write!(f, "read error: {err}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DatagramBytes => "datagram bytes",
            Self::CommandCount => "command count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<ReadError> for DecodeError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::EndOfBuffer {
                requested,
                available,
            } => Self::Truncated {
                needed: requested,
                available,
            },
            other => Self::Read(other),
        }
    }
}
