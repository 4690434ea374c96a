//! Decoded message types.

use protocol16::{ParameterTable, Value};

/// Message category, the byte at offset 1 of a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageCategory {
    OperationRequest,
    OperationResponse,
    Event,
    InternalOperationResponse,
    Other(u8),
}

impl MessageCategory {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            2 => Self::OperationRequest,
            3 => Self::OperationResponse,
            4 => Self::Event,
            7 => Self::InternalOperationResponse,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::OperationRequest => 2,
            Self::OperationResponse => 3,
            Self::Event => 4,
            Self::InternalOperationResponse => 7,
            Self::Other(raw) => raw,
        }
    }

    /// Both response categories share one layout.
    #[must_use]
    pub const fn is_response(self) -> bool {
        matches!(
            self,
            Self::OperationResponse | Self::InternalOperationResponse
        )
    }
}

/// Header fields of an operation response.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResponseHeader {
    pub operation_code: u8,
    pub return_code: i16,
    pub debug_message: Value,
}

/// A message that no builder produced.
///
/// Carries the full parameter table so nothing is lost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnhandledMessage {
    pub category: MessageCategory,
    /// Routing code when one could be determined.
    pub code: Option<u16>,
    /// Present for response categories.
    pub response: Option<ResponseHeader>,
    pub parameters: ParameterTable,
}

/// Outcome of decoding one command.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecodedMessage<M> {
    Request(M),
    Event(M),
    Unhandled(UnhandledMessage),
    /// Fragment stored; the message is not complete yet.
    FragmentPending {
        sequence_number: i32,
        received: usize,
        needed: usize,
    },
    /// Control command, unsupported category, or a command that failed to decode.
    Other,
}

impl<M> DecodedMessage<M> {
    /// Returns the built message for `Request` and `Event`.
    #[must_use]
    pub fn message(&self) -> Option<&M> {
        match self {
            Self::Request(m) | Self::Event(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::FragmentPending { .. })
    }

    /// Applies `f` to the built message, keeping every other variant.
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> DecodedMessage<N> {
        match self {
            Self::Request(m) => DecodedMessage::Request(f(m)),
            Self::Event(m) => DecodedMessage::Event(f(m)),
            Self::Unhandled(u) => DecodedMessage::Unhandled(u),
            Self::FragmentPending {
                sequence_number,
                received,
                needed,
            } => DecodedMessage::FragmentPending {
                sequence_number,
                received,
                needed,
            },
            Self::Other => DecodedMessage::Other,
        }
    }
}
