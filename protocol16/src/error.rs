//! Error types for tagged-value decoding and encoding.

use std::fmt;

use bytestream::ReadError;

use crate::types::TypeCode;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encode operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while decoding a tagged value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The underlying byte read failed.
    Read(ReadError),

    /// A tag byte has no decode rule.
    UnrecognizedType {
        /// The raw tag byte.
        code: u8,
        /// Cursor position when the tag was rejected.
        position: usize,
    },

    /// An integer-array count was negative.
    NegativeLength { value: i32, position: usize },

    /// Composite values were nested deeper than allowed.
    DepthExceeded { max_depth: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    CollectionLength,
    ByteArrayLength,
    TotalValues,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A length does not fit its wire prefix.
    LengthOverflow { length: usize, max: usize },

    /// A value does not match the element or slot type declared for it.
    TypeMismatch {
        expected: TypeCode,
        found: TypeCode,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "read error: {err}"),
            Self::UnrecognizedType { code, position } => {
                write!(f, "unrecognized type code {code} at offset {position}")
            }
            Self::NegativeLength { value, position } => {
                write!(f, "negative length {value} at offset {position}")
            }
            Self::DepthExceeded { max_depth } => {
                write!(f, "values nested deeper than {max_depth} levels")
            }
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

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollectionLength => "collection length",
            Self::ByteArrayLength => "byte array length",
            Self::TotalValues => "total values",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow { length, max } => {
                write!(f, "length overflow: {length} > {max}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(
                    f,
                    "expected {} but got {}",
                    expected.name(),
                    found.name()
                )
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
        Self::Read(err)
    }
}
