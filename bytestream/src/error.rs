//! Error types for byte cursor operations.

use std::fmt;

/// Result type for byte cursor operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Errors that can occur while reading from a [`ByteReader`](crate::ByteReader).
///
/// A failed read never moves the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Number of bytes the read needed (skip included).
        requested: usize,
        /// Number of bytes left after the cursor.
        available: usize,
    },

    /// Attempted to seek outside the buffer.
    SeekOutOfRange {
        /// The requested absolute position.
        position: usize,
        /// Length of the buffer.
        len: usize,
    },

    /// String bytes were not valid UTF-8.
    InvalidUtf8 {
        /// Absolute position of the string's first byte.
        position: usize,
        /// Length of the string in bytes.
        len: usize,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::SeekOutOfRange { position, len } => {
                write!(f, "cannot seek to {position} in a buffer of {len} bytes")
            }
            Self::InvalidUtf8 { position, len } => {
                write!(f, "invalid utf-8 in {len}-byte string at offset {position}")
            }
        }
    }
}

impl std::error::Error for ReadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_end_of_buffer() {
        let err = ReadError::EndOfBuffer {
            requested: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bytes"), "should mention requested bytes");
        assert!(msg.contains("3 bytes"), "should mention available bytes");
        assert!(msg.contains("read"), "should mention read operation");
    }

    #[test]
    fn error_display_seek_out_of_range() {
        let err = ReadError::SeekOutOfRange {
            position: 100,
            len: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn error_display_invalid_utf8() {
        let err = ReadError::InvalidUtf8 {
            position: 12,
            len: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("utf-8"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn error_equality() {
        let err1 = ReadError::EndOfBuffer {
            requested: 8,
            available: 3,
        };
        let err2 = ReadError::EndOfBuffer {
            requested: 8,
            available: 3,
        };
        let err3 = ReadError::EndOfBuffer {
            requested: 8,
            available: 4,
        };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ReadError>();
    }
}
