//! Limits for bounded value decoding.

/// Limits enforced while decoding tagged values.
///
/// Every length field is checked against these before iteration, and every
/// decoded value is charged against `max_total_values`, so a hostile count
/// cannot trigger unbounded work or allocation. `Null` elements consume no
/// input bytes, which makes the value budget the only bound on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of composite values (arrays, dictionaries, tables).
    pub max_depth: usize,

    /// Maximum element count of any array, dictionary, or parameter table.
    pub max_collection_len: usize,

    /// Maximum length of a byte array in bytes.
    pub max_byte_array_len: usize,

    /// Maximum number of values produced by one top-level decode.
    pub max_total_values: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_collection_len: 16 * 1024,
            // reassembled bodies can carry large blobs
            max_byte_array_len: 1024 * 1024,
            max_total_values: 256 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_depth: 8,
            max_collection_len: 64,
            max_byte_array_len: 1024,
            max_total_values: 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_collection_len: usize::MAX,
            max_byte_array_len: usize::MAX,
            max_total_values: usize::MAX,
        }
    }
}
