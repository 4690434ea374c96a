//! Limits and policies for codec-level decoding.

use std::time::Duration;

/// Codec-specific limits enforced during fragment reassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum fragment count a single sequence may announce.
    pub max_fragment_count: usize,
    /// Maximum buffered size of one reassembled message.
    pub max_reassembled_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_fragment_count: 1024,
            max_reassembled_bytes: 1024 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_fragment_count: 16,
            max_reassembled_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_fragment_count: usize::MAX,
            max_reassembled_bytes: usize::MAX,
        }
    }
}

/// When the fragment cache drops incomplete sequences.
///
/// Eviction runs whenever a new sequence number arrives and on demand via
/// [`FragmentCache::evict_expired`](crate::FragmentCache::evict_expired).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Pending sequences kept before the least recently updated is dropped.
    pub max_pending: usize,
    /// Age after which an incomplete sequence is dropped.
    pub max_age: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            max_pending: 256,
            max_age: Duration::from_secs(10),
        }
    }
}

impl EvictionPolicy {
    /// Never evicts; incomplete sequences live until they complete.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_pending: usize::MAX,
            max_age: Duration::MAX,
        }
    }
}
