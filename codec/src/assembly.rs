//! Reassembly state for one fragmented message.

use std::collections::BTreeMap;
use std::time::Instant;

/// Fragments received so far for one sequence number.
///
/// Keys are unique fragment numbers; a repeated number replaces the stored
/// bytes. Iteration order is fragment-number order, so reassembly does not
/// depend on arrival order.
#[derive(Debug, Clone)]
pub struct FragmentAssembly {
    fragments_needed: usize,
    fragments: BTreeMap<usize, Vec<u8>>,
    buffered_bytes: usize,
    first_seen: Instant,
    last_updated: Instant,
}

impl FragmentAssembly {
    /// Starts an assembly expecting `fragments_needed` fragments.
    #[must_use]
    pub const fn new(fragments_needed: usize, now: Instant) -> Self {
        Self {
            fragments_needed,
            fragments: BTreeMap::new(),
            buffered_bytes: 0,
            first_seen: now,
            last_updated: now,
        }
    }

    /// Stores a fragment; last write wins for duplicate numbers.
    pub fn add_fragment(&mut self, number: usize, bytes: &[u8], now: Instant) {
        if let Some(old) = self.fragments.insert(number, bytes.to_vec()) {
            self.buffered_bytes -= old.len();
        }
        self.buffered_bytes += bytes.len();
        self.last_updated = now;
    }

    #[must_use]
    pub const fn fragments_needed(&self) -> usize {
        self.fragments_needed
    }

    #[must_use]
    pub fn received(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fragments.len() == self.fragments_needed
    }

    /// Bytes currently buffered across all fragments.
    #[must_use]
    pub const fn buffered_bytes(&self) -> usize {
        self.buffered_bytes
    }

    /// Buffered size after storing `len` bytes under `number`.
    #[must_use]
    pub fn buffered_bytes_with(&self, number: usize, len: usize) -> usize {
        let replaced = self.fragments.get(&number).map_or(0, Vec::len);
        self.buffered_bytes - replaced + len
    }

    #[must_use]
    pub const fn first_seen(&self) -> Instant {
        self.first_seen
    }

    #[must_use]
    pub const fn last_updated(&self) -> Instant {
        self.last_updated
    }

    /// Fragment numbers not yet received.
    #[must_use]
    pub fn missing(&self) -> Vec<usize> {
        (0..self.fragments_needed)
            .filter(|n| !self.fragments.contains_key(n))
            .collect()
    }

    /// Concatenates the fragments in number order.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buffered_bytes);
        for bytes in self.fragments.into_values() {
            out.extend_from_slice(&bytes);
        }
        out
    }
}
