//! Fragment cache keyed by sequence number.

use std::collections::HashMap;
use std::time::Instant;

use wire::FragmentHeader;

use crate::assembly::FragmentAssembly;
use crate::error::{CodecError, CodecResult, FragmentError, LimitKind};
use crate::limits::{CodecLimits, EvictionPolicy};

/// Result of offering one fragment to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// More fragments are needed.
    Pending { received: usize, needed: usize },
    /// All fragments arrived; bytes are in fragment-number order.
    Complete(Vec<u8>),
}

/// Incomplete fragmented messages, owned by the caller and passed by `&mut`.
///
/// Memory is bounded by [`EvictionPolicy`] and [`CodecLimits`]: at most
/// `max_pending` sequences, each at most `max_reassembled_bytes`.
#[derive(Debug, Clone, Default)]
pub struct FragmentCache {
    pending: HashMap<i32, FragmentAssembly>,
    limits: CodecLimits,
    policy: EvictionPolicy,
}

impl FragmentCache {
    #[must_use]
    pub fn new(limits: CodecLimits, policy: EvictionPolicy) -> Self {
        Self {
            pending: HashMap::new(),
            limits,
            policy,
        }
    }

    #[must_use]
    pub fn get(&self, sequence_number: i32) -> Option<&FragmentAssembly> {
        self.pending.get(&sequence_number)
    }

    /// Adds a fragment, returning the reassembled message once complete.
    ///
    /// A completed assembly is removed from the cache. A fragment whose count
    /// disagrees with its assembly is rejected and the assembly is untouched.
    pub fn accept(
        &mut self,
        header: &FragmentHeader,
        body: &[u8],
        now: Instant,
    ) -> CodecResult<FragmentOutcome> {
        header.validate()?;
        let sequence_number = header.sequence_number;
        let count = header.count();
        let number = header.index();

        if count > self.limits.max_fragment_count {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::FragmentCount,
                limit: self.limits.max_fragment_count,
                actual: count,
            });
        }

        if !self.pending.contains_key(&sequence_number) {
            self.make_room(now);
        }
        let assembly = self
            .pending
            .entry(sequence_number)
            .or_insert_with(|| FragmentAssembly::new(count, now));
        if assembly.fragments_needed() != count {
            return Err(FragmentError::CountMismatch {
                sequence_number,
                expected: assembly.fragments_needed(),
                found: count,
            }
            .into());
        }

        let size = assembly.buffered_bytes_with(number, body.len());
        if size > self.limits.max_reassembled_bytes {
            self.pending.remove(&sequence_number);
            log::debug!("dropping sequence {sequence_number}: reassembled size {size} over limit");
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::ReassembledBytes,
                limit: self.limits.max_reassembled_bytes,
                actual: size,
            });
        }

        assembly.add_fragment(number, body, now);
        log::trace!(
            "sequence {sequence_number}: fragment {number} stored ({}/{count})",
            assembly.received()
        );

        if assembly.is_complete() {
            let bytes = self
                .pending
                .remove(&sequence_number)
                .map(FragmentAssembly::into_bytes)
                .unwrap_or_default();
            log::trace!("sequence {sequence_number}: reassembled {} bytes", bytes.len());
            return Ok(FragmentOutcome::Complete(bytes));
        }

        Ok(FragmentOutcome::Pending {
            received: assembly.received(),
            needed: count,
        })
    }

    /// Drops sequences older than the policy's `max_age`.
    ///
    /// Returns the number of sequences evicted.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let max_age = self.policy.max_age;
        let before = self.pending.len();
        self.pending.retain(|sequence_number, assembly| {
            let age = now.saturating_duration_since(assembly.first_seen());
            let keep = age <= max_age;
            if !keep {
                log::debug!(
                    "evicting sequence {sequence_number}: {}/{} fragments after {age:?}",
                    assembly.received(),
                    assembly.fragments_needed()
                );
            }
            keep
        });
        before - self.pending.len()
    }

    /// Number of incomplete sequences.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fragment numbers still missing for a sequence.
    #[must_use]
    pub fn missing_fragments(&self, sequence_number: i32) -> Option<Vec<usize>> {
        self.get(sequence_number).map(FragmentAssembly::missing)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub const fn policy(&self) -> &EvictionPolicy {
        &self.policy
    }

    #[must_use]
    pub const fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Expires old sequences, then drops least recently updated ones until a
    /// new sequence fits under `max_pending`.
    fn make_room(&mut self, now: Instant) {
        self.evict_expired(now);
        while !self.pending.is_empty() && self.pending.len() >= self.policy.max_pending {
            let oldest = self
                .pending
                .iter()
                .min_by_key(|(_, assembly)| assembly.last_updated())
                .map(|(sequence_number, _)| *sequence_number);
            let Some(sequence_number) = oldest else {
                break;
            };
            if let Some(assembly) = self.pending.remove(&sequence_number) {
                log::debug!(
                    "evicting least recent sequence {sequence_number}: {}/{} fragments",
                    assembly.received(),
                    assembly.fragments_needed()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn header(sequence_number: i32, count: i32, number: i32) -> FragmentHeader {
        FragmentHeader {
            sequence_number,
            fragment_count: count,
            fragment_number: number,
            total_length: 0,
            fragment_offset: 0,
        }
    }

    #[test]
    fn out_of_order_reassembly() {
        let now = Instant::now();
        let mut cache = FragmentCache::default();
        assert_eq!(
            cache.accept(&header(1, 3, 2), b"c", now).unwrap(),
            FragmentOutcome::Pending {
                received: 1,
                needed: 3
            }
        );
        assert_eq!(
            cache.accept(&header(1, 3, 0), b"a", now).unwrap(),
            FragmentOutcome::Pending {
                received: 2,
                needed: 3
            }
        );
        assert_eq!(cache.missing_fragments(1), Some(vec![1]));
        assert_eq!(
            cache.accept(&header(1, 3, 1), b"b", now).unwrap(),
            FragmentOutcome::Complete(b"abc".to_vec())
        );
        assert_eq!(cache.pending_count(), 0);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn single_fragment_completes_immediately() {
        let mut cache = FragmentCache::default();
        let outcome = cache.accept(&header(4, 1, 0), b"x", Instant::now()).unwrap();
        assert_eq!(outcome, FragmentOutcome::Complete(b"x".to_vec()));
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn count_mismatch_leaves_assembly() {
        let now = Instant::now();
        let mut cache = FragmentCache::default();
        cache.accept(&header(1, 3, 0), b"a", now).unwrap();
        let err = cache.accept(&header(1, 4, 1), b"b", now).unwrap_err();
        assert_eq!(
            err,
            CodecError::Fragment(FragmentError::CountMismatch {
                sequence_number: 1,
                expected: 3,
                found: 4
            })
        );
        let assembly = cache.get(1).unwrap();
        assert_eq!(assembly.received(), 1);
        assert_eq!(assembly.fragments_needed(), 3);
    }

    #[test]
    fn invalid_header_rejected() {
        let mut cache = FragmentCache::default();
        let err = cache
            .accept(&header(1, 2, 5), b"a", Instant::now())
            .unwrap_err();
        assert!(matches!(err, CodecError::Wire(_)));
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn fragment_count_limit() {
        let mut cache = FragmentCache::new(CodecLimits::for_testing(), EvictionPolicy::default());
        let err = cache
            .accept(&header(1, 17, 0), b"a", Instant::now())
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitsExceeded {
                kind: LimitKind::FragmentCount,
                ..
            }
        ));
    }

    #[test]
    fn reassembled_size_limit_drops_sequence() {
        let now = Instant::now();
        let mut cache = FragmentCache::new(CodecLimits::for_testing(), EvictionPolicy::default());
        cache.accept(&header(1, 2, 0), &[0; 4000], now).unwrap();
        let err = cache.accept(&header(1, 2, 1), &[0; 200], now).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitsExceeded {
                kind: LimitKind::ReassembledBytes,
                limit: 4096,
                actual: 4200
            }
        ));
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn expired_sequences_are_evicted() {
        let start = Instant::now();
        let policy = EvictionPolicy {
            max_pending: 16,
            max_age: Duration::from_secs(1),
        };
        let mut cache = FragmentCache::new(CodecLimits::default(), policy);
        cache.accept(&header(1, 2, 0), b"a", start).unwrap();
        cache.accept(&header(2, 2, 0), b"a", start).unwrap();

        assert_eq!(cache.evict_expired(start + Duration::from_millis(500)), 0);
        assert_eq!(cache.evict_expired(start + Duration::from_secs(2)), 2);
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn new_sequence_evicts_least_recent() {
        let start = Instant::now();
        let policy = EvictionPolicy {
            max_pending: 2,
            max_age: Duration::from_secs(60),
        };
        let mut cache = FragmentCache::new(CodecLimits::default(), policy);
        cache.accept(&header(1, 2, 0), b"a", start).unwrap();
        cache
            .accept(&header(2, 2, 0), b"a", start + Duration::from_millis(1))
            .unwrap();
        // touch sequence 1 so sequence 2 becomes the least recent
        cache
            .accept(&header(1, 2, 0), b"b", start + Duration::from_millis(3))
            .unwrap();
        cache
            .accept(&header(3, 2, 0), b"a", start + Duration::from_millis(4))
            .unwrap();

        assert_eq!(cache.pending_count(), 2);
        assert!(cache.get(1).is_some());
        assert!(cache.get(2).is_none());
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn unbounded_policy_keeps_everything() {
        let start = Instant::now();
        let mut cache = FragmentCache::new(CodecLimits::default(), EvictionPolicy::unbounded());
        for seq in 0..300 {
            cache.accept(&header(seq, 2, 0), b"a", start).unwrap();
        }
        assert_eq!(cache.evict_expired(start + Duration::from_secs(3600)), 0);
        assert_eq!(cache.pending_count(), 300);
    }
}
