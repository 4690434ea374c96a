//! Framer configuration.

use std::ops::RangeInclusive;

use crate::error::{DecodeError, WireResult};
use crate::header::DEFAULT_LINK_HEADER_LEN;
use crate::limits::Limits;

/// Declared-length range accepted by the legacy sanity filter.
pub const LEGACY_LENGTH_RANGE: RangeInclusive<i32> = 0..=666;

/// Deployment-specific framing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FramerConfig {
    /// Bytes in front of the UDP payload in a captured frame.
    pub link_header_len: usize,

    /// When set, commands whose declared length falls outside this range are
    /// skipped and reported as [`DecodeError::FilteredCommand`].
    pub length_filter: Option<RangeInclusive<i32>>,

    pub limits: Limits,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            link_header_len: DEFAULT_LINK_HEADER_LEN,
            length_filter: None,
            limits: Limits::default(),
        }
    }
}

impl FramerConfig {
    /// Default framing with the legacy 0..=666 length filter enabled.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            length_filter: Some(LEGACY_LENGTH_RANGE),
            ..Self::default()
        }
    }

    /// Small limits for tests.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            link_header_len: DEFAULT_LINK_HEADER_LEN,
            length_filter: None,
            limits: Limits::for_testing(),
        }
    }

    #[must_use]
    pub fn with_link_header_len(mut self, len: usize) -> Self {
        self.link_header_len = len;
        self
    }

    /// Returns `false` if the filter is enabled and rejects `length`.
    #[must_use]
    pub fn accepts_length(&self, length: i32) -> bool {
        self.length_filter
            .as_ref()
            .map_or(true, |range| range.contains(&length))
    }
}

/// Drops the configured link-layer header from a captured frame.
pub fn strip_link_header<'a>(frame: &'a [u8], config: &FramerConfig) -> WireResult<&'a [u8]> {
    frame
        .get(config.link_header_len..)
        .ok_or(DecodeError::LinkHeaderTooShort {
            actual: frame.len(),
            required: config.link_header_len,
        })
}
