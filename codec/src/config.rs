//! Decoder configuration.

use wire::FramerConfig;

use crate::limits::{CodecLimits, EvictionPolicy};

/// Everything a decoder needs besides the registry and cache.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    pub framing: FramerConfig,
    pub values: protocol16::Limits,
    pub limits: CodecLimits,
    pub eviction: EvictionPolicy,
}

impl DecoderConfig {
    /// Small limits for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            framing: FramerConfig::for_testing(),
            values: protocol16::Limits::for_testing(),
            limits: CodecLimits::for_testing(),
            eviction: EvictionPolicy::default(),
        }
    }

    /// Default settings with the legacy command-length filter enabled.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            framing: FramerConfig::legacy(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    #[must_use]
    pub fn with_link_header_len(mut self, len: usize) -> Self {
        self.framing.link_header_len = len;
        self
    }
}
