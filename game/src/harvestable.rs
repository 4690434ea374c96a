//! Harvestable resource classification.

use std::fmt;

/// Resource family of a harvestable, derived from its raw type number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HarvestableType {
    Log,
    Rock,
    Fiber,
    Hide,
    Ore,
    Other,
}

impl HarvestableType {
    /// Maps a raw type number; anything outside the known ranges is `Other`.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        match raw {
            0..=5 => Self::Log,
            6..=10 => Self::Rock,
            11..=14 => Self::Fiber,
            15..=22 => Self::Hide,
            23..=27 => Self::Ore,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Rock => "rock",
            Self::Fiber => "fiber",
            Self::Hide => "hide",
            Self::Ore => "ore",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for HarvestableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_boundaries() {
        let cases = [
            (-1, HarvestableType::Other),
            (0, HarvestableType::Log),
            (5, HarvestableType::Log),
            (6, HarvestableType::Rock),
            (10, HarvestableType::Rock),
            (11, HarvestableType::Fiber),
            (14, HarvestableType::Fiber),
            (15, HarvestableType::Hide),
            (22, HarvestableType::Hide),
            (23, HarvestableType::Ore),
            (27, HarvestableType::Ore),
            (28, HarvestableType::Other),
        ];
        for (raw, expected) in cases {
            assert_eq!(HarvestableType::from_raw(raw), expected, "raw {raw}");
        }
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(HarvestableType::Ore.to_string(), "ore");
    }
}
