//! Typed game messages produced by the reference builders.

use crate::harvestable::HarvestableType;

/// A world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Position {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityMove {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserEnter {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Harvestable {
    pub id: String,
    pub position: Position,
    pub kind: HarvestableType,
    /// Only sent in harvestable lists.
    pub tier: Option<i64>,
    pub units_per_click: Option<i64>,
    pub enchant_level: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemBuilding {
    pub id: String,
    pub position: Position,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobAppears {
    pub id: String,
    pub position: Position,
    pub rarity_level: Option<i64>,
    pub enchant_level: Option<i64>,
}

/// Every message the reference catalog understands.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum GameMessage {
    UserLeft { id: i64 },
    EntityMove(EntityMove),
    UserEnter(UserEnter),
    HarvestableList { harvestables: Vec<Harvestable> },
    Harvestable(Harvestable),
    SystemBuilding(SystemBuilding),
    MobAppears(MobAppears),
    /// The local player's own movement request.
    SelfMove { position: Position },
}

impl GameMessage {
    /// Snake-case name of the variant, as used in JSON output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UserLeft { .. } => "user_left",
            Self::EntityMove(_) => "entity_move",
            Self::UserEnter(_) => "user_enter",
            Self::HarvestableList { .. } => "harvestable_list",
            Self::Harvestable(_) => "harvestable",
            Self::SystemBuilding(_) => "system_building",
            Self::MobAppears(_) => "mob_appears",
            Self::SelfMove { .. } => "self_move",
        }
    }
}
