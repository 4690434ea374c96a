//! Builders: parameter table to [`GameMessage`].
//!
//! Each builder documents the parameter ids it reads. Accessors fail with
//! [`ParameterError`] on a missing or mistyped parameter; the decoder then
//! reports the message as unhandled.

use protocol16::{ParameterError, ParameterTable};

use crate::harvestable::HarvestableType;
use crate::messages::{
    EntityMove, GameMessage, Harvestable, MobAppears, Position, SystemBuilding, UserEnter,
};

/// Minimum length of the move payload: two LE floats end at byte 17.
pub const MOVE_PAYLOAD_LEN: usize = 17;

const MOVE_X_OFFSET: usize = 9;
const MOVE_Y_OFFSET: usize = 13;

/// Event 1: `{0: id}`.
pub fn user_left(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    Ok(GameMessage::UserLeft {
        id: table.integral(0)?,
    })
}

/// Event 3: `{0: id, 1: bytes}` with LE floats at offsets 9 and 13.
pub fn entity_move(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    let id = table.identifier(0)?;
    let bytes = table.byte_array_min(1, MOVE_PAYLOAD_LEN)?;
    let position = Position::new(
        le_f32(bytes, MOVE_X_OFFSET),
        le_f32(bytes, MOVE_Y_OFFSET),
    );
    Ok(GameMessage::EntityMove(EntityMove { id, position }))
}

/// Event 29: `{0: id, 14: [x, y]}`.
pub fn user_enter(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    Ok(GameMessage::UserEnter(UserEnter {
        id: table.identifier(0)?,
        position: table.float_pair(14)?.into(),
    }))
}

/// Event 39: parallel lists.
///
/// `{0: ids, 1: types, 2: tiers, 3: [x0, y0, x1, y1, ..], 4: units}`. Every
/// list must cover every id.
pub fn harvestable_list(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    let ids = table.integral_list(0)?;
    let types = table.integral_list(1)?;
    let tiers = table.integral_list(2)?;
    let positions = table.float_list(3)?;
    let units = table.integral_list(4)?;

    let count = ids.len();
    require_len(1, &types, count)?;
    require_len(2, &tiers, count)?;
    require_len(3, &positions, count * 2)?;
    require_len(4, &units, count)?;

    let harvestables = ids
        .iter()
        .enumerate()
        .map(|(i, id)| Harvestable {
            id: id.to_string(),
            position: Position::new(positions[i * 2], positions[i * 2 + 1]),
            kind: HarvestableType::from_raw(types[i]),
            tier: Some(tiers[i]),
            units_per_click: Some(units[i]),
            enchant_level: None,
        })
        .collect();
    Ok(GameMessage::HarvestableList { harvestables })
}

/// Event 40: `{0: id, 5: type, 8: [x, y], 10: units?, 11: enchant?}`.
pub fn harvestable(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    Ok(GameMessage::Harvestable(Harvestable {
        id: table.identifier(0)?,
        position: table.float_pair(8)?.into(),
        kind: HarvestableType::from_raw(table.integral(5)?),
        tier: None,
        units_per_click: table.optional_integral(10)?,
        enchant_level: table.optional_integral(11)?,
    }))
}

/// Event 45: `{0: id, 1: [x, y], 3: name}`.
pub fn system_building(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    Ok(GameMessage::SystemBuilding(SystemBuilding {
        id: table.identifier(0)?,
        position: table.float_pair(1)?.into(),
        name: table.string(3)?.to_owned(),
    }))
}

/// Event 123: `{0: id, 7: [x, y], 19: rarity?, 33: enchant?}`.
pub fn mob_appears(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    Ok(GameMessage::MobAppears(MobAppears {
        id: table.identifier(0)?,
        position: table.float_pair(7)?.into(),
        rarity_level: table.optional_integral(19)?,
        enchant_level: table.optional_integral(33)?,
    }))
}

/// Request 21: `{1: [x, y]}`.
pub fn self_move(table: &ParameterTable) -> Result<GameMessage, ParameterError> {
    Ok(GameMessage::SelfMove {
        position: table.float_pair(1)?.into(),
    })
}

fn le_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(raw)
}

fn require_len<T>(id: u8, list: &[T], needed: usize) -> Result<(), ParameterError> {
    if list.len() < needed {
        return Err(ParameterError::TooShort {
            id,
            needed,
            actual: list.len(),
        });
    }
    Ok(())
}
