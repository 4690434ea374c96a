//! Reference message catalog for the Photon decoder.
//!
//! A small set of typed events and requests built on the `codec` registry
//! contract. [`registry`] returns the frozen registry ready to hand to a
//! [`codec::DatagramDecoder`].

pub mod builders;
mod harvestable;
mod messages;

use codec::{BuilderRegistry, RegistryError};

pub use harvestable::HarvestableType;
pub use messages::{
    EntityMove, GameMessage, Harvestable, MobAppears, Position, SystemBuilding, UserEnter,
};

/// Event codes understood by the catalog.
pub mod event_code {
    pub const USER_LEFT: u16 = 1;
    pub const ENTITY_MOVE: u16 = 3;
    pub const USER_ENTER: u16 = 29;
    pub const HARVESTABLE_LIST: u16 = 39;
    pub const HARVESTABLE: u16 = 40;
    pub const SYSTEM_BUILDING: u16 = 45;
    pub const MOB_APPEARS: u16 = 123;
}

/// Operation codes understood by the catalog.
pub mod request_code {
    pub const SELF_MOVE: u16 = 21;
}

/// Builds the frozen reference registry.
pub fn registry() -> Result<BuilderRegistry<GameMessage>, RegistryError> {
    let mut builder = BuilderRegistry::builder();
    builder
        .register_event(event_code::USER_LEFT, builders::user_left)?
        .register_event(event_code::ENTITY_MOVE, builders::entity_move)?
        .register_event(event_code::USER_ENTER, builders::user_enter)?
        .register_event(event_code::HARVESTABLE_LIST, builders::harvestable_list)?
        .register_event(event_code::HARVESTABLE, builders::harvestable)?
        .register_event(event_code::SYSTEM_BUILDING, builders::system_building)?
        .register_event(event_code::MOB_APPEARS, builders::mob_appears)?
        .register_request(request_code::SELF_MOVE, builders::self_move)?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_catalog() {
        let registry = registry().unwrap();
        assert_eq!(registry.event_codes(), vec![1, 3, 29, 39, 40, 45, 123]);
        assert_eq!(registry.request_codes(), vec![21]);
    }

    #[test]
    fn kind_names() {
        let message = GameMessage::SelfMove {
            position: Position::new(1.0, 2.0),
        };
        assert_eq!(message.kind(), "self_move");
    }
}
