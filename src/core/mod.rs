//! Core game types and entities

pub mod card;
pub mod deck;
pub mod entity;
pub mod player;
pub mod types;

pub use card::{
    card_lookup, CardChoice, CardDef, CardEffect, CardInstance, CardInstanceId, CardKind, HeroPower,
    PowerEffect, BASIC_TOTEMS, CATALOG,
};
pub use deck::{Deck, DECK_SIZE};
pub use entity::{EntityId, GameEntity};
pub use player::{Minion, MinionId, Player, MAX_BOARD, MAX_HAND, MAX_MANA, STARTING_HEALTH};
pub use types::{CharacterClass, Side};
