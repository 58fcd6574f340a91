//! Position-based addresses for characters and hand cards
//!
//! An address names an entity by where it sits (side, board position, hand
//! slot) rather than by identity, so it can be written down and later
//! resolved against a different game that reached the same state. Addresses
//! are only meaningful at the moment they were taken.

use crate::core::{CardInstanceId, Side};
use crate::game::{Character, Game};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityAddress {
    /// A side's hero
    Side(Side),
    /// Minion at a board position of a side
    Minion(Side, usize),
    /// Card at a slot of the acting side's hand, with the chosen option
    HandCard(usize, Option<usize>),
}

/// A live entity an address can be taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEntity {
    Character(Character),
    HandCard(CardInstanceId),
}

impl EntityAddress {
    /// Address of a live entity in `game` as it stands right now
    ///
    /// Hand cards are searched in the acting side's hand; the first match
    /// wins.
    pub fn from_live(entity: LiveEntity, game: &Game) -> Result<EntityAddress> {
        match entity {
            LiveEntity::Character(Character::Hero(side)) => Ok(EntityAddress::Side(side)),
            LiveEntity::Character(Character::Minion(id)) => game
                .locate_minion(id)
                .map(|(side, position)| EntityAddress::Minion(side, position))
                .ok_or_else(|| GameError::ReferenceNotFound(format!("minion {:?} is not on the board", id))),
            LiveEntity::HandCard(id) => game
                .current_player()
                .hand
                .iter()
                .position(|card| card.id == id)
                .map(|index| EntityAddress::HandCard(index, None))
                .ok_or_else(|| GameError::ReferenceNotFound(format!("card {:?} is not in hand", id))),
        }
    }

    /// The character this address denotes in `game` now
    ///
    /// A minion address resolves to whichever minion occupies that position
    /// on that side; an empty position is `ReferenceNotFound`.
    pub fn resolve_character(&self, game: &Game) -> Result<Character> {
        match *self {
            EntityAddress::Side(side) => Ok(Character::Hero(side)),
            EntityAddress::Minion(side, position) => game
                .player(side)
                .minions
                .get(position)
                .map(|minion| Character::Minion(minion.id))
                .ok_or_else(|| GameError::ReferenceNotFound(format!("no minion at {}", self))),
            EntityAddress::HandCard(..) => Err(GameError::ReferenceNotFound(format!(
                "{} is a hand card, not a character",
                self
            ))),
        }
    }

    /// Hand slot and option this address denotes, checked against the
    /// acting side's hand
    pub fn resolve_hand_card(&self, game: &Game) -> Result<(usize, Option<usize>)> {
        match *self {
            EntityAddress::HandCard(index, option) => {
                if index < game.current_player().hand.len() {
                    Ok((index, option))
                } else {
                    Err(GameError::ReferenceNotFound(format!("no card at hand slot {}", index)))
                }
            }
            _ => Err(GameError::ReferenceNotFound(format!("{} is not a hand card", self))),
        }
    }

    pub fn is_character(&self) -> bool {
        !matches!(self, EntityAddress::HandCard(..))
    }

    /// Same card address tagged with a chosen option
    pub fn with_option(self, option: usize) -> EntityAddress {
        match self {
            EntityAddress::HandCard(index, _) => EntityAddress::HandCard(index, Some(option)),
            other => other,
        }
    }
}

impl fmt::Display for EntityAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityAddress::Side(side) => write!(f, "{}", side),
            EntityAddress::Minion(side, position) => write!(f, "{}:{}", side, position),
            EntityAddress::HandCard(index, None) => write!(f, "{}", index),
            EntityAddress::HandCard(index, Some(option)) => write!(f, "{}:{}", index, option),
        }
    }
}

impl FromStr for EntityAddress {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self> {
        let malformed = || GameError::MalformedReplay(format!("invalid address '{}'", token));
        let number = |s: &str| s.parse::<usize>().map_err(|_| malformed());

        let (head, tail) = match token.trim().split_once(':') {
            Some((head, tail)) => (head, Some(tail)),
            None => (token.trim(), None),
        };
        match (Side::from_token(head), tail) {
            (Some(side), None) => Ok(EntityAddress::Side(side)),
            (Some(side), Some(position)) => Ok(EntityAddress::Minion(side, number(position)?)),
            (None, option) => Ok(EntityAddress::HandCard(
                number(head)?,
                option.map(number).transpose()?,
            )),
        }
    }
}
