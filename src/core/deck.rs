//! Deck snapshot: a hero class plus exactly thirty cards

use crate::core::{card_lookup, CardDef, CharacterClass};
use crate::{GameError, Result};

pub const DECK_SIZE: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub character_class: CharacterClass,
    pub cards: Vec<&'static CardDef>,
}

impl Deck {
    pub fn new(character_class: CharacterClass, cards: Vec<&'static CardDef>) -> Result<Self> {
        if cards.len() != DECK_SIZE {
            return Err(GameError::InvalidDeck(format!(
                "a deck needs exactly {} cards, got {}",
                DECK_SIZE,
                cards.len()
            )));
        }
        Ok(Deck {
            character_class,
            cards,
        })
    }

    /// Build a deck by cycling `pattern` until it has thirty cards
    pub fn cycled(character_class: CharacterClass, pattern: &[&'static CardDef]) -> Result<Self> {
        if pattern.is_empty() || pattern.len() > DECK_SIZE {
            return Err(GameError::InvalidDeck(format!(
                "deck pattern must have 1 to {} cards, got {}",
                DECK_SIZE,
                pattern.len()
            )));
        }
        let cards = pattern.iter().copied().cycle().take(DECK_SIZE).collect();
        Deck::new(character_class, cards)
    }

    /// Convenience: cycle card names looked up in the catalog
    pub fn from_names(character_class: CharacterClass, names: &[&str]) -> Result<Self> {
        let pattern = names
            .iter()
            .map(|name| card_lookup(name))
            .collect::<Result<Vec<_>>>()?;
        Deck::cycled(character_class, &pattern)
    }

    /// Shortest prefix whose repetition rebuilds the whole deck
    ///
    /// Periods from 1 to 14 are tried; if none fits, all thirty cards are
    /// returned.
    pub fn repeating_prefix(&self) -> &[&'static CardDef] {
        (1..15)
            .find(|&period| {
                (period..self.cards.len())
                    .all(|i| std::ptr::eq(self.cards[i % period], self.cards[i]))
            })
            .map(|period| &self.cards[..period])
            .unwrap_or(&self.cards)
    }
}
