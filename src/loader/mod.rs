//! Deck loader
//!
//! Parser for the deck format (.dck)

pub mod deck;

pub use deck::{DeckEntry, DeckList, DeckLoader};
