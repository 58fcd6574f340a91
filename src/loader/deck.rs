//! Deck file loader (.dck format)

use crate::core::{card_lookup, CharacterClass, Deck, DECK_SIZE};
use crate::{GameError, Result};
use std::fs;
use std::path::Path;

/// Deck loader for .dck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck list from a .dck file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load a .dck file straight into a playable deck
    pub fn load_deck(path: &Path) -> Result<Deck> {
        Self::load_from_file(path)?.to_deck()
    }

    /// Parse a deck list from its text content
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut name = None;
        let mut class = None;
        let mut main_deck = Vec::new();
        let mut section = Section::None;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = match header.trim().to_lowercase().as_str() {
                    "metadata" => Section::Metadata,
                    "main" => Section::Main,
                    _ => Section::Other,
                };
                continue;
            }

            match section {
                Section::Metadata => {
                    if let Some((key, value)) = line.split_once('=') {
                        match key.trim().to_lowercase().as_str() {
                            "class" => class = Some(value.parse::<CharacterClass>()?),
                            "name" => name = Some(value.trim().to_string()),
                            _ => {}
                        }
                    }
                }
                // Format: "2 Card Name"
                Section::Main => {
                    let entry = line
                        .split_once(' ')
                        .and_then(|(count, card)| {
                            let count = count.parse::<u8>().ok()?;
                            Some(DeckEntry {
                                card_name: card.trim().to_string(),
                                count,
                            })
                        })
                        .ok_or_else(|| {
                            GameError::InvalidDeck(format!(
                                "line {}: expected '<count> <card name>', got '{}'",
                                number + 1,
                                line
                            ))
                        })?;
                    main_deck.push(entry);
                }
                Section::None | Section::Other => {}
            }
        }

        let class = class.ok_or_else(|| GameError::InvalidDeck("deck has no Class= entry".to_string()))?;
        if main_deck.is_empty() {
            return Err(GameError::InvalidDeck("Empty deck".to_string()));
        }

        Ok(DeckList {
            name,
            class,
            main_deck,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Section {
    None,
    Metadata,
    Main,
    Other,
}

/// Represents a deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

/// Represents a complete deck list
#[derive(Debug, Clone)]
pub struct DeckList {
    pub name: Option<String>,
    pub class: CharacterClass,
    pub main_deck: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// Look every card up and build the thirty card deck, in file order
    pub fn to_deck(&self) -> Result<Deck> {
        if self.total_cards() != DECK_SIZE {
            return Err(GameError::InvalidDeck(format!(
                "{} lists {} cards, a deck needs {}",
                self.name.as_deref().unwrap_or("deck"),
                self.total_cards(),
                DECK_SIZE
            )));
        }
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for entry in &self.main_deck {
            let def = card_lookup(&entry.card_name)?;
            cards.extend(std::iter::repeat(def).take(entry.count as usize));
        }
        Deck::new(self.class, cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACE_HUNTER: &str = r#"
# aggressive and cheap
[metadata]
Name=Boars
Class=Hunter

[Main]
20 Stonetusk Boar
10 Elven Archer
"#;

    #[test]
    fn test_parse_simple_deck() {
        let deck = DeckLoader::parse(FACE_HUNTER).unwrap();
        assert_eq!(deck.name.as_deref(), Some("Boars"));
        assert_eq!(deck.class, CharacterClass::Hunter);
        assert_eq!(deck.main_deck.len(), 2);
        assert_eq!(deck.total_cards(), 30);

        assert_eq!(deck.main_deck[0].card_name, "Stonetusk Boar");
        assert_eq!(deck.main_deck[0].count, 20);
        assert_eq!(deck.main_deck[1].card_name, "Elven Archer");
        assert_eq!(deck.main_deck[1].count, 10);
    }

    #[test]
    fn test_to_deck_keeps_file_order() {
        let deck = DeckLoader::parse(FACE_HUNTER).unwrap().to_deck().unwrap();
        assert_eq!(deck.character_class, CharacterClass::Hunter);
        assert_eq!(deck.cards.len(), DECK_SIZE);
        assert_eq!(deck.cards[19].name, "Stonetusk Boar");
        assert_eq!(deck.cards[20].name, "Elven Archer");
    }

    #[test]
    fn test_rejects_bad_decks() {
        assert!(matches!(
            DeckLoader::parse("[Main]\n30 Wisp\n"),
            Err(GameError::InvalidDeck(_))
        ));
        assert!(matches!(
            DeckLoader::parse("[metadata]\nClass=Mage\n[Main]\nthirty Wisp\n"),
            Err(GameError::InvalidDeck(_))
        ));

        let short = DeckLoader::parse("[metadata]\nClass=Mage\n[Main]\n29 Wisp\n").unwrap();
        assert!(matches!(short.to_deck(), Err(GameError::InvalidDeck(_))));

        let unknown = DeckLoader::parse("[metadata]\nClass=Mage\n[Main]\n30 Fireball\n").unwrap();
        assert!(matches!(unknown.to_deck(), Err(GameError::UnknownCard(_))));
    }
}
