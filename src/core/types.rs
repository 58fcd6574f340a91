//! Strongly-typed wrappers for game concepts

use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two seats at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Replay token for this side's hero (`p1` / `p2`)
    pub fn token(self) -> &'static str {
        match self {
            Side::First => "p1",
            Side::Second => "p2",
        }
    }

    pub fn from_token(token: &str) -> Option<Side> {
        match token {
            "p1" => Some(Side::First),
            "p2" => Some(Side::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Hero class. Decides the hero power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Druid,
    Hunter,
    Mage,
    Paladin,
    Priest,
    Rogue,
    Shaman,
    Warlock,
    Warrior,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 9] = [
        CharacterClass::Druid,
        CharacterClass::Hunter,
        CharacterClass::Mage,
        CharacterClass::Paladin,
        CharacterClass::Priest,
        CharacterClass::Rogue,
        CharacterClass::Shaman,
        CharacterClass::Warlock,
        CharacterClass::Warrior,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterClass::Druid => "Druid",
            CharacterClass::Hunter => "Hunter",
            CharacterClass::Mage => "Mage",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Priest => "Priest",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Shaman => "Shaman",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Warrior => "Warrior",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::InvalidDeck(format!("unknown character class '{}'", wanted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_tokens() {
        assert_eq!(Side::First.token(), "p1");
        assert_eq!(Side::from_token("p2"), Some(Side::Second));
        assert_eq!(Side::from_token("p3"), None);
        assert_eq!(Side::First.other(), Side::Second);
        assert_eq!(Side::Second.index(), 1);
    }

    #[test]
    fn test_class_parse_case_insensitive() {
        assert_eq!("mage".parse::<CharacterClass>().unwrap(), CharacterClass::Mage);
        assert_eq!(" WARRIOR ".parse::<CharacterClass>().unwrap(), CharacterClass::Warrior);
        assert!("Necromancer".parse::<CharacterClass>().is_err());
    }
}
