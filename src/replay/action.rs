//! Recorded actions and the replay aggregate

use crate::core::Deck;
use crate::replay::EntityAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One externally observable decision, holding addresses only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A spell played from hand
    Play {
        card: EntityAddress,
        target: Option<EntityAddress>,
    },
    /// A minion played from hand onto `index`
    Summon {
        card: EntityAddress,
        index: usize,
        target: Option<EntityAddress>,
    },
    Attack {
        attacker: EntityAddress,
        defender: EntityAddress,
    },
    UsePower {
        target: Option<EntityAddress>,
    },
    EndTurn,
    Concede,
}

impl Action {
    /// Directive name used in the text format
    pub fn name(&self) -> &'static str {
        match self {
            Action::Play { .. } => "play",
            Action::Summon { .. } => "summon",
            Action::Attack { .. } => "attack",
            Action::UsePower { .. } => "power",
            Action::EndTurn => "end",
            Action::Concede => "concede",
        }
    }
}

/// Formats as a replay line without the trailing newline, e.g. `summon(0,1,p2)`
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        match self {
            Action::Play { card, target } => {
                write!(f, "{}", card)?;
                if let Some(target) = target {
                    write!(f, ",{}", target)?;
                }
            }
            Action::Summon { card, index, target } => {
                write!(f, "{},{}", card, index)?;
                if let Some(target) = target {
                    write!(f, ",{}", target)?;
                }
            }
            Action::Attack { attacker, defender } => write!(f, "{},{}", attacker, defender)?,
            Action::UsePower { target } => {
                if let Some(target) = target {
                    write!(f, "{}", target)?;
                }
            }
            Action::EndTurn | Action::Concede => {}
        }
        f.write_str(")")
    }
}

/// Everything needed to re-drive a game: decks, random trace, mulligan
/// keep-sets and the ordered action log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    pub decks: Vec<Deck>,
    pub random: Vec<i32>,
    /// Kept hand positions, one set per mulligan in mulligan order
    pub keeps: Vec<Vec<usize>>,
    pub actions: Vec<Action>,
}

impl Replay {
    /// Keep-sets assumed when a replay carries none: keep the whole
    /// opening hand of each side
    pub fn default_keeps() -> Vec<Vec<usize>> {
        vec![vec![0, 1, 2], vec![0, 1, 2, 3]]
    }

    /// Number of `end()` markers, i.e. completed turns
    pub fn turn_count(&self) -> usize {
        self.actions.iter().filter(|a| matches!(a, Action::EndTurn)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    #[test]
    fn test_action_lines() {
        let cases = [
            (
                Action::Play {
                    card: EntityAddress::HandCard(0, None),
                    target: None,
                },
                "play(0)",
            ),
            (
                Action::Play {
                    card: EntityAddress::HandCard(2, Some(1)),
                    target: Some(EntityAddress::Minion(Side::Second, 0)),
                },
                "play(2:1,p2:0)",
            ),
            (
                Action::Summon {
                    card: EntityAddress::HandCard(1, None),
                    index: 3,
                    target: Some(EntityAddress::Side(Side::First)),
                },
                "summon(1,3,p1)",
            ),
            (
                Action::Attack {
                    attacker: EntityAddress::Minion(Side::Second, 0),
                    defender: EntityAddress::Side(Side::First),
                },
                "attack(p2:0,p1)",
            ),
            (Action::UsePower { target: None }, "power()"),
            (
                Action::UsePower {
                    target: Some(EntityAddress::Side(Side::Second)),
                },
                "power(p2)",
            ),
            (Action::EndTurn, "end()"),
            (Action::Concede, "concede()"),
        ];
        for (action, line) in cases {
            assert_eq!(action.to_string(), line);
        }
    }

    #[test]
    fn test_turn_count() {
        let replay = Replay {
            actions: vec![Action::EndTurn, Action::Concede, Action::EndTurn],
            ..Replay::default()
        };
        assert_eq!(replay.turn_count(), 2);
    }
}
