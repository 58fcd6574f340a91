//! Signals the simulation publishes on its event buses
//!
//! Game-wide events go out on `Game::events()`; everything tied to one side
//! (turns, plays, attacks, hero power) goes out on that player's bus.

use crate::core::{MinionId, Side};
use crate::events::Event;
use crate::replay::EntityAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Mulligan finished; `kept[i]` tells whether hand slot `i` was retained
    KeptCards { side: Side, kept: Vec<bool> },
    MinionAdded {
        side: Side,
        minion: MinionId,
        position: usize,
    },
    MinionDied {
        side: Side,
        minion: MinionId,
        name: &'static str,
    },
    GameEnded { winner: Option<Side> },

    TurnStarted { side: Side, turn: u32 },
    TurnEnded { side: Side, turn: u32 },
    CardDrawn { side: Side, card: &'static str },
    /// A card left the hand. Fired before any target, index or option is chosen.
    CardPlayed {
        side: Side,
        hand_index: usize,
        card: &'static str,
        targetable: bool,
        minion: bool,
    },
    OptionChosen { side: Side, option: usize },
    /// Fired before damage is exchanged, so both addresses are pre-combat
    Attack {
        side: Side,
        attacker: EntityAddress,
        defender: EntityAddress,
    },
    UsedPower { side: Side },
    FoundPowerTarget { side: Side, target: EntityAddress },
    Conceded { side: Side },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEventKind {
    KeptCards,
    MinionAdded,
    MinionDied,
    GameEnded,
    TurnStarted,
    TurnEnded,
    CardDrawn,
    CardPlayed,
    OptionChosen,
    Attack,
    UsedPower,
    FoundPowerTarget,
    Conceded,
}

impl Event for GameEvent {
    type Kind = GameEventKind;

    fn kind(&self) -> GameEventKind {
        match self {
            GameEvent::KeptCards { .. } => GameEventKind::KeptCards,
            GameEvent::MinionAdded { .. } => GameEventKind::MinionAdded,
            GameEvent::MinionDied { .. } => GameEventKind::MinionDied,
            GameEvent::GameEnded { .. } => GameEventKind::GameEnded,
            GameEvent::TurnStarted { .. } => GameEventKind::TurnStarted,
            GameEvent::TurnEnded { .. } => GameEventKind::TurnEnded,
            GameEvent::CardDrawn { .. } => GameEventKind::CardDrawn,
            GameEvent::CardPlayed { .. } => GameEventKind::CardPlayed,
            GameEvent::OptionChosen { .. } => GameEventKind::OptionChosen,
            GameEvent::Attack { .. } => GameEventKind::Attack,
            GameEvent::UsedPower { .. } => GameEventKind::UsedPower,
            GameEvent::FoundPowerTarget { .. } => GameEventKind::FoundPowerTarget,
            GameEvent::Conceded { .. } => GameEventKind::Conceded,
        }
    }
}
