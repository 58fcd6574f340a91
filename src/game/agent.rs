//! Agent interface for making game decisions
//!
//! An agent is asked for the mulligan, for the next action of its turn and
//! for every in-flight decision an action needs (target, board index,
//! choose-one option). The game validates every answer.

use crate::core::{CardDef, CardInstance, Side};
use crate::game::{Character, Game};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Why a target is being asked for
///
/// Only card targets become part of a recorded play; attack and hero power
/// targets are observed through their own events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRequest {
    Card,
    Attack,
    Power,
}

/// One step an agent can take during its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Play the card at this hand slot
    PlayCard(usize),
    Attack(Character),
    UsePower,
    Concede,
}

/// Decision maker for one side of the table
pub trait Agent {
    /// Decide which cards of the opening hand to keep; one flag per slot
    fn mulligan(&mut self, game: &Game, side: Side, hand: &[CardInstance]) -> Result<Vec<bool>>;

    /// Pick the next action, or `None` to end the turn
    fn choose_action(&mut self, game: &Game, available: &[TurnAction]) -> Result<Option<TurnAction>>;

    fn choose_target(
        &mut self,
        game: &Game,
        request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character>;

    /// Board position for a minion about to be summoned (0..=board length)
    fn choose_index(&mut self, game: &Game, card: &'static CardDef) -> Result<usize>;

    /// Choose-one option for `card`
    fn choose_option(&mut self, game: &Game, card: &'static CardDef) -> Result<usize>;

    /// Called once when the game is over
    fn on_game_end(&mut self, _game: &Game, _won: bool) {}
}

impl<A: Agent + ?Sized> Agent for &mut A {
    fn mulligan(&mut self, game: &Game, side: Side, hand: &[CardInstance]) -> Result<Vec<bool>> {
        (**self).mulligan(game, side, hand)
    }

    fn choose_action(&mut self, game: &Game, available: &[TurnAction]) -> Result<Option<TurnAction>> {
        (**self).choose_action(game, available)
    }

    fn choose_target(
        &mut self,
        game: &Game,
        request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character> {
        (**self).choose_target(game, request, targets)
    }

    fn choose_index(&mut self, game: &Game, card: &'static CardDef) -> Result<usize> {
        (**self).choose_index(game, card)
    }

    fn choose_option(&mut self, game: &Game, card: &'static CardDef) -> Result<usize> {
        (**self).choose_option(game, card)
    }

    fn on_game_end(&mut self, game: &Game, won: bool) {
        (**self).on_game_end(game, won)
    }
}
