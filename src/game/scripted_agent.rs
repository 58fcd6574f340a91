//! Scripted agent for tests and demos
//!
//! Follows a predetermined list of actions per turn. Targets, board indices
//! and options are taken from their own queues in order; an empty queue
//! falls back to the first choice.

use crate::core::{CardDef, CardInstance, Side};
use crate::game::{Agent, Character, Game, TargetRequest, TurnAction};
use crate::{GameError, Result};
use std::collections::VecDeque;

/// An agent that follows a fixed script, one action list per own turn
pub struct ScriptedAgent {
    keep: Option<Vec<usize>>,
    turns: VecDeque<Vec<TurnAction>>,
    current: VecDeque<TurnAction>,
    last_turn: Option<u32>,
    targets: VecDeque<Character>,
    indices: VecDeque<usize>,
    options: VecDeque<usize>,
}

impl ScriptedAgent {
    pub fn new(turns: Vec<Vec<TurnAction>>) -> Self {
        ScriptedAgent {
            keep: None,
            turns: turns.into(),
            current: VecDeque::new(),
            last_turn: None,
            targets: VecDeque::new(),
            indices: VecDeque::new(),
            options: VecDeque::new(),
        }
    }

    /// Keep only these opening-hand positions (default: keep everything)
    pub fn keep(mut self, positions: &[usize]) -> Self {
        self.keep = Some(positions.to_vec());
        self
    }

    pub fn targets(mut self, targets: Vec<Character>) -> Self {
        self.targets = targets.into();
        self
    }

    pub fn indices(mut self, indices: Vec<usize>) -> Self {
        self.indices = indices.into();
        self
    }

    pub fn options(mut self, options: Vec<usize>) -> Self {
        self.options = options.into();
        self
    }
}

impl Agent for ScriptedAgent {
    fn mulligan(&mut self, _game: &Game, _side: Side, hand: &[CardInstance]) -> Result<Vec<bool>> {
        Ok(match &self.keep {
            None => vec![true; hand.len()],
            Some(positions) => (0..hand.len()).map(|i| positions.contains(&i)).collect(),
        })
    }

    fn choose_action(&mut self, game: &Game, _available: &[TurnAction]) -> Result<Option<TurnAction>> {
        if self.last_turn != Some(game.turn()) {
            self.last_turn = Some(game.turn());
            self.current = self.turns.pop_front().unwrap_or_default().into();
        }
        Ok(self.current.pop_front())
    }

    fn choose_target(
        &mut self,
        _game: &Game,
        _request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character> {
        match self.targets.pop_front() {
            Some(target) => Ok(target),
            None => targets
                .first()
                .copied()
                .ok_or_else(|| GameError::InvalidAction("no targets to choose from".to_string())),
        }
    }

    fn choose_index(&mut self, _game: &Game, _card: &'static CardDef) -> Result<usize> {
        Ok(self.indices.pop_front().unwrap_or(0))
    }

    fn choose_option(&mut self, _game: &Game, _card: &'static CardDef) -> Result<usize> {
        Ok(self.options.pop_front().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterClass, Deck};
    use crate::replay::NullRandom;

    #[test]
    fn test_script_advances_per_turn() {
        let deck = Deck::from_names(CharacterClass::Druid, &["Wisp"]).unwrap();
        let mut game = Game::new([deck.clone(), deck], Box::new(NullRandom));
        let mut agent = ScriptedAgent::new(vec![
            vec![TurnAction::PlayCard(0), TurnAction::PlayCard(0)],
            vec![TurnAction::UsePower],
        ]);

        game.start_turn().unwrap();
        assert_eq!(agent.choose_action(&game, &[]).unwrap(), Some(TurnAction::PlayCard(0)));
        assert_eq!(agent.choose_action(&game, &[]).unwrap(), Some(TurnAction::PlayCard(0)));
        assert_eq!(agent.choose_action(&game, &[]).unwrap(), None);

        game.end_turn().unwrap();
        game.start_turn().unwrap();
        assert_eq!(agent.choose_action(&game, &[]).unwrap(), Some(TurnAction::UsePower));
        assert_eq!(agent.choose_action(&game, &[]).unwrap(), None);
    }

    #[test]
    fn test_keep_mask() {
        let deck = Deck::from_names(CharacterClass::Druid, &["Wisp"]).unwrap();
        let mut game = Game::new([deck.clone(), deck], Box::new(NullRandom));
        game.start_turn().unwrap();
        let hand = game.current_player().hand.clone();
        let mut agent = ScriptedAgent::new(vec![]).keep(&[0]);
        let kept = agent.mulligan(&game, Side::First, &[hand[0], hand[0], hand[0]]).unwrap();
        assert_eq!(kept, vec![true, false, false]);
    }
}
