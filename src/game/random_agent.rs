//! Random agent for testing and baseline gameplay
//!
//! Makes uniform random choices. Ending the turn counts as one more
//! available action, so turns stay short.

use crate::core::{CardDef, CardInstance, Side};
use crate::game::{Agent, Character, Game, TargetRequest, TurnAction};
use crate::{GameError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An agent that makes random choices
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    /// Create a random agent seeded from entropy
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a random agent with a seeded RNG (for deterministic testing)
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn mulligan(&mut self, _game: &Game, _side: Side, hand: &[CardInstance]) -> Result<Vec<bool>> {
        Ok(hand.iter().map(|_| self.rng.gen_bool(0.5)).collect())
    }

    fn choose_action(&mut self, _game: &Game, available: &[TurnAction]) -> Result<Option<TurnAction>> {
        // index == len means end the turn
        let index = self.rng.gen_range(0..=available.len());
        Ok(available.get(index).copied())
    }

    fn choose_target(
        &mut self,
        _game: &Game,
        _request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character> {
        if targets.is_empty() {
            return Err(GameError::InvalidAction("no targets to choose from".to_string()));
        }
        Ok(targets[self.rng.gen_range(0..targets.len())])
    }

    fn choose_index(&mut self, game: &Game, _card: &'static CardDef) -> Result<usize> {
        let board = game.current_player().minions.len();
        Ok(self.rng.gen_range(0..=board))
    }

    fn choose_option(&mut self, _game: &Game, card: &'static CardDef) -> Result<usize> {
        Ok(self.rng.gen_range(0..card.choices.len().max(1)))
    }
}
