//! Zero agent: always takes the first choice
//!
//! Keeps the whole opening hand, ends every turn without acting, and picks
//! the first target, board slot and option when asked. Useful as a passive
//! opponent and in tests.

use crate::core::{CardDef, CardInstance, Side};
use crate::game::{Agent, Character, Game, TargetRequest, TurnAction};
use crate::{GameError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroAgent;

impl ZeroAgent {
    pub fn new() -> Self {
        ZeroAgent
    }
}

impl Agent for ZeroAgent {
    fn mulligan(&mut self, _game: &Game, _side: Side, hand: &[CardInstance]) -> Result<Vec<bool>> {
        Ok(vec![true; hand.len()])
    }

    fn choose_action(&mut self, _game: &Game, _available: &[TurnAction]) -> Result<Option<TurnAction>> {
        Ok(None)
    }

    fn choose_target(
        &mut self,
        _game: &Game,
        _request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character> {
        targets
            .first()
            .copied()
            .ok_or_else(|| GameError::InvalidAction("no targets to choose from".to_string()))
    }

    fn choose_index(&mut self, _game: &Game, _card: &'static CardDef) -> Result<usize> {
        Ok(0)
    }

    fn choose_option(&mut self, _game: &Game, _card: &'static CardDef) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterClass, Deck};
    use crate::replay::NullRandom;

    #[test]
    fn test_zero_agent_is_passive() {
        let deck = Deck::from_names(CharacterClass::Mage, &["Wisp"]).unwrap();
        let game = Game::new([deck.clone(), deck], Box::new(NullRandom));
        let mut agent = ZeroAgent::new();

        assert_eq!(agent.choose_action(&game, &[TurnAction::UsePower]).unwrap(), None);
        assert_eq!(
            agent
                .choose_target(
                    &game,
                    TargetRequest::Card,
                    &[Character::Hero(Side::First), Character::Hero(Side::Second)]
                )
                .unwrap(),
            Character::Hero(Side::First)
        );
        let wisp = crate::core::card_lookup("Wisp").unwrap();
        assert_eq!(agent.choose_index(&game, wisp).unwrap(), 0);
    }
}
