//! Replay driver
//!
//! Re-drives a fresh game from a `Replay`. Both seats are taken by
//! `ReplayAgent`s that never decide anything themselves: before each game
//! operation the driver resolves the recorded addresses against the live
//! game and stages the answers the operation is about to ask for.

use crate::core::{CardDef, CardInstance, Side};
use crate::game::{compute_state_hash, Agent, Character, Game, TargetRequest, TurnAction};
use crate::game_log;
use crate::replay::{replay_source, Action, Replay};
use crate::{GameError, Result};

/// Cursors into the replay, only ever moving forward
///
/// The random trace cursor lives in the game's random source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverState {
    /// Next action to apply
    pub action: usize,
    /// Next keep-set to hand out
    pub keep: usize,
}

/// Scripted agent answering from single-slot staged decisions
#[derive(Debug, Default)]
pub struct ReplayAgent {
    keep: Option<Vec<usize>>,
    target: Option<Character>,
    index: Option<usize>,
    option: Option<usize>,
}

impl ReplayAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_keep(&mut self, positions: Vec<usize>) {
        self.keep = Some(positions);
    }

    pub fn stage_target(&mut self, target: Character) {
        self.target = Some(target);
    }

    pub fn stage_index(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn stage_option(&mut self, option: usize) {
        self.option = Some(option);
    }

    pub fn clear(&mut self) {
        self.keep = None;
        self.target = None;
        self.index = None;
        self.option = None;
    }
}

fn unstaged(what: &str) -> GameError {
    GameError::MalformedReplay(format!("the game asked for a {} the replay does not record", what))
}

impl Agent for ReplayAgent {
    fn mulligan(&mut self, _game: &Game, side: Side, hand: &[CardInstance]) -> Result<Vec<bool>> {
        let positions = self.keep.take().ok_or_else(|| unstaged("keep-set"))?;
        let mut kept = vec![false; hand.len()];
        for position in positions {
            let slot = kept.get_mut(position).ok_or_else(|| {
                GameError::MalformedReplay(format!(
                    "keep position {} is outside the {} card hand of {}",
                    position,
                    hand.len(),
                    side
                ))
            })?;
            *slot = true;
        }
        Ok(kept)
    }

    fn choose_action(&mut self, _game: &Game, _available: &[TurnAction]) -> Result<Option<TurnAction>> {
        Err(GameError::MalformedReplay(
            "replay agents only follow the action log".to_string(),
        ))
    }

    fn choose_target(
        &mut self,
        _game: &Game,
        request: TargetRequest,
        _targets: &[Character],
    ) -> Result<Character> {
        self.target.ok_or_else(|| unstaged(&format!("{:?} target", request).to_lowercase()))
    }

    fn choose_index(&mut self, _game: &Game, _card: &'static CardDef) -> Result<usize> {
        self.index.ok_or_else(|| unstaged("board index"))
    }

    fn choose_option(&mut self, _game: &Game, _card: &'static CardDef) -> Result<usize> {
        self.option.ok_or_else(|| unstaged("card option"))
    }
}

/// What a finished replay run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub winner: Option<Side>,
    pub game_over: bool,
    pub turns: u32,
    pub actions_applied: usize,
    pub actions_recorded: usize,
    pub random_drawn: usize,
    pub random_recorded: usize,
    /// State hash after every turn, in order
    pub state_hashes: Vec<u64>,
}

impl ReplayOutcome {
    /// Every action and every random value was used
    pub fn fully_consumed(&self) -> bool {
        self.actions_applied == self.actions_recorded && self.random_drawn == self.random_recorded
    }
}

/// Drives a fresh game from a decoded replay
pub struct ReplayPlayer {
    game: Game,
    replay: Replay,
    agents: [ReplayAgent; 2],
    state: DriverState,
    started: bool,
    turn_limit: Option<u32>,
    state_hashes: Vec<u64>,
}

impl ReplayPlayer {
    /// Build the game from the replay's decks and random trace
    pub fn new(replay: Replay) -> Result<Self> {
        let decks = match replay.decks.as_slice() {
            [first, second] => [first.clone(), second.clone()],
            other => {
                return Err(GameError::MalformedReplay(format!(
                    "a replay needs two decks, found {}",
                    other.len()
                )))
            }
        };
        let game = Game::new(decks, replay_source(&replay.random));
        Ok(ReplayPlayer {
            game,
            replay,
            agents: [ReplayAgent::new(), ReplayAgent::new()],
            state: DriverState::default(),
            started: false,
            turn_limit: None,
            state_hashes: Vec::new(),
        })
    }

    /// Turn limit the recording ran under
    ///
    /// With a limit, a replay whose log is used up keeps playing turns while
    /// the limit allows, so a game that ended at the start of a turn (for
    /// instance by fatigue) ends the same way. Without it, play stops with
    /// the log.
    pub fn with_turn_limit(mut self, max_turns: u32) -> Self {
        self.turn_limit = Some(max_turns);
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn state_hashes(&self) -> &[u64] {
        &self.state_hashes
    }

    /// Deal opening hands and run both mulligans from the keep log
    pub fn pre_game(&mut self) -> Result<()> {
        if self.started {
            return Err(GameError::InvalidAction("the replayed game already started".to_string()));
        }
        self.started = true;
        for side in Side::BOTH {
            let keep = self.replay.keeps.get(self.state.keep).cloned().ok_or_else(|| {
                GameError::MalformedReplay(format!("no keep-set recorded for {}", side))
            })?;
            self.state.keep += 1;
            self.agents[side.index()].stage_keep(keep);
        }
        let [first, second] = &mut self.agents;
        self.game.pre_game([first, second])
    }

    /// Replay one turn of the current side
    ///
    /// Applies actions until `end()`, the end of the log, or the end of the
    /// game. An `end()` marker is stepped over and ends the turn.
    pub fn play_turn(&mut self) -> Result<()> {
        self.game.start_turn()?;
        while !self.game.is_over() {
            let Some(&action) = self.replay.actions.get(self.state.action) else {
                break;
            };
            if action == Action::EndTurn {
                break;
            }
            self.apply(action)?;
            self.state.action += 1;
        }
        if self.replay.actions.get(self.state.action) == Some(&Action::EndTurn) {
            self.state.action += 1;
            if !self.game.is_over() {
                self.game.end_turn()?;
            }
        }
        self.state_hashes.push(compute_state_hash(&self.game));
        Ok(())
    }

    /// Apply one recorded action to the live game
    ///
    /// Addresses are resolved now, against the current board, and the
    /// answers are staged on the acting side's agent for the duration of
    /// the operation.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        let side = self.game.current_side();
        game_log!(self.game.logger, Verbose, "replay", "{} replays {}", side, action);
        let agent = &mut self.agents[side.index()];
        let result = match action {
            Action::Play { card, target } | Action::Summon { card, target, .. } => {
                let (hand_index, option) = card.resolve_hand_card(&self.game)?;
                if let Some(option) = option {
                    agent.stage_option(option);
                }
                if let Action::Summon { index, .. } = action {
                    agent.stage_index(index);
                }
                if let Some(target) = target {
                    agent.stage_target(target.resolve_character(&self.game)?);
                }
                self.game.play_card(agent, hand_index)
            }
            Action::Attack { attacker, defender } => {
                let attacker = attacker.resolve_character(&self.game)?;
                agent.stage_target(defender.resolve_character(&self.game)?);
                self.game.attack(agent, attacker)
            }
            Action::UsePower { target } => {
                if let Some(target) = target {
                    agent.stage_target(target.resolve_character(&self.game)?);
                }
                self.game.use_power(agent)
            }
            Action::EndTurn => self.game.end_turn(),
            Action::Concede => self.game.concede(),
        };
        agent.clear();
        result
    }

    /// Replay the whole log and report the outcome
    pub fn run(&mut self) -> Result<ReplayOutcome> {
        if !self.started {
            self.pre_game()?;
        }
        while !self.game.is_over() {
            let exhausted = self.state.action >= self.replay.actions.len();
            let within_limit = self.turn_limit.is_some_and(|limit| self.game.turn() < limit);
            if exhausted && !within_limit {
                break;
            }
            self.play_turn()?;
            if exhausted {
                break;
            }
        }
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> ReplayOutcome {
        ReplayOutcome {
            winner: self.game.winner(),
            game_over: self.game.is_over(),
            turns: self.game.turn(),
            actions_applied: self.state.action,
            actions_recorded: self.replay.actions.len(),
            random_drawn: self.game.random_source().drawn(),
            random_recorded: self.replay.random.len(),
            state_hashes: self.state_hashes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterClass, Deck, STARTING_HEALTH};
    use crate::replay::EntityAddress;

    fn replay(first: (CharacterClass, &[&str]), second: (CharacterClass, &[&str]), actions: Vec<Action>) -> Replay {
        Replay {
            decks: vec![
                Deck::from_names(first.0, first.1).unwrap(),
                Deck::from_names(second.0, second.1).unwrap(),
            ],
            random: Vec::new(),
            keeps: Replay::default_keeps(),
            actions,
        }
    }

    #[test]
    fn test_needs_two_decks() {
        assert!(matches!(
            ReplayPlayer::new(Replay::default()),
            Err(GameError::MalformedReplay(_))
        ));
    }

    #[test]
    fn test_unstaged_decisions_fail() {
        let deck = Deck::from_names(CharacterClass::Mage, &["Wisp"]).unwrap();
        let game = Game::new([deck.clone(), deck], Box::new(crate::replay::NullRandom));
        let mut agent = ReplayAgent::new();
        assert!(matches!(
            agent.choose_target(&game, TargetRequest::Card, &[]),
            Err(GameError::MalformedReplay(_))
        ));
        assert!(agent.choose_action(&game, &[]).is_err());
        assert!(agent.mulligan(&game, Side::First, &[]).is_err());

        agent.stage_keep(vec![0, 5]);
        let hand = game.player(Side::First).hand.clone();
        assert!(agent.mulligan(&game, Side::First, &hand).is_err());
    }

    #[test]
    fn test_turn_boundaries() {
        let replay = replay(
            (CharacterClass::Hunter, &["Stonetusk Boar"]),
            (CharacterClass::Warrior, &["Wisp"]),
            vec![
                Action::Summon {
                    card: EntityAddress::HandCard(0, None),
                    index: 0,
                    target: None,
                },
                Action::Attack {
                    attacker: EntityAddress::Minion(Side::First, 0),
                    defender: EntityAddress::Side(Side::Second),
                },
                Action::EndTurn,
                Action::EndTurn,
            ],
        );
        let mut player = ReplayPlayer::new(replay).unwrap();
        player.pre_game().unwrap();

        player.play_turn().unwrap();
        assert_eq!(player.state(), DriverState { action: 3, keep: 2 });
        assert_eq!(player.game().current_side(), Side::Second);
        assert_eq!(player.game().player(Side::Second).health, STARTING_HEALTH - 1);

        player.play_turn().unwrap();
        assert_eq!(player.state().action, 4);
        assert_eq!(player.game().current_side(), Side::First);
        assert_eq!(player.state_hashes().len(), 2);

        // the log is used up: another turn starts and stops at once
        player.play_turn().unwrap();
        assert_eq!(player.state().action, 4);
        assert_eq!(player.game().current_side(), Side::First);
        assert_eq!(player.game().turn(), 3);
    }

    #[test]
    fn test_invalid_recorded_action_propagates() {
        let replay = replay(
            (CharacterClass::Warrior, &["Wisp"]),
            (CharacterClass::Warrior, &["Wisp"]),
            vec![Action::UsePower { target: None }, Action::EndTurn],
        );
        let mut player = ReplayPlayer::new(replay).unwrap();
        assert!(matches!(player.run(), Err(GameError::InvalidAction(_))));
    }

    #[test]
    fn test_stale_address_fails() {
        let replay = replay(
            (CharacterClass::Hunter, &["Wisp"]),
            (CharacterClass::Warrior, &["Wisp"]),
            vec![Action::Attack {
                attacker: EntityAddress::Minion(Side::First, 0),
                defender: EntityAddress::Side(Side::Second),
            }],
        );
        let mut player = ReplayPlayer::new(replay).unwrap();
        assert!(matches!(player.run(), Err(GameError::ReferenceNotFound(_))));
    }

    #[test]
    fn test_targeted_power_replays_its_target() {
        let replay = Replay {
            keeps: vec![vec![0, 1, 2], vec![0, 1, 2, 3]],
            ..replay(
                (CharacterClass::Mage, &["Wisp"]),
                (CharacterClass::Warrior, &["Wisp"]),
                vec![
                    Action::EndTurn,
                    Action::EndTurn,
                    Action::UsePower {
                        target: Some(EntityAddress::Side(Side::Second)),
                    },
                    Action::EndTurn,
                ],
            )
        };
        let mut player = ReplayPlayer::new(replay).unwrap();
        let outcome = player.run().unwrap();
        assert!(outcome.fully_consumed());
        assert_eq!(outcome.turns, 3);
        assert_eq!(outcome.state_hashes.len(), 3);
        assert_eq!(player.game().player(Side::Second).health, STARTING_HEALTH - 1);
    }
}
