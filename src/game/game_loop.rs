//! Game loop implementation
//!
//! Runs the opening mulligans and then whole turns, asking the acting
//! side's agent for actions until it ends the turn.

use crate::core::Side;
use crate::game::{compute_state_hash, Agent, Game};
use crate::game_log;
use crate::Result;

/// Turn limit used when none is given, by the loop and by both CLI commands
pub const DEFAULT_MAX_TURNS: u32 = 100;

/// Verbosity level for game output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - turns and the game outcome
    Minimal = 1,
    /// Normal - key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - draws, damage and deaths
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone)]
pub struct GameResult {
    /// Winner of the game (None if draw or turn limit)
    pub winner: Option<Side>,
    /// Total number of turns played
    pub turns_played: u32,
    /// Reason the game ended
    pub end_reason: GameEndReason,
    /// State hash after every turn, in order
    pub state_hashes: Vec<u64>,
}

/// Reason the game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEndReason {
    /// This side's hero died
    HeroDeath(Side),
    /// This side gave up
    Conceded(Side),
    /// Both heroes died at once
    Draw,
    /// Game reached maximum turn limit
    TurnLimit,
}

/// Game loop manager
pub struct GameLoop<'a> {
    game: &'a mut Game,
    /// Maximum number of turns before forcing a draw
    max_turns: u32,
    /// Actions after which the loop ends the turn on the agent's behalf
    max_actions_per_turn: usize,
    pub verbosity: VerbosityLevel,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut Game) -> Self {
        let verbosity = game.logger.verbosity();
        GameLoop {
            game,
            max_turns: DEFAULT_MAX_TURNS,
            max_actions_per_turn: 50,
            verbosity,
        }
    }

    /// Set maximum turns before forcing a draw
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_actions_per_turn(mut self, max_actions: usize) -> Self {
        self.max_actions_per_turn = max_actions;
        self
    }

    /// Set verbosity on the loop and the game's logger
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Run the game loop with the given agents
    ///
    /// Returns when a hero dies or the turn limit is reached.
    pub fn run_game(&mut self, agent1: &mut dyn Agent, agent2: &mut dyn Agent) -> Result<GameResult> {
        self.game.pre_game([&mut *agent1, &mut *agent2])?;

        let mut state_hashes = Vec::new();
        while !self.game.is_over() && self.game.turn() < self.max_turns {
            let agent: &mut dyn Agent = match self.game.current_side() {
                Side::First => &mut *agent1,
                Side::Second => &mut *agent2,
            };
            self.play_turn(agent)?;
            state_hashes.push(compute_state_hash(self.game));
        }

        let result = self.result(state_hashes);
        game_log!(
            self.game.logger,
            Minimal,
            "game",
            "Game over after {} turns: {:?}",
            result.turns_played,
            result.end_reason
        );
        agent1.on_game_end(self.game, result.winner == Some(Side::First));
        agent2.on_game_end(self.game, result.winner == Some(Side::Second));
        Ok(result)
    }

    /// Play one full turn for the current side
    ///
    /// The turn is not ended if the game finished during it.
    pub fn play_turn(&mut self, agent: &mut dyn Agent) -> Result<()> {
        self.game.start_turn()?;
        let mut taken = 0;
        while !self.game.is_over() && taken < self.max_actions_per_turn {
            let available = self.game.legal_actions();
            let Some(action) = agent.choose_action(self.game, &available)? else {
                break;
            };
            game_log!(self.game.logger, Verbose, "game", "chosen action: {:?}", action);
            self.game.apply_action(agent, action)?;
            taken += 1;
        }
        if !self.game.is_over() {
            self.game.end_turn()?;
        }
        Ok(())
    }

    fn result(&self, state_hashes: Vec<u64>) -> GameResult {
        let end_reason = if !self.game.is_over() {
            GameEndReason::TurnLimit
        } else {
            match self.game.winner() {
                None => GameEndReason::Draw,
                Some(winner) => {
                    let loser = self.game.player(winner.other());
                    if loser.health > 0 {
                        GameEndReason::Conceded(loser.side)
                    } else {
                        GameEndReason::HeroDeath(loser.side)
                    }
                }
            }
        };
        GameResult {
            winner: self.game.winner(),
            turns_played: self.game.turn(),
            end_reason,
            state_hashes,
        }
    }
}
