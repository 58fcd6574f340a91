//! Game simulation: state, turn operations, agents and the game loop

pub mod agent;
pub mod effects;
pub mod game_event;
pub mod game_loop;
pub mod logger;
pub mod random_agent;
pub mod scripted_agent;
pub mod state;
pub mod state_hash;
pub mod zero_agent;

pub use agent::{Agent, TargetRequest, TurnAction};
pub use game_event::{GameEvent, GameEventKind};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel, DEFAULT_MAX_TURNS};
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode};
pub use random_agent::RandomAgent;
pub use scripted_agent::ScriptedAgent;
pub use state::{BoardState, Character, CharacterList, Game, MinionState, PlayerState};
pub use state_hash::{compute_state_hash, format_hash, hash_board};
pub use zero_agent::ZeroAgent;
