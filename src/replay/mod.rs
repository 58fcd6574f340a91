//! Record and replay
//!
//! Recording listens to a live game's events and keeps the minimal action
//! log, the random trace and the mulligan keep-sets. The codec turns that
//! into the line-oriented replay text and back, and the replay player
//! re-drives a fresh game from it.

pub mod action;
pub mod address;
pub mod codec;
pub mod player;
pub mod random;
pub mod recorder;

pub use action::{Action, Replay};
pub use address::{EntityAddress, LiveEntity};
pub use codec::{decode, encode};
pub use player::{DriverState, ReplayAgent, ReplayOutcome, ReplayPlayer};
pub use random::{replay_source, CapturingRandom, NullRandom, RandomSource, ReplayRandom, SeededRandom};
pub use recorder::{subscribe, Recorder, RecordingAgent, RecordingGame, Subscription};
