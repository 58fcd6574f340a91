//! hsgame - deterministic record/replay for a turn-based card game
//!
//! A small two-player card game simulation with an event bus, a recorder
//! that rebuilds a minimal action log from observed events, a text format
//! for that log, and a player that re-drives a fresh game from it.

pub mod core;
pub mod error;
pub mod events;
pub mod game;
pub mod loader;
pub mod replay;

pub use error::{GameError, Result};
