//! Error types for the game engine and the replay core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    /// An address or identity could not be matched against the live game
    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    /// Replay asked for more random numbers than were recorded
    #[error("Random trace exhausted after {consumed} draws")]
    ExhaustedRandomTrace { consumed: usize },

    #[error("Malformed replay: {0}")]
    MalformedReplay(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
