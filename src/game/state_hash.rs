//! Deterministic state hashing for replay verification
//!
//! Hashes the serialized board snapshot, which leaves out entity ids, the
//! logger and the event buses. A live game and its replay produce the same
//! hash sequence exactly when they pass through the same states.

use crate::game::{BoardState, Game};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a deterministic hash of the game's board state
pub fn compute_state_hash(game: &Game) -> u64 {
    hash_board(&game.board_state())
}

pub fn hash_board(board: &BoardState) -> u64 {
    let canonical = match serde_json::to_string(board) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to serialize board state for hashing: {}", e);
            return 0;
        }
    };

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

/// Format a hash for display (shows first 8 hex digits)
pub fn format_hash(hash: u64) -> String {
    format!("{:08x}", (hash >> 32) as u32)
}
