//! Merge 2048 - A sliding-tile merge puzzle
//!
//! Core modules:
//! - `sim`: Pure game engine (grid, move resolution, spawns, terminal state)
//! - `highscores`: Top-10 leaderboard
//! - `settings`: Player preferences
//! - `persistence`: Save/continue for an in-progress game
//! - `platform`: Browser/native platform abstraction (storage, time, JS bindings)

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{GridError, ParseDirectionError, PersistError, StorageError};
pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{Direction, GameState, MoveRecord, MoveResult, TurnOutcome, play_turn};

/// Game configuration constants
pub mod consts {
    /// Reference board edge length
    pub const DEFAULT_SIZE: usize = 4;
    /// Smallest board a new game may be created with
    pub const MIN_SIZE: usize = 2;
    /// Largest board a new game may be created with
    pub const MAX_SIZE: usize = 8;

    /// Chance that a spawned tile is a 4 instead of a 2
    pub const SPAWN_FOUR_PROBABILITY: f64 = 0.1;
    /// Tiles placed on an empty board when a game starts
    pub const INITIAL_TILES: usize = 2;

    /// Largest tile value; two of these never merge, so doubling stays in `u32`
    pub const MAX_TILE: u32 = 1 << 30;

    /// Leaderboard length
    pub const MAX_HIGH_SCORES: usize = 10;
}
