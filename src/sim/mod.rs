//! Game engine module
//!
//! All gameplay logic lives here. This module must be pure:
//! - Seeded RNG only (spawns)
//! - Stable traversal order per direction
//! - No rendering, input or storage dependencies

pub mod grid;
pub mod moves;
pub mod state;
pub mod turn;

pub use grid::{Grid, Position, can_merge, is_valid_tile};
pub use moves::{Direction, MoveRecord, MoveResult, can_move, resolve};
pub use state::{GamePhase, GameState, Spawn, new_game, spawn_random_tile};
pub use turn::{TurnOutcome, play_turn};
