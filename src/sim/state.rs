//! Game state and core session types
//!
//! A `GameState` is one play session: it owns the grid, the score and the
//! seeded RNG used for spawns. Nothing outside the engine writes to the grid.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};
use super::moves::{self, Direction, MoveResult};
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting moves
    Playing,
    /// Board is full with no merges left; only a new session can resume play
    GameOver,
}

/// A tile placed by a spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub position: Position,
    pub value: u32,
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// Returns None without touching the grid when it is full.
pub fn spawn_random_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Spawn> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let position = empty[rng.random_range(0..empty.len())];
    let value = if rng.random_bool(SPAWN_FOUR_PROBABILITY) {
        4
    } else {
        2
    };
    grid.set(position, value);
    Some(Spawn { position, value })
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    seed: u64,
    /// Spawn RNG, advanced only by spawns
    rng: Pcg32,
    grid: Grid,
    score: u64,
    phase: GamePhase,
    /// Accepted moves so far
    turns: u32,
}

impl GameState {
    /// Start a new `size x size` game with two seeded tiles.
    ///
    /// Panics if `size` is outside `MIN_SIZE..=MAX_SIZE`; that is a caller bug.
    pub fn new(size: usize, seed: u64) -> Self {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "board size {size} outside {MIN_SIZE}..={MAX_SIZE}"
        );

        let mut state = Self::from_grid(Grid::new(size), seed);
        for _ in 0..INITIAL_TILES {
            state.spawn_tile();
        }
        log::debug!("New {size}x{size} game with seed {seed}");
        state
    }

    /// Resume play on an existing grid with a zero score and no spawns
    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid,
            score: 0,
            phase: GamePhase::Playing,
            turns: 0,
        }
    }

    /// Resolve one directional input, updating grid and score in place.
    ///
    /// A `moved == false` result leaves the state untouched. This never
    /// spawns or changes phase; see [`super::play_turn`] for the full turn.
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        let (result, gained) = moves::resolve(&mut self.grid, direction);
        self.score += gained;
        result
    }

    /// Spawn one random tile. No-op when the board is full.
    pub fn spawn_tile(&mut self) -> Option<Spawn> {
        let spawn = spawn_random_tile(&mut self.grid, &mut self.rng);
        match spawn {
            Some(s) => log::debug!(
                "Spawned {} at ({}, {})",
                s.value,
                s.position.row,
                s.position.col
            ),
            None => log::debug!("Spawn skipped, board full"),
        }
        spawn
    }

    /// True iff every cell is filled and no adjacent pair is equal
    pub fn is_game_over(&self) -> bool {
        self.grid.is_full() && !self.grid.has_adjacent_pair()
    }

    /// Directions that would change the board right now
    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| moves::can_move(&self.grid, d))
            .collect()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    pub(crate) fn record_turn(&mut self) {
        self.turns += 1;
    }

    pub(crate) fn end(&mut self) {
        self.phase = GamePhase::GameOver;
    }
}

/// Start a new game seeded from OS entropy
pub fn new_game(size: usize) -> GameState {
    GameState::new(size, rand::random())
}
