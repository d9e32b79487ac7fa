//! One full player turn
//!
//! Front-ends drive the engine through here: move, spawn once if the board
//! changed, then check for a terminal board.

use serde::{Deserialize, Serialize};

use super::moves::{Direction, MoveRecord};
use super::state::{GamePhase, GameState, Spawn};

/// Everything a renderer needs to animate and report one turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub moved: bool,
    pub moves: Vec<MoveRecord>,
    pub score_gained: u64,
    pub spawned: Option<Spawn>,
    /// Set on the turn that ended the game
    pub game_over: bool,
}

/// Advance `state` by one directional input.
///
/// Rejected inputs (nothing moves, or the game already ended) return an
/// outcome with `moved == false` and do not count as a turn.
pub fn play_turn(state: &mut GameState, direction: Direction) -> TurnOutcome {
    if state.phase() == GamePhase::GameOver {
        return TurnOutcome::default();
    }

    let score_before = state.score();
    let result = state.apply_move(direction);
    if !result.moved {
        return TurnOutcome {
            moves: result.moves,
            ..Default::default()
        };
    }

    state.record_turn();
    let spawned = state.spawn_tile();
    let game_over = state.is_game_over();
    if game_over {
        state.end();
        log::info!(
            "Game over after {} turns: score {}, best tile {}",
            state.turns(),
            state.score(),
            state.max_tile()
        );
    }

    TurnOutcome {
        moved: true,
        moves: result.moves,
        score_gained: state.score() - score_before,
        spawned,
        game_over,
    }
}
