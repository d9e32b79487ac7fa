//! Directional move resolution
//!
//! A move pulls every tile toward one wall. Cells are visited starting from the
//! side nearest that wall so a tile that has already moved is never picked up
//! again, and each destination cell can absorb at most one merge per move.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position, can_merge};
use crate::error::ParseDirectionError;

/// A direction to pull tiles toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step `(dr, dc)` each tile is pulled along
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Source cells in resolution order for a `rows x cols` grid.
    ///
    /// The row or column already touching the destination wall is skipped
    /// since nothing there can move further.
    pub fn traversal(self, rows: usize, cols: usize) -> Vec<Position> {
        let mut order = Vec::with_capacity(rows * cols);
        match self {
            Direction::Up => {
                for col in 0..cols {
                    for row in 1..rows {
                        order.push(Position::new(row, col));
                    }
                }
            }
            Direction::Down => {
                for col in 0..cols {
                    for row in (0..rows.saturating_sub(1)).rev() {
                        order.push(Position::new(row, col));
                    }
                }
            }
            Direction::Left => {
                for row in 0..rows {
                    for col in 1..cols {
                        order.push(Position::new(row, col));
                    }
                }
            }
            Direction::Right => {
                for row in 0..rows {
                    for col in (0..cols.saturating_sub(1)).rev() {
                        order.push(Position::new(row, col));
                    }
                }
            }
        }
        order
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts names, arrow-key codes and WASD
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "w" | "arrowup" => Ok(Direction::Up),
            "down" | "s" | "arrowdown" => Ok(Direction::Down),
            "left" | "a" | "arrowleft" => Ok(Direction::Left),
            "right" | "d" | "arrowright" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// One tile displacement during a move, for animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    /// Value of the moving tile (pre-merge value for merges)
    pub value: u32,
    pub merged: bool,
}

/// Outcome of resolving one direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// False means nothing changed; the caller must not spawn or count a turn
    pub moved: bool,
    /// Displacements in resolution order
    pub moves: Vec<MoveRecord>,
}

impl MoveResult {
    /// Number of merges in this move
    pub fn merge_count(&self) -> usize {
        self.moves.iter().filter(|m| m.merged).count()
    }
}

/// Resolve `direction` on `grid` in place.
///
/// Returns the move trace and the score gained (sum of merged tile values).
/// When nothing can move the grid is left untouched.
pub fn resolve(grid: &mut Grid, direction: Direction) -> (MoveResult, u64) {
    let (dr, dc) = direction.delta();
    let cols = grid.cols();
    // Move-scoped: which destinations already absorbed a merge
    let mut merged = vec![false; grid.rows() * cols];
    let mut result = MoveResult::default();
    let mut gained = 0u64;

    for source in direction.traversal(grid.rows(), cols) {
        let value = grid.get(source);
        if value == 0 {
            continue;
        }

        let mut current = source;
        while let Some(target) = grid.step(current, dr, dc) {
            let target_value = grid.get(target);
            if target_value == 0 {
                grid.set(target, value);
                grid.set(current, 0);
                result.moves.push(MoveRecord {
                    from: current,
                    to: target,
                    value,
                    merged: false,
                });
                current = target;
                result.moved = true;
            } else if target_value == value
                && can_merge(value)
                && !merged[target.row * cols + target.col]
            {
                let doubled = value * 2;
                grid.set(target, doubled);
                grid.set(current, 0);
                merged[target.row * cols + target.col] = true;
                gained += u64::from(doubled);
                result.moves.push(MoveRecord {
                    from: current,
                    to: target,
                    value,
                    merged: true,
                });
                result.moved = true;
                break;
            } else {
                break;
            }
        }
    }

    (result, gained)
}

/// True if `direction` would change `grid`
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    let mut scratch = grid.clone();
    resolve(&mut scratch, direction).0.moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u32]]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_left_merges_pair() {
        let mut g = grid(&[&[2, 2, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);
        let (result, gained) = resolve(&mut g, Direction::Left);
        assert!(result.moved);
        assert_eq!(gained, 4);
        assert_eq!(g.to_rows()[0], vec![4, 0, 0, 0]);
        assert_eq!(
            result.moves,
            vec![MoveRecord {
                from: Position::new(0, 1),
                to: Position::new(0, 0),
                value: 2,
                merged: true,
            }]
        );
    }

    #[test]
    fn test_right_on_single_row() {
        let mut g = grid(&[&[0, 0, 2, 2]]);
        let (result, gained) = resolve(&mut g, Direction::Right);
        assert!(result.moved);
        assert_eq!(gained, 4);
        assert_eq!(g.cells(), &[0, 0, 0, 4]);
    }

    #[test]
    fn test_no_double_merge_in_one_move() {
        let mut g = grid(&[&[2, 2, 2, 0]]);
        let (result, gained) = resolve(&mut g, Direction::Left);
        assert!(result.moved);
        assert_eq!(g.cells(), &[4, 2, 0, 0]);
        assert_eq!(gained, 4);
        assert_eq!(result.merge_count(), 1);
    }

    #[test]
    fn test_two_pairs_merge_separately() {
        let mut g = grid(&[&[2, 2, 4, 4]]);
        let (_, gained) = resolve(&mut g, Direction::Left);
        assert_eq!(g.cells(), &[4, 8, 0, 0]);
        assert_eq!(gained, 12);

        let mut g = grid(&[&[4, 4, 4, 4]]);
        let (_, gained) = resolve(&mut g, Direction::Right);
        assert_eq!(g.cells(), &[0, 0, 8, 8]);
        assert_eq!(gained, 16);
    }

    #[test]
    fn test_merged_tile_does_not_absorb_again() {
        // The 4 created at column 0 must not swallow the incoming 4
        let mut g = grid(&[&[2, 2, 4, 0]]);
        resolve(&mut g, Direction::Left);
        assert_eq!(g.cells(), &[4, 4, 0, 0]);
    }

    #[test]
    fn test_slide_multiple_cells_records_each_step() {
        let mut g = grid(&[&[0, 0, 0, 8]]);
        let (result, gained) = resolve(&mut g, Direction::Left);
        assert_eq!(g.cells(), &[8, 0, 0, 0]);
        assert_eq!(gained, 0);
        let steps: Vec<(usize, usize)> = result
            .moves
            .iter()
            .map(|m| (m.from.col, m.to.col))
            .collect();
        assert_eq!(steps, vec![(3, 2), (2, 1), (1, 0)]);
        assert!(result.moves.iter().all(|m| !m.merged && m.value == 8));
    }

    #[test]
    fn test_vertical_moves() {
        let mut g = grid(&[&[2, 0], &[2, 4], &[0, 4]]);
        let (result, gained) = resolve(&mut g, Direction::Up);
        assert!(result.moved);
        assert_eq!(g.to_rows(), vec![vec![4, 8], vec![0, 0], vec![0, 0]]);
        assert_eq!(gained, 12);

        let mut g = grid(&[&[2, 0], &[0, 0], &[2, 0]]);
        resolve(&mut g, Direction::Down);
        assert_eq!(g.to_rows(), vec![vec![0, 0], vec![0, 0], vec![4, 0]]);
    }

    #[test]
    fn test_max_tiles_never_merge() {
        use crate::consts::MAX_TILE;

        let original = grid(&[&[MAX_TILE, MAX_TILE]]);
        let mut g = original.clone();
        let (result, gained) = resolve(&mut g, Direction::Left);
        assert!(!result.moved);
        assert_eq!(gained, 0);
        assert_eq!(g, original);

        // One step below the cap still merges, landing exactly on it
        let half = MAX_TILE / 2;
        let mut g = grid(&[&[0, half, half]]);
        let (result, gained) = resolve(&mut g, Direction::Right);
        assert!(result.moved);
        assert_eq!(g.cells(), &[0, 0, MAX_TILE]);
        assert_eq!(gained, u64::from(MAX_TILE));
        assert_eq!(g.tile_sum(), u64::from(MAX_TILE));
    }

    #[test]
    fn test_blocked_move_is_noop() {
        let original = grid(&[&[2, 4], &[0, 0]]);
        let mut g = original.clone();
        let (result, gained) = resolve(&mut g, Direction::Up);
        assert!(!result.moved);
        assert!(result.moves.is_empty());
        assert_eq!(gained, 0);
        assert_eq!(g, original);
        assert!(!can_move(&original, Direction::Left));
        assert!(can_move(&original, Direction::Down));
    }

    #[test]
    fn test_traversal_order() {
        let up = Direction::Up.traversal(3, 2);
        assert_eq!(
            up,
            vec![
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(1, 1),
                Position::new(2, 1)
            ]
        );
        let right = Direction::Right.traversal(1, 4);
        assert_eq!(
            right,
            vec![Position::new(0, 2), Position::new(0, 1), Position::new(0, 0)]
        );
        let down = Direction::Down.traversal(3, 1);
        assert_eq!(down, vec![Position::new(1, 0), Position::new(0, 0)]);
        assert_eq!(Direction::Left.traversal(2, 1), Vec::<Position>::new());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("ArrowLeft".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" s ".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!("d".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(ParseDirectionError("sideways".to_string()))
        );
        for dir in Direction::ALL {
            assert_eq!(dir.to_string().parse::<Direction>(), Ok(dir));
        }
    }
}
