//! The single movement rule shared by every mobile entity.
//!
//! A move is a unit step, wrapped horizontally on tunnel rows, and is legal
//! iff the resulting cell is not a wall. Player and adversaries both go
//! through [`target_cell`]; nothing else in the engine moves an entity
//! except home teleports.

use crate::components::{Direction, Position};
use crate::maze::Maze;

/// Where a step from `from` in `direction` would land, or `None` if the
/// move is blocked.
#[must_use]
pub fn target_cell(maze: &Maze, from: Position, direction: Direction) -> Option<Position> {
    let mut next = from.step(direction);

    if maze.is_wrap_row(next.y) {
        let width = maze.width() as i32;
        if next.x < 0 {
            next.x = width - 1;
        } else if next.x >= width {
            next.x = 0;
        }
    }

    match maze.tile_at(next.x, next.y) {
        Ok(tile) if tile.is_open() => Some(next),
        Ok(_) => None,
        Err(err) => {
            tracing::error!(?from, ?direction, %err, "Movement left the maze");
            None
        }
    }
}

/// True if a step from `from` in `direction` is legal.
#[must_use]
pub fn can_move(maze: &Maze, from: Position, direction: Direction) -> bool {
    target_cell(maze, from, direction).is_some()
}

/// Every direction that can be taken from `from`, in [`Direction::ALL`]
/// order.
#[must_use]
pub fn open_directions(maze: &Maze, from: Position) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&d| can_move(maze, from, d))
        .collect()
}
