//! Error types for the maze chase engine.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all engine errors.
///
/// Construction errors (`EmptyLayout`, `RaggedRow`, `AsymmetricTunnel`,
/// `UnknownTile`, `HomeBlocked`, `InvalidConfig`) are fatal and must abort
/// before a game begins. `OutOfBounds` only arises from broken movement
/// math. `Persistence` is always recoverable.
#[derive(Debug, Error)]
pub enum GameError {
    /// The maze layout has no rows or no columns.
    #[error("Maze layout is empty")]
    EmptyLayout,

    /// A layout row differs in width from the first row.
    #[error("Maze row {row} has width {found}, expected {expected}")]
    RaggedRow {
        /// Row index.
        row: usize,
        /// Width of row 0.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// A row has exactly one open edge.
    #[error("Maze row {row} has an asymmetric tunnel")]
    AsymmetricTunnel {
        /// Row index.
        row: usize,
    },

    /// The layout contains a glyph that maps to no tile.
    #[error("Unknown maze glyph '{glyph}' at row {row}, column {column}")]
    UnknownTile {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
        /// The offending character.
        glyph: char,
    },

    /// A spawn point lies on a wall or outside the maze.
    #[error("Home of {what} at ({x}, {y}) is not an open cell")]
    HomeBlocked {
        /// Which entity the home belongs to.
        what: String,
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// Tile query outside the grid.
    #[error("Position ({x}, {y}) is outside the maze")]
    OutOfBounds {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// Configuration values that cannot drive a game.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// High score could not be read or written.
    #[error("Score persistence failed: {0}")]
    Persistence(String),

    /// Invalid game state (e.g. undecodable snapshot bytes).
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
