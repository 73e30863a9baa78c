//! Tile grid with tunnel-wrap geometry.
//!
//! The set of wall cells is fixed at construction; only collectible cells
//! ever change, and only one way (to [`Tile::Empty`]).

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Contents of one maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable.
    Wall,
    /// Open floor with nothing on it.
    Empty,
    /// Consumable worth base points.
    Collectible,
    /// Consumable that starts power mode.
    PowerCollectible,
}

impl Tile {
    /// Parse a layout glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Empty),
            '.' => Some(Self::Collectible),
            'o' => Some(Self::PowerCollectible),
            _ => None,
        }
    }

    /// Layout glyph for this tile (inverse of [`Tile::from_glyph`]).
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => ' ',
            Self::Collectible => '.',
            Self::PowerCollectible => 'o',
        }
    }

    /// True for tiles counted toward level completion.
    #[must_use]
    pub const fn is_collectible(self) -> bool {
        matches!(self, Self::Collectible | Self::PowerCollectible)
    }

    /// True for every tile an entity may stand on.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// The maze grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Maze {
    /// Grid width in cells.
    width: usize,
    /// Grid height in cells.
    height: usize,
    /// Cells in row-major order.
    cells: Vec<Tile>,
}

impl Maze {
    /// Build a maze from layout rows (`#` wall, `.` collectible,
    /// `o` power collectible, space empty).
    ///
    /// Rejects empty layouts, rows of differing width, unknown glyphs and
    /// rows with exactly one open edge.
    pub fn from_layout<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 {
            return Err(GameError::EmptyLayout);
        }

        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(GameError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            let start = cells.len();
            for (x, glyph) in row.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(GameError::UnknownTile {
                    row: y,
                    column: x,
                    glyph,
                })?;
                cells.push(tile);
            }

            let left = cells[start];
            let right = cells[start + width - 1];
            if left.is_open() != right.is_open() {
                return Err(GameError::AsymmetricTunnel { row: y });
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Check if coordinates are within grid bounds.
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(GameError::OutOfBounds { x, y })
        }
    }

    /// Tile at `(x, y)`.
    pub fn tile_at(&self, x: i32, y: i32) -> Result<Tile> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite the tile at `(x, y)`.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<()> {
        let i = self.index(x, y)?;
        self.cells[i] = tile;
        Ok(())
    }

    /// Eat whatever is at `(x, y)`.
    ///
    /// Returns the tile found. Collectibles are replaced by
    /// [`Tile::Empty`]; every other tile is left as it was, so a second
    /// call on the same cell returns `Empty`.
    pub fn consume(&mut self, x: i32, y: i32) -> Result<Tile> {
        let i = self.index(x, y)?;
        let tile = self.cells[i];
        if tile.is_collectible() {
            self.cells[i] = Tile::Empty;
        }
        Ok(tile)
    }

    /// True if row `y` exists and both of its edge cells are open.
    #[must_use]
    pub fn is_wrap_row(&self, y: i32) -> bool {
        if y < 0 || y as usize >= self.height {
            return false;
        }
        let start = y as usize * self.width;
        self.cells[start].is_open() && self.cells[start + self.width - 1].is_open()
    }

    /// Number of collectible and power collectible tiles still present.
    #[must_use]
    pub fn count_collectibles(&self) -> usize {
        self.cells.iter().filter(|t| t.is_collectible()).count()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width)
    }

    /// Render the grid back into layout rows.
    #[must_use]
    pub fn to_layout(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|t| t.glyph()).collect())
            .collect()
    }
}
