//! Levels: a fresh maze per index plus the derived adversary cadence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adversary::{Identity, ADVERSARY_COUNT};
use crate::components::Position;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::maze::{Maze, Tile};

/// The fixed maze every level is built from.
pub const STANDARD_LAYOUT: [&str; 17] = [
    "###################",
    "#o.......#.......o#",
    "#.##.###.#.###.##.#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.### # ###.####",
    "    .#       #.    ",
    "####.# ##### #.####",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#o.#.....  .....#o#",
    "##.#.#.#####.#.#.##",
    "#....#...#...#....#",
    "#.######.#.######.#",
    "#.................#",
    "###################",
];

/// Player spawn on [`STANDARD_LAYOUT`].
pub const STANDARD_PLAYER_HOME: Position = Position::new(9, 11);

/// Adversary spawns on [`STANDARD_LAYOUT`], in [`Identity::ALL`] order.
pub const STANDARD_ADVERSARY_HOMES: [Position; ADVERSARY_COUNT] = [
    Position::new(7, 7),
    Position::new(8, 7),
    Position::new(10, 7),
    Position::new(11, 7),
];

/// Static description of the playfield: layout rows and spawn points.
///
/// The game always plays [`Blueprint::standard`]; tests build small
/// blueprints to force specific situations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blueprint {
    /// Layout rows, see [`Maze::from_layout`].
    pub layout: Vec<String>,
    /// Player spawn.
    pub player_home: Position,
    /// Adversary spawns in [`Identity::ALL`] order.
    pub adversary_homes: [Position; ADVERSARY_COUNT],
}

impl Blueprint {
    /// The fixed arcade playfield.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            layout: STANDARD_LAYOUT.iter().map(|row| (*row).to_string()).collect(),
            player_home: STANDARD_PLAYER_HOME,
            adversary_homes: STANDARD_ADVERSARY_HOMES,
        }
    }

    /// Build the maze and check that every home is an open cell.
    pub fn build_maze(&self) -> Result<Maze> {
        let maze = Maze::from_layout(&self.layout)?;

        check_home(&maze, "player", self.player_home)?;
        for (identity, home) in Identity::ALL.iter().zip(self.adversary_homes) {
            check_home(&maze, &format!("{identity:?}"), home)?;
        }

        Ok(maze)
    }
}

impl Default for Blueprint {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_home(maze: &Maze, what: &str, home: Position) -> Result<()> {
    match maze.tile_at(home.x, home.y) {
        Ok(tile) if tile.is_open() => Ok(()),
        _ => Err(GameError::HomeBlocked {
            what: what.to_string(),
            x: home.x,
            y: home.y,
        }),
    }
}

/// One level of play.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    index: u32,
    maze: Maze,
    remaining: usize,
    adversary_interval: Duration,
}

impl Level {
    /// Build level `index` (1-based) from a blueprint.
    pub fn create(index: u32, blueprint: &Blueprint, config: &GameConfig) -> Result<Self> {
        let maze = blueprint.build_maze()?;
        Ok(Self::with_maze(index, maze, config))
    }

    /// Wrap an already validated maze as level `index`.
    #[must_use]
    pub fn with_maze(index: u32, maze: Maze, config: &GameConfig) -> Self {
        let remaining = maze.count_collectibles();
        let adversary_interval = config.adversary_interval(index);

        tracing::debug!(
            index,
            remaining,
            interval_ms = adversary_interval.as_millis() as u64,
            "Level created"
        );

        Self {
            index,
            maze,
            remaining,
            adversary_interval,
        }
    }

    /// Level number, starting at 1.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The level's maze.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Collectibles left to eat.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// How often adversaries move on this level.
    #[must_use]
    pub const fn adversary_interval(&self) -> Duration {
        self.adversary_interval
    }

    /// True once every collectible is gone.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    /// Eat the tile at `at`, keeping the remaining count in step with the
    /// maze. Returns the tile that was there.
    pub fn consume(&mut self, at: Position) -> Result<Tile> {
        let tile = self.maze.consume(at.x, at.y)?;
        if tile.is_collectible() {
            self.remaining -= 1;
        }
        Ok(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_blueprint_is_valid() {
        let maze = Blueprint::standard().build_maze().unwrap();
        assert_eq!(maze.width(), 19);
        assert_eq!(maze.height(), 17);
        assert!(maze.is_wrap_row(7));
        assert_eq!(
            (0..17).filter(|&y| maze.is_wrap_row(y)).count(),
            1,
            "only the middle row is a tunnel"
        );
    }

    #[test]
    fn test_create_counts_collectibles() {
        let config = GameConfig::default();
        let level = Level::create(1, &Blueprint::standard(), &config).unwrap();
        assert_eq!(level.index(), 1);
        assert_eq!(level.remaining(), 141);
        assert_eq!(level.remaining(), level.maze().count_collectibles());
        assert_eq!(level.adversary_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_consume_keeps_count_in_step() {
        let config = GameConfig::default();
        let mut level = Level::create(3, &Blueprint::standard(), &config).unwrap();
        let before = level.remaining();

        assert_eq!(level.consume(Position::new(1, 1)).unwrap(), Tile::PowerCollectible);
        assert_eq!(level.consume(Position::new(2, 1)).unwrap(), Tile::Collectible);
        assert_eq!(level.consume(Position::new(2, 1)).unwrap(), Tile::Empty);
        assert_eq!(level.consume(STANDARD_PLAYER_HOME).unwrap(), Tile::Empty);

        assert_eq!(level.remaining(), before - 2);
        assert_eq!(level.remaining(), level.maze().count_collectibles());
        assert_eq!(level.adversary_interval(), Duration::from_millis(450));
    }

    #[test]
    fn test_blocked_home_is_rejected() {
        let blueprint = Blueprint {
            player_home: Position::new(0, 0),
            ..Blueprint::standard()
        };
        assert!(matches!(
            blueprint.build_maze(),
            Err(GameError::HomeBlocked { x: 0, y: 0, .. })
        ));
    }
}
