//! The player-controlled agent.

use serde::{Deserialize, Serialize};

use crate::components::{Direction, InputCommand, Position};
use crate::maze::Maze;
use crate::movement::target_cell;

/// Lives a fresh player starts with.
pub const DEFAULT_LIVES: u32 = 3;

/// The player agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    home: Position,
    position: Position,
    direction: Direction,
    lives: u32,
}

impl Player {
    /// Facing used at spawn and after every respawn.
    pub const SPAWN_DIRECTION: Direction = Direction::Right;

    /// Create a player standing at `home` with `lives` lives.
    #[must_use]
    pub const fn new(home: Position, lives: u32) -> Self {
        Self {
            home,
            position: home,
            direction: Self::SPAWN_DIRECTION,
            lives,
        }
    }

    /// Spawn point.
    #[must_use]
    pub const fn home(&self) -> Position {
        self.home
    }

    /// Current cell.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current facing.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Teleport to `position` without changing facing.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Apply an input command. Only direction commands change anything.
    pub fn handle_input(&mut self, command: InputCommand) {
        if let Some(direction) = command.direction() {
            self.direction = direction;
        }
    }

    /// Move one cell in the current facing.
    ///
    /// Returns `true` if the position changed. A blocked step keeps the
    /// requested facing, so the player keeps pushing against the wall until
    /// an open direction is requested.
    pub fn step(&mut self, maze: &Maze) -> bool {
        match target_cell(maze, self.position, self.direction) {
            Some(next) => {
                self.position = next;
                true
            }
            None => false,
        }
    }

    /// Put the player back on its spawn point with the spawn facing.
    pub fn reset_to_home(&mut self) {
        self.position = self.home;
        self.direction = Self::SPAWN_DIRECTION;
    }

    /// Remove one life, never going below zero.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// True once no lives remain.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.lives == 0
    }

    /// Grant an extra life.
    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    /// Restore a full life count, as at the start of a game.
    pub fn reset_lives(&mut self, lives: u32) {
        self.lives = lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Maze {
        Maze::from_layout(&["#####", "#...#", "#####"]).unwrap()
    }

    #[test]
    fn test_new_player() {
        let player = Player::new(Position::new(1, 1), DEFAULT_LIVES);
        assert_eq!(player.position(), Position::new(1, 1));
        assert_eq!(player.direction(), Direction::Right);
        assert_eq!(player.lives(), 3);
        assert!(!player.is_dead());
    }

    #[test]
    fn test_blocked_step_keeps_intent() {
        let maze = corridor();
        let mut player = Player::new(Position::new(1, 1), DEFAULT_LIVES);
        player.handle_input(InputCommand::Up);
        assert!(!player.step(&maze));
        assert_eq!(player.position(), Position::new(1, 1));
        assert_eq!(player.direction(), Direction::Up);
    }

    #[test]
    fn test_step_and_reset() {
        let maze = corridor();
        let mut player = Player::new(Position::new(1, 1), DEFAULT_LIVES);
        assert!(player.step(&maze));
        assert!(player.step(&maze));
        assert!(!player.step(&maze));
        assert_eq!(player.position(), Position::new(3, 1));

        player.handle_input(InputCommand::Left);
        player.reset_to_home();
        assert_eq!(player.position(), Position::new(1, 1));
        assert_eq!(player.direction(), Direction::Right);
    }

    #[test]
    fn test_other_and_quit_are_ignored() {
        let mut player = Player::new(Position::new(1, 1), DEFAULT_LIVES);
        player.handle_input(InputCommand::Down);
        player.handle_input(InputCommand::Other);
        player.handle_input(InputCommand::Quit);
        assert_eq!(player.direction(), Direction::Down);
    }

    #[test]
    fn test_lives_floor_at_zero() {
        let mut player = Player::new(Position::new(1, 1), 1);
        player.lose_life();
        assert!(player.is_dead());
        player.lose_life();
        assert_eq!(player.lives(), 0);

        player.add_life();
        assert_eq!(player.lives(), 1);
        player.reset_lives(DEFAULT_LIVES);
        assert_eq!(player.lives(), DEFAULT_LIVES);
    }
}
