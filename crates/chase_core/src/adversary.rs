//! Autonomous adversaries and their behavior state machine.
//!
//! The state decides what happens when an adversary meets the player
//! (capture, hit, or nothing). It does not change how the adversary moves:
//! every state wanders with the same no-U-turn random policy.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Direction, Position};
use crate::maze::Maze;
use crate::movement::{open_directions, target_cell};

/// Number of adversaries in every game.
pub const ADVERSARY_COUNT: usize = 4;

/// Cosmetic identity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// Red.
    Blinky,
    /// Cyan.
    Inky,
    /// Pink.
    Pinky,
    /// Orange.
    Clyde,
}

impl Identity {
    /// All identities in spawn order.
    pub const ALL: [Identity; ADVERSARY_COUNT] = [
        Identity::Blinky,
        Identity::Inky,
        Identity::Pinky,
        Identity::Clyde,
    ];

    /// Single-character glyph for text renderers.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Blinky => 'B',
            Self::Inky => 'I',
            Self::Pinky => 'P',
            Self::Clyde => 'Y',
        }
    }
}

/// Behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdversaryState {
    /// Pursuit; dangerous to the player.
    #[default]
    Chase,
    /// Retreat; dangerous to the player.
    Scatter,
    /// Power mode is active; can be captured.
    Frightened,
    /// Just captured. Never persists past the capture itself.
    Eaten,
}

/// What a meeting between player and adversary results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The player captures the adversary.
    Capture,
    /// The adversary hits the player.
    Hit,
    /// Nothing happens.
    Harmless,
}

impl AdversaryState {
    /// Outcome of the player sharing a cell with an adversary in this state.
    #[must_use]
    pub const fn contact(self) -> Contact {
        match self {
            Self::Frightened => Contact::Capture,
            Self::Chase | Self::Scatter => Contact::Hit,
            Self::Eaten => Contact::Harmless,
        }
    }

    /// True while the adversary can be captured.
    #[must_use]
    pub const fn is_vulnerable(self) -> bool {
        matches!(self, Self::Frightened)
    }
}

/// One adversary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Adversary {
    identity: Identity,
    home: Position,
    position: Position,
    direction: Direction,
    state: AdversaryState,
}

impl Adversary {
    /// Facing used at spawn and after every return home.
    pub const SPAWN_DIRECTION: Direction = Direction::Left;

    /// Create an adversary at `home` in [`AdversaryState::Chase`].
    #[must_use]
    pub const fn new(identity: Identity, home: Position) -> Self {
        Self {
            identity,
            home,
            position: home,
            direction: Self::SPAWN_DIRECTION,
            state: AdversaryState::Chase,
        }
    }

    /// Identity tag.
    #[must_use]
    pub const fn identity(&self) -> Identity {
        self.identity
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

    /// Current heading.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current behavior state.
    #[must_use]
    pub const fn state(&self) -> AdversaryState {
        self.state
    }

    /// Teleport to `position` without changing heading or state.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Change behavior state.
    pub fn set_state(&mut self, state: AdversaryState) {
        self.state = state;
    }

    /// Teleport home and resume chasing.
    pub fn send_home(&mut self) {
        self.position = self.home;
        self.direction = Self::SPAWN_DIRECTION;
        self.state = AdversaryState::Chase;
    }

    /// Run the capture transition: Eaten for the instant of the capture,
    /// then straight back home in Chase.
    pub fn capture(&mut self) {
        self.state = AdversaryState::Eaten;
        tracing::debug!(identity = ?self.identity, at = ?self.position, "Adversary captured");
        self.send_home();
    }

    /// Pick the next heading.
    ///
    /// Candidates are the open directions except the reverse of the current
    /// heading; the reverse is allowed only when nothing else is open.
    /// Returns `None` if the adversary is boxed in.
    pub fn choose_direction<R: Rng + ?Sized>(&self, maze: &Maze, rng: &mut R) -> Option<Direction> {
        let open = open_directions(maze, self.position);
        let reverse = self.direction.opposite();
        let forward: Vec<Direction> = open.iter().copied().filter(|&d| d != reverse).collect();

        if forward.is_empty() {
            open.choose(rng).copied()
        } else {
            forward.choose(rng).copied()
        }
    }

    /// Take one random step. Returns `true` if the position changed.
    pub fn wander<R: Rng + ?Sized>(&mut self, maze: &Maze, rng: &mut R) -> bool {
        let Some(direction) = self.choose_direction(maze, rng) else {
            return false;
        };
        self.direction = direction;
        match target_cell(maze, self.position, direction) {
            Some(next) => {
                self.position = next;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_contact_outcomes() {
        assert_eq!(AdversaryState::Frightened.contact(), Contact::Capture);
        assert_eq!(AdversaryState::Chase.contact(), Contact::Hit);
        assert_eq!(AdversaryState::Scatter.contact(), Contact::Hit);
        assert_eq!(AdversaryState::Eaten.contact(), Contact::Harmless);
    }

    #[test]
    fn test_identity_glyphs_are_distinct() {
        let mut glyphs: Vec<char> = Identity::ALL.iter().map(|i| i.glyph()).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), ADVERSARY_COUNT);
    }

    #[test]
    fn test_no_u_turn_in_corridor() {
        let maze = Maze::from_layout(&["#######", "#.....#", "#######"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut adv = Adversary::new(Identity::Blinky, Position::new(3, 1));

        // Heading left: the only non-reversing option is to keep going left.
        for _ in 0..20 {
            assert_eq!(adv.choose_direction(&maze, &mut rng), Some(Direction::Left));
        }

        assert!(adv.wander(&maze, &mut rng));
        assert!(adv.wander(&maze, &mut rng));
        assert_eq!(adv.position(), Position::new(1, 1));

        // Dead end: reversing is the only way out.
        assert!(adv.wander(&maze, &mut rng));
        assert_eq!(adv.direction(), Direction::Right);
        assert_eq!(adv.position(), Position::new(2, 1));
    }

    #[test]
    fn test_boxed_in_stays_put() {
        let maze = Maze::from_layout(&["###", "#.#", "###"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut adv = Adversary::new(Identity::Inky, Position::new(1, 1));
        assert_eq!(adv.choose_direction(&maze, &mut rng), None);
        assert!(!adv.wander(&maze, &mut rng));
        assert_eq!(adv.position(), Position::new(1, 1));
    }

    #[test]
    fn test_junction_choice_is_spread() {
        let maze = Maze::from_layout(&["#####", "##.##", "#...#", "#####"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let adv = Adversary::new(Identity::Pinky, Position::new(2, 2));

        // Heading left at a T junction: up and left are candidates, right is the reverse.
        let mut seen_up = false;
        let mut seen_left = false;
        for _ in 0..200 {
            match adv.choose_direction(&maze, &mut rng) {
                Some(Direction::Up) => seen_up = true,
                Some(Direction::Left) => seen_left = true,
                other => panic!("unexpected choice {other:?}"),
            }
        }
        assert!(seen_up && seen_left);
    }

    #[test]
    fn test_capture_sends_home_in_chase() {
        let maze = Maze::from_layout(&["#####", "#...#", "#####"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut adv = Adversary::new(Identity::Clyde, Position::new(3, 1));
        adv.wander(&maze, &mut rng);
        adv.set_state(AdversaryState::Frightened);
        assert!(adv.state().is_vulnerable());

        adv.capture();
        assert_eq!(adv.position(), adv.home());
        assert_eq!(adv.state(), AdversaryState::Chase);
    }
}
