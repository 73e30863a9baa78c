//! Reproducibility testing utilities.
//!
//! A game built from the same seed and fed the same timed events must end in
//! the same state. This is what makes the seeded adversary movement usable
//! in tests; it is not a replay format.
//!
//! Sources of non-reproducibility to watch for:
//!
//! - **Wall clock**: the engine never reads it; every event carries `now`.
//! - **System randomness**: adversaries draw from the game's own seeded
//!   ChaCha generator.
//! - **HashMap iteration order**: the engine keeps adversaries in a fixed
//!   array and never iterates a hash map.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use chase_core::components::InputCommand;
use chase_core::game::{Event, Game};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic game).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert all runs matched.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Game is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run any state machine multiple times and verify it ends in the same state.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, u64),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for index in 0..steps {
            step(&mut state, index);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Feed a fixed input script into games built by `setup`.
///
/// Each entry of `inputs` is sent as an input event, followed by a heartbeat
/// `period` later; the clock keeps advancing by `period` per entry.
pub fn verify_game_determinism<F>(
    setup: F,
    inputs: &[InputCommand],
    period: Duration,
    runs: usize,
) -> DeterminismResult
where
    F: Fn() -> Game,
{
    verify_determinism(
        runs,
        inputs.len() as u64,
        &setup,
        |game, index| {
            let now = period * (index as u32 + 1);
            game.handle(Event::Input(inputs[index as usize]), now);
            game.handle(Event::Heartbeat, now + period / 2);
        },
        Game::state_hash,
    )
}

/// Step two games through the same heartbeat stream, returning the first
/// heartbeat index at which their hashes differ.
///
/// `None` if the games stay identical for `steps` heartbeats.
pub fn find_first_divergence<F>(setup: F, steps: u64, period: Duration) -> Option<u64>
where
    F: Fn() -> Game,
{
    let mut first = setup();
    let mut second = setup();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for index in 1..=steps {
        let now = period * index as u32;
        first.heartbeat(now);
        second.heartbeat(now);

        if first.state_hash() != second.state_hash() {
            tracing::warn!(index, "Games diverged");
            return Some(index);
        }
    }

    None
}

/// Verify that a serialization round trip preserves the game hash, both
/// immediately and after further heartbeats.
pub fn verify_serialization_determinism(game: &Game, now: Duration, period: Duration) -> bool {
    let Ok(bytes) = game.serialize() else {
        return false;
    };
    let Ok(mut restored) = Game::deserialize(&bytes) else {
        return false;
    };
    if restored.state_hash() != game.state_hash() {
        return false;
    }

    let mut original = game.clone();
    for index in 1..=10u32 {
        original.heartbeat(now + period * index);
        restored.heartbeat(now + period * index);
    }
    original.state_hash() == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for engine inputs.
pub mod strategies {
    use chase_core::components::{Direction, InputCommand, Position};
    use proptest::prelude::*;

    /// Any of the four directions.
    pub fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    /// Any command except Quit, weighted toward directions.
    pub fn arb_input() -> impl Strategy<Value = InputCommand> {
        prop_oneof![
            9 => arb_direction().prop_map(InputCommand::from),
            1 => Just(InputCommand::Other),
        ]
    }

    /// A sequence of commands without Quit.
    pub fn arb_input_sequence(max_len: usize) -> impl Strategy<Value = Vec<InputCommand>> {
        proptest::collection::vec(arb_input(), 0..max_len)
    }

    /// A cell inside a `width` x `height` grid.
    pub fn arb_position(width: i32, height: i32) -> impl Strategy<Value = Position> {
        (0..width, 0..height).prop_map(|(x, y)| Position::new(x, y))
    }

    /// Rows of a random valid layout: a wall border with random interior
    /// tiles and an optional tunnel row.
    pub fn arb_layout() -> impl Strategy<Value = Vec<String>> {
        (3usize..12, 3usize..10)
            .prop_flat_map(|(width, height)| {
                let interior = proptest::collection::vec(
                    proptest::sample::select(vec!['#', '.', 'o', ' ']),
                    width * height,
                );
                (Just(width), Just(height), interior, proptest::option::of(1..height - 1))
            })
            .prop_map(|(width, height, interior, tunnel)| {
                (0..height)
                    .map(|y| {
                        (0..width)
                            .map(|x| {
                                let edge = x == 0 || x == width - 1;
                                if y == 0 || y == height - 1 {
                                    '#'
                                } else if edge {
                                    if tunnel == Some(y) {
                                        ' '
                                    } else {
                                        '#'
                                    }
                                } else {
                                    interior[y * width + x]
                                }
                            })
                            .collect::<String>()
                    })
                    .collect::<Vec<String>>()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::fixtures::{chaser_blueprint, fixture_game, ms, standard_game};
    use chase_core::config::GameConfig;
    use chase_core::maze::Maze;
    use proptest::prelude::*;
    use strategies::{arb_input_sequence, arb_layout};

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n, _| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_detects_divergence() {
        let runs = Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                runs.set(runs.get() + 1);
                runs.get()
            },
            |n, _| *n += 1,
            |n| compute_hash(n),
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 2);
    }

    #[test]
    fn test_standard_game_determinism() {
        let result = verify_determinism(
            3,
            600,
            || standard_game(42),
            |game, index| {
                game.heartbeat(ms(100 * (index + 1)));
            },
            Game::state_hash,
        );
        result.assert_deterministic();
    }

    #[test]
    fn test_no_divergence_on_chaser() {
        let divergence = find_first_divergence(
            || fixture_game(chaser_blueprint(), GameConfig::with_seed(3), 0),
            200,
            ms(100),
        );
        assert!(divergence.is_none());
    }

    #[test]
    fn test_serialization_preserves_game() {
        let mut game = standard_game(8);
        for step in 1..=30 {
            game.heartbeat(ms(step * 100));
        }
        assert!(verify_serialization_determinism(&game, ms(3_000), ms(100)));
    }

    proptest! {
        #[test]
        fn prop_input_scripts_are_reproducible(inputs in arb_input_sequence(60), seed in any::<u64>()) {
            let result = verify_game_determinism(|| standard_game(seed), &inputs, ms(100), 2);
            prop_assert!(result.is_deterministic);
        }

        #[test]
        fn prop_generated_layouts_are_valid(rows in arb_layout()) {
            prop_assert!(Maze::from_layout(&rows).is_ok());
        }
    }
}
