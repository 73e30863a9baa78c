//! Read-only views of a running game for presentation sinks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adversary::{AdversaryState, Identity};
use crate::components::{Direction, Position};
use crate::game::{Game, PhaseKind};

/// Player as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Current cell.
    pub position: Position,
    /// Current facing.
    pub direction: Direction,
    /// Remaining lives.
    pub lives: u32,
}

/// Adversary as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryView {
    /// Identity tag.
    pub identity: Identity,
    /// Current cell.
    pub position: Position,
    /// Behavior state.
    pub state: AdversaryState,
}

/// Everything a presentation sink needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Orchestrator phase.
    pub phase: PhaseKind,
    /// Whole seconds until a Respawning or LevelIntro pause ends, rounded up.
    pub countdown_secs: Option<u64>,
    /// Level number, starting at 1.
    pub level: u32,
    /// Maze rows in layout glyphs, without agents.
    pub maze: Vec<String>,
    /// The player.
    pub player: PlayerView,
    /// The adversaries in [`Identity::ALL`] order.
    pub adversaries: Vec<AdversaryView>,
    /// Current score.
    pub score: u64,
    /// Best score known to this game.
    pub high_score: u64,
    /// Set once the game is over if it beat the high score it started with.
    pub new_high_score: bool,
    /// Captures since power mode last started.
    pub capture_streak: u32,
    /// Collectibles left on the level.
    pub remaining: usize,
    /// Whole seconds of power mode left, rounded up.
    pub power_secs: Option<u64>,
}

impl Snapshot {
    /// Capture the state of `game` as of `now`.
    #[must_use]
    pub fn capture(game: &Game, now: Duration) -> Self {
        let phase = game.phase();
        let player = game.player();

        Self {
            phase: phase.kind(),
            countdown_secs: phase.deadline().map(|until| secs_left(until, now)),
            level: game.level().index(),
            maze: game.level().maze().to_layout(),
            player: PlayerView {
                position: player.position(),
                direction: player.direction(),
                lives: player.lives(),
            },
            adversaries: game
                .adversaries()
                .iter()
                .map(|a| AdversaryView {
                    identity: a.identity(),
                    position: a.position(),
                    state: a.state(),
                })
                .collect(),
            score: game.score().value(),
            high_score: game.score().high_score(),
            new_high_score: game
                .game_over_report()
                .is_some_and(|report| report.new_high_score),
            capture_streak: game.score().capture_streak(),
            remaining: game.level().remaining(),
            power_secs: game.power_deadline().map(|until| secs_left(until, now)),
        }
    }

    /// The adversary standing on `at`, if any. The first one in
    /// [`Identity::ALL`] order wins when several share a cell.
    #[must_use]
    pub fn adversary_at(&self, at: Position) -> Option<&AdversaryView> {
        self.adversaries.iter().find(|a| a.position == at)
    }
}

fn secs_left(until: Duration, now: Duration) -> u64 {
    let left = until.saturating_sub(now).as_millis() as u64;
    left.div_ceil(1000)
}
