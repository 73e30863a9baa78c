//! Top-level orchestrator.
//!
//! [`Game`] owns the level, the player, the four adversaries and the score,
//! and advances them one serialized event at a time. Two kinds of event
//! exist: an input command and a heartbeat. Every event carries `now`, the
//! time elapsed since the session started; all timers are absolute
//! deadlines compared against it.
//!
//! # Cycle order (Playing)
//!
//! 1. Direction input: face, step, consume, maybe start power mode, maybe
//!    advance the level (which skips steps 3 and 4).
//! 2. Power-mode expiry check.
//! 3. Heartbeat only: move adversaries if the level interval has elapsed.
//! 4. Collision resolution.
//!
//! Respawning and LevelIntro only run their expiry check. GameOver ignores
//! everything. Quit is answered in every phase without touching state.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::adversary::{Adversary, Contact, AdversaryState, Identity, ADVERSARY_COUNT};
use crate::components::InputCommand;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::level::{Blueprint, Level};
use crate::maze::{Maze, Tile};
use crate::player::Player;
use crate::score::Score;
use crate::snapshot::Snapshot;

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Normal play.
    Playing,
    /// Pause after a hit; ends at the deadline.
    Respawning {
        /// Resume deadline.
        until: Duration,
    },
    /// Terminal.
    GameOver,
    /// Pause before a new level; ends at the deadline.
    LevelIntro {
        /// Resume deadline.
        until: Duration,
    },
}

/// [`Phase`] without its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// See [`Phase::Playing`].
    Playing,
    /// See [`Phase::Respawning`].
    Respawning,
    /// See [`Phase::GameOver`].
    GameOver,
    /// See [`Phase::LevelIntro`].
    LevelIntro,
}

impl Phase {
    /// Drop the deadline.
    #[must_use]
    pub const fn kind(self) -> PhaseKind {
        match self {
            Self::Playing => PhaseKind::Playing,
            Self::Respawning { .. } => PhaseKind::Respawning,
            Self::GameOver => PhaseKind::GameOver,
            Self::LevelIntro { .. } => PhaseKind::LevelIntro,
        }
    }

    /// Deadline of a timed phase.
    #[must_use]
    pub const fn deadline(self) -> Option<Duration> {
        match self {
            Self::Respawning { until } | Self::LevelIntro { until } => Some(until),
            Self::Playing | Self::GameOver => None,
        }
    }
}

/// A single serialized event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// One command from the input source.
    Input(InputCommand),
    /// The periodic external tick.
    Heartbeat,
}

/// An adversary captured during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Who was captured.
    pub identity: Identity,
    /// Points awarded.
    pub points: u64,
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOverReport {
    /// Final score.
    pub score: u64,
    /// High score loaded at game start.
    pub previous_high_score: u64,
    /// True if `score` beat `previous_high_score` and should be persisted.
    pub new_high_score: bool,
}

/// What happened during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEvents {
    /// Collectible eaten by the player this cycle.
    pub consumed: Option<Tile>,
    /// Power mode (re)started.
    pub power_started: bool,
    /// Power mode expired.
    pub power_ended: bool,
    /// Adversaries took their step.
    pub adversaries_moved: bool,
    /// Adversaries captured, in adversary order.
    pub captures: Vec<Capture>,
    /// The player was hit.
    pub hit: bool,
    /// New level index if the level was cleared.
    pub level_advanced: Option<u32>,
    /// A respawn or level intro pause ended.
    pub resumed: bool,
    /// Set on the cycle that ended the game.
    pub game_over: Option<GameOverReport>,
    /// Quit was requested.
    pub quit: bool,
}

/// The simulation orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    blueprint: Blueprint,
    /// Validated maze every level starts from.
    pristine: Maze,
    phase: Phase,
    level: Level,
    player: Player,
    adversaries: [Adversary; ADVERSARY_COUNT],
    score: Score,
    power_until: Option<Duration>,
    last_adversary_move: Duration,
    rng: ChaCha8Rng,
    cycles: u64,
    report: Option<GameOverReport>,
}

impl Game {
    /// New game on the standard playfield.
    pub fn new(config: GameConfig, high_score: u64) -> Result<Self> {
        Self::with_blueprint(config, Blueprint::standard(), high_score)
    }

    /// New game on a custom playfield.
    ///
    /// Fails on an invalid configuration or blueprint; nothing else in a
    /// game can fail afterwards.
    pub fn with_blueprint(config: GameConfig, blueprint: Blueprint, high_score: u64) -> Result<Self> {
        config.validate()?;
        let pristine = blueprint.build_maze()?;
        let level = Level::with_maze(1, pristine.clone(), &config);

        let player = Player::new(blueprint.player_home, config.starting_lives);
        let adversaries = Identity::ALL.map(|identity| {
            let home = blueprint.adversary_homes[identity as usize];
            Adversary::new(identity, home)
        });
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        tracing::info!(
            seed = config.seed,
            high_score,
            collectibles = level.remaining(),
            "New game"
        );

        Ok(Self {
            config,
            blueprint,
            pristine,
            phase: Phase::Playing,
            level,
            player,
            adversaries,
            score: Score::with_high_score(high_score),
            power_until: None,
            last_adversary_move: Duration::ZERO,
            rng,
            cycles: 0,
            report: None,
        })
    }

    /// Start the adversary clock at `now` instead of zero.
    #[must_use]
    pub fn starting_at(mut self, now: Duration) -> Self {
        self.last_adversary_move = now;
        self
    }

    /// Start over on level 1 with full lives, on the same playfield and
    /// seed. The adversary clock starts at `now`.
    pub fn restart(&mut self, high_score: u64, now: Duration) {
        self.level = Level::with_maze(1, self.pristine.clone(), &self.config);
        self.player.reset_lives(self.config.starting_lives);
        self.reset_positions();
        self.score = Score::with_high_score(high_score);
        self.phase = Phase::Playing;
        self.power_until = None;
        self.last_adversary_move = now;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.cycles = 0;
        self.report = None;
        tracing::info!(high_score, "Game restarted");
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The adversaries in [`Identity::ALL`] order.
    #[must_use]
    pub const fn adversaries(&self) -> &[Adversary; ADVERSARY_COUNT] {
        &self.adversaries
    }

    /// The score.
    #[must_use]
    pub const fn score(&self) -> &Score {
        &self.score
    }

    /// The configuration the game runs with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The playfield the game runs on.
    #[must_use]
    pub const fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    /// Power-mode deadline, if power mode is active.
    #[must_use]
    pub const fn power_deadline(&self) -> Option<Duration> {
        self.power_until
    }

    /// True while power mode is active.
    #[must_use]
    pub const fn is_power_mode(&self) -> bool {
        self.power_until.is_some()
    }

    /// Number of cycles processed (quit and game-over events excluded).
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// True once the game has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// How the game ended, once it has.
    #[must_use]
    pub const fn game_over_report(&self) -> Option<GameOverReport> {
        self.report
    }

    /// Process one event.
    pub fn handle(&mut self, event: Event, now: Duration) -> CycleEvents {
        let mut events = CycleEvents::default();

        if event == Event::Input(InputCommand::Quit) {
            events.quit = true;
            return events;
        }

        match self.phase {
            Phase::GameOver => return events,
            Phase::Respawning { until } | Phase::LevelIntro { until } => {
                if now > until {
                    tracing::debug!(phase = ?self.phase.kind(), "Pause over");
                    self.phase = Phase::Playing;
                    events.resumed = true;
                }
            }
            Phase::Playing => self.play_cycle(event, now, &mut events),
        }

        self.cycles += 1;
        events
    }

    /// Shorthand for `handle(Event::Input(command), now)`.
    pub fn input(&mut self, command: InputCommand, now: Duration) -> CycleEvents {
        self.handle(Event::Input(command), now)
    }

    /// Shorthand for `handle(Event::Heartbeat, now)`.
    pub fn heartbeat(&mut self, now: Duration) -> CycleEvents {
        self.handle(Event::Heartbeat, now)
    }

    fn play_cycle(&mut self, event: Event, now: Duration, events: &mut CycleEvents) {
        if let Event::Input(command) = event {
            if command.direction().is_some() {
                self.player.handle_input(command);
                if self.player.step(self.level.maze()) {
                    self.eat(now, events);
                    if self.level.is_cleared() {
                        // Everyone is home after the advance; only the power timer still runs.
                        self.advance_level(now, events);
                        self.expire_power_mode(now, events);
                        return;
                    }
                }
            }
        }

        self.expire_power_mode(now, events);

        if event == Event::Heartbeat
            && now.saturating_sub(self.last_adversary_move) >= self.level.adversary_interval()
        {
            for adversary in &mut self.adversaries {
                adversary.wander(self.level.maze(), &mut self.rng);
            }
            self.last_adversary_move = now;
            events.adversaries_moved = true;
        }

        self.resolve_collisions(now, events);
    }

    fn eat(&mut self, now: Duration, events: &mut CycleEvents) {
        let at = self.player.position();
        let tile = match self.level.consume(at) {
            Ok(tile) => tile,
            Err(err) => {
                tracing::error!(%err, "Player stands outside the maze");
                return;
            }
        };

        match tile {
            Tile::Collectible => {
                self.score.add(self.config.collectible_points);
                events.consumed = Some(tile);
            }
            Tile::PowerCollectible => {
                self.score.add(self.config.power_collectible_points);
                events.consumed = Some(tile);
                self.start_power_mode(now, events);
            }
            Tile::Empty | Tile::Wall => {}
        }
    }

    fn start_power_mode(&mut self, now: Duration, events: &mut CycleEvents) {
        let until = now + self.config.frightened();
        self.power_until = Some(until);
        for adversary in &mut self.adversaries {
            adversary.set_state(AdversaryState::Frightened);
        }
        events.power_started = true;
        tracing::debug!(until_ms = until.as_millis() as u64, "Power mode started");
    }

    fn expire_power_mode(&mut self, now: Duration, events: &mut CycleEvents) {
        let Some(until) = self.power_until else {
            return;
        };
        if now <= until {
            return;
        }

        self.power_until = None;
        self.score.reset_streak();
        for adversary in &mut self.adversaries {
            if adversary.state() == AdversaryState::Frightened {
                adversary.set_state(AdversaryState::Chase);
            }
        }
        events.power_ended = true;
        tracing::debug!("Power mode ended");
    }

    fn resolve_collisions(&mut self, now: Duration, events: &mut CycleEvents) {
        let at = self.player.position();
        let mut hit = false;

        for adversary in &mut self.adversaries {
            if adversary.position() != at {
                continue;
            }
            match adversary.state().contact() {
                Contact::Capture => {
                    let points = self.score.add_capture_points();
                    adversary.capture();
                    events.captures.push(Capture {
                        identity: adversary.identity(),
                        points,
                    });
                }
                Contact::Hit => {
                    hit = true;
                    break;
                }
                Contact::Harmless => {}
            }
        }

        if hit {
            self.player_hit(now, events);
        }
    }

    fn player_hit(&mut self, now: Duration, events: &mut CycleEvents) {
        events.hit = true;
        self.player.lose_life();

        if self.player.is_dead() {
            self.finish(events);
            return;
        }

        self.reset_positions();
        let until = now + self.config.respawn();
        self.phase = Phase::Respawning { until };
        tracing::info!(lives = self.player.lives(), "Player hit, respawning");
    }

    fn finish(&mut self, events: &mut CycleEvents) {
        let previous_high_score = self.score.high_score();
        let new_high_score = self.score.settle_high_score();
        self.phase = Phase::GameOver;

        let report = GameOverReport {
            score: self.score.value(),
            previous_high_score,
            new_high_score,
        };
        tracing::info!(
            score = report.score,
            previous_high_score,
            new_high_score,
            "Game over"
        );
        self.report = Some(report);
        events.game_over = Some(report);
    }

    fn advance_level(&mut self, now: Duration, events: &mut CycleEvents) {
        let next = self.level.index() + 1;
        self.level = Level::with_maze(next, self.pristine.clone(), &self.config);
        self.reset_positions();

        let until = now + self.config.level_intro();
        self.phase = Phase::LevelIntro { until };
        events.level_advanced = Some(next);
        tracing::info!(
            level = next,
            interval_ms = self.level.adversary_interval().as_millis() as u64,
            "Level cleared"
        );
    }

    fn reset_positions(&mut self) {
        self.player.reset_to_home();
        for adversary in &mut self.adversaries {
            adversary.send_home();
        }
    }

    /// Read-only view for presentation.
    #[must_use]
    pub fn snapshot(&self, now: Duration) -> Snapshot {
        Snapshot::capture(self, now)
    }

    /// Hash of the complete game state.
    ///
    /// Two games that went through the same events from the same seed hash
    /// identically.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.cycles.hash(&mut hasher);
        self.phase.hash(&mut hasher);
        self.report.hash(&mut hasher);
        self.level.hash(&mut hasher);
        self.player.hash(&mut hasher);
        self.adversaries.hash(&mut hasher);
        self.score.hash(&mut hasher);
        self.power_until.hash(&mut hasher);
        self.last_adversary_move.hash(&mut hasher);
        self.rng.get_seed().hash(&mut hasher);
        self.rng.get_word_pos().hash(&mut hasher);

        hasher.finish()
    }

    /// Serialize the whole game.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize game: {}", e)))
    }

    /// Restore a game from [`Game::serialize`] output.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize game: {}", e)))
    }
}
