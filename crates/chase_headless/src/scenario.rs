//! Scripted scenarios.
//!
//! A scenario is a RON file holding a seed, optional engine overrides and a
//! list of steps. Running it drives a [`HeadlessRunner`] exactly as the
//! protocol would, then checks optional expectations against the final
//! state. This is how CI plays whole games without a terminal.

use std::path::Path;

use chase_core::components::InputCommand;
use chase_core::config::GameConfig;
use chase_core::error::GameError;
use chase_core::game::PhaseKind;
use chase_core::session::Session;
use chase_core::snapshot::Snapshot;
use chase_core::store::ScoreStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::{Command, Response};
use crate::runner::{HeadlessConfig, HeadlessRunner};

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The scenario's configuration cannot start a game.
    #[error("Scenario cannot start a game: {0}")]
    Game(#[from] GameError),
}

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Deliver an input command.
    Input(InputCommand),
    /// Advance the clock by this many milliseconds.
    Wait(u64),
    /// Send this many heartbeats.
    Heartbeat(u32),
    /// Capture a text frame into the report.
    Render,
}

impl From<Step> for Command {
    fn from(step: Step) -> Self {
        match step {
            Step::Input(dir) => Command::Input { dir },
            Step::Wait(ms) => Command::Wait { ms },
            Step::Heartbeat(count) => Command::Heartbeat { count },
            Step::Render => Command::Render,
        }
    }
}

/// Checks applied to the final state. Unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectation {
    /// Final phase.
    pub phase: Option<PhaseKind>,
    /// Exact final score.
    pub score: Option<u64>,
    /// Lower bound on the final score.
    pub min_score: Option<u64>,
    /// Remaining lives.
    pub lives: Option<u32>,
    /// Level index.
    pub level: Option<u32>,
}

impl Expectation {
    /// Every mismatch between the expectation and `snapshot`.
    pub fn check(&self, snapshot: &Snapshot) -> Vec<String> {
        let mut failures = Vec::new();
        if let Some(phase) = self.phase {
            if snapshot.phase != phase {
                failures.push(format!("phase: expected {:?}, got {:?}", phase, snapshot.phase));
            }
        }
        if let Some(score) = self.score {
            if snapshot.score != score {
                failures.push(format!("score: expected {}, got {}", score, snapshot.score));
            }
        }
        if let Some(min_score) = self.min_score {
            if snapshot.score < min_score {
                failures.push(format!("score: expected at least {}, got {}", min_score, snapshot.score));
            }
        }
        if let Some(lives) = self.lives {
            if snapshot.player.lives != lives {
                failures.push(format!("lives: expected {}, got {}", lives, snapshot.player.lives));
            }
        }
        if let Some(level) = self.level {
            if snapshot.level != level {
                failures.push(format!("level: expected {}, got {}", level, snapshot.level));
            }
        }
        failures
    }
}

/// A complete scripted run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Seed for adversary movement.
    #[serde(default)]
    pub seed: u64,
    /// Engine overrides; the seed above always wins.
    #[serde(default)]
    pub config: Option<GameConfig>,
    /// What to do, in order.
    pub steps: Vec<Step>,
    /// Checks on the final state.
    #[serde(default)]
    pub expect: Expectation,
}

/// Outcome of [`Scenario::run`].
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Virtual time when the script ended.
    pub now_ms: u64,
    /// Final state.
    pub snapshot: Snapshot,
    /// Frames captured by `Render` steps.
    pub frames: Vec<String>,
    /// Every response the runner produced, in order.
    pub responses: Vec<Response>,
    /// Failed expectations.
    pub failures: Vec<String>,
}

impl ScenarioReport {
    /// True if every expectation held.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Parse a scenario from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Use `config` for engine settings unless the scenario carries its own.
    /// The scenario's seed still applies.
    #[must_use]
    pub fn with_default_config(mut self, config: GameConfig) -> Self {
        if self.config.is_none() {
            self.config = Some(config);
        } else {
            tracing::warn!(name = %self.name, "Scenario has its own config, ignoring the default");
        }
        self
    }

    /// Engine configuration for this scenario.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            seed: self.seed,
            ..self.config.clone().unwrap_or_default()
        }
    }

    /// Play the script against `store`.
    pub fn run<S: ScoreStore>(
        &self,
        store: S,
        headless: &HeadlessConfig,
    ) -> Result<ScenarioReport, ScenarioError> {
        tracing::info!(name = %self.name, steps = self.steps.len(), "Running scenario");

        let session = Session::new(self.game_config(), store)?;
        let mut runner = HeadlessRunner::new(session, headless.clone());
        let mut frames = Vec::new();
        let mut responses = Vec::new();

        for step in &self.steps {
            for response in runner.execute(Command::from(*step)) {
                if let Response::Frame { text } = &response {
                    frames.push(text.clone());
                }
                responses.push(response);
            }
            if runner.is_finished() {
                tracing::debug!("Scenario quit early");
                break;
            }
        }

        let snapshot = runner.session().snapshot(runner.now());
        let failures = self.expect.check(&snapshot);
        for failure in &failures {
            tracing::warn!(name = %self.name, %failure, "Expectation failed");
        }

        Ok(ScenarioReport {
            name: self.name.clone(),
            now_ms: runner.now().as_millis() as u64,
            snapshot,
            frames,
            responses,
            failures,
        })
    }
}
