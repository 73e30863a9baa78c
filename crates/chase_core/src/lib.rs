//! # Chase Core
//!
//! Simulation engine for a single-player grid maze chase.
//!
//! This crate contains **only** game logic:
//! - No rendering
//! - No terminal IO
//! - No wall clock (every event carries its own timestamp)
//! - No system randomness (adversaries use a seeded generator)
//!
//! Shells feed events into a [`session::Session`] (or a bare
//! [`game::Game`]) and draw [`snapshot::Snapshot`]s however they like.
//!
//! ## Crate Structure
//!
//! - [`maze`] - Tile grid with tunnel rows
//! - [`movement`] - The single-cell movement rule
//! - [`player`] / [`adversary`] - The agents
//! - [`score`] / [`level`] - Scoring and level progression
//! - [`game`] - The orchestrator and its phases
//! - [`session`] / [`store`] - High-score persistence around a game

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod adversary;
pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod level;
pub mod maze;
pub mod movement;
pub mod player;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::adversary::{Adversary, AdversaryState, Contact, Identity, ADVERSARY_COUNT};
    pub use crate::components::*;
    pub use crate::config::GameConfig;
    pub use crate::error::{GameError, Result};
    pub use crate::game::{Capture, CycleEvents, Event, Game, GameOverReport, Phase, PhaseKind};
    pub use crate::level::{Blueprint, Level};
    pub use crate::maze::{Maze, Tile};
    pub use crate::player::Player;
    pub use crate::score::Score;
    pub use crate::session::Session;
    pub use crate::snapshot::{AdversaryView, PlayerView, Snapshot};
    pub use crate::store::{HighScoreRecord, MemoryScoreStore, ScoreStore};
}
