//! Headless maze chase runner for scripted play and CI verification.
//!
//! This crate drives a [`chase_core`] session without a terminal UI. A
//! controller sends JSON commands on stdin and reads game state on stdout:
//!
//! - **Scripted play**: an agent or test harness plays whole games
//! - **CI verification**: RON scenarios assert on the final state
//! - **Persistence**: the high score survives between runs in a JSON file
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (input, wait, heartbeat, etc.)
//! - **stdout**: State updates and responses (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response format.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"wait","ms":1000}' | cargo run -p chase_headless
//!
//! # Run a scenario
//! cargo run -p chase_headless -- script --file scenarios/first_steps.ron
//! ```

pub mod ascii_visualizer;
pub mod protocol;
pub mod runner;
pub mod scenario;
pub mod score_file;

pub use ascii_visualizer::{render_board, render_frame, AsciiConfig};
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner, MAX_CYCLES_PER_COMMAND};
pub use scenario::{Expectation, Scenario, ScenarioError, ScenarioReport, Step};
pub use score_file::{default_score_path, FileScoreStore, DEFAULT_SCORE_FILE};
