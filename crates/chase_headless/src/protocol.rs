//! JSON protocol for headless game communication.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Game state updates and responses
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0",...}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner reports what happened after every command that ran a cycle
//! 4. When the game ends, outputs `{"type":"game_over",...}`
//!
//! Time is virtual: it only advances through `wait` and `heartbeat`.
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","heartbeat_ms":100}
//! -> {"cmd":"input","dir":"left"}
//! <- {"type":"events","now_ms":0,"events":{"consumed":"Collectible",...}}
//! -> {"cmd":"wait","ms":1000}
//! <- {"type":"events","now_ms":500,"events":{"adversaries_moved":true,...}}
//! -> {"cmd":"render"}
//! <- {"type":"frame","text":"Score: 10   High Score: 0   Lives: 3\n..."}
//! -> {"cmd":"quit"}
//! <- {"type":"bye"}
//! ```

use chase_core::components::InputCommand;
use chase_core::game::{CycleEvents, GameOverReport};
use chase_core::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Deliver one input command at the current time.
    Input {
        /// The command, e.g. `"left"` or `"other"`.
        dir: InputCommand,
    },

    /// Advance the clock by `ms`, sending a heartbeat every heartbeat period.
    Wait {
        /// Milliseconds to advance.
        ms: u64,
    },

    /// Send N heartbeats, one heartbeat period apart (default: 1).
    Heartbeat {
        /// Number of heartbeats.
        #[serde(default = "default_heartbeat_count")]
        count: u32,
    },

    /// Query current game state without advancing time.
    Query,

    /// Render the current frame as text.
    Render,

    /// Throw the current game away and start a fresh one.
    NewGame,

    /// Quit the runner.
    Quit,
}

fn default_heartbeat_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready {
        /// Protocol version.
        version: String,
        /// Virtual heartbeat period.
        heartbeat_ms: u64,
    },

    /// Error processing a command.
    Error {
        /// What went wrong.
        message: String,
        /// Name of the failing command, if it parsed.
        cmd: Option<String>,
    },

    /// Current game state.
    State {
        /// Virtual time.
        now_ms: u64,
        /// Presentation view.
        snapshot: Snapshot,
        /// Hash of the complete game state.
        hash: u64,
    },

    /// A rendered text frame.
    Frame {
        /// The frame, newline separated, without ANSI colors.
        text: String,
    },

    /// Something happened during a cycle.
    Events {
        /// Virtual time of the cycle.
        now_ms: u64,
        /// What happened.
        events: CycleEvents,
    },

    /// The game has ended.
    GameOver {
        /// Final score and high-score outcome.
        report: GameOverReport,
    },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(heartbeat_ms: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            heartbeat_ms,
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","message":"Serialization failed: {}"}}"#,
                e
            )
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input",
            Self::Wait { .. } => "wait",
            Self::Heartbeat { .. } => "heartbeat",
            Self::Query => "query",
            Self::Render => "render",
            Self::NewGame => "new_game",
            Self::Quit => "quit",
        }
    }
}
