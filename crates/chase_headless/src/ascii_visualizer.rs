//! ASCII presentation sink.
//!
//! Turns a [`Snapshot`] into a text frame: the board with agents during
//! play, or a short screen for the intro, respawn and game-over pauses.

use std::fmt::Write as _;

use chase_core::adversary::AdversaryState;
use chase_core::components::Position;
use chase_core::game::PhaseKind;
use chase_core::snapshot::{AdversaryView, Snapshot};

/// Glyph for the player.
pub const PLAYER_GLYPH: char = 'C';
/// Glyph for a frightened adversary.
pub const FRIGHTENED_GLYPH: char = 'v';
/// Glyph for an adversary in the instant of being captured.
pub const EATEN_GLYPH: char = 'x';

/// ASCII visualization configuration.
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Use colored output (ANSI).
    pub use_color: bool,
    /// Show the controls footer.
    pub show_controls: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_controls: true,
        }
    }
}

impl AsciiConfig {
    /// Plain text with no footer, as sent over the protocol.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            use_color: false,
            show_controls: false,
        }
    }
}

/// ANSI color codes.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
}

fn adversary_glyph(adversary: &AdversaryView) -> char {
    match adversary.state {
        AdversaryState::Frightened => FRIGHTENED_GLYPH,
        AdversaryState::Eaten => EATEN_GLYPH,
        AdversaryState::Chase | AdversaryState::Scatter => adversary.identity.glyph(),
    }
}

fn adversary_color(adversary: &AdversaryView) -> &'static str {
    use chase_core::adversary::Identity;

    match adversary.state {
        AdversaryState::Frightened => colors::BRIGHT_BLUE,
        AdversaryState::Eaten => colors::GRAY,
        AdversaryState::Chase | AdversaryState::Scatter => match adversary.identity {
            Identity::Blinky => colors::RED,
            Identity::Inky => colors::CYAN,
            Identity::Pinky => colors::MAGENTA,
            Identity::Clyde => colors::YELLOW,
        },
    }
}

fn push_colored(out: &mut String, glyph: char, color: &str, config: &AsciiConfig) {
    if config.use_color {
        out.push_str(color);
        out.push(glyph);
        out.push_str(colors::RESET);
    } else {
        out.push(glyph);
    }
}

/// The status line shown above the board.
#[must_use]
pub fn header(snapshot: &Snapshot) -> String {
    let mut line = format!(
        "Score: {}   High Score: {}   Lives: {}   Level: {}",
        snapshot.score, snapshot.high_score, snapshot.player.lives, snapshot.level
    );
    if let Some(secs) = snapshot.power_secs {
        let _ = write!(line, "   Power: {secs}s");
    }
    line
}

/// Render the board with the player and adversaries on it.
#[must_use]
pub fn render_board(snapshot: &Snapshot, config: &AsciiConfig) -> String {
    let mut out = String::new();

    let head = header(snapshot);
    if config.use_color {
        let _ = writeln!(out, "{}{}{head}{}", colors::BOLD, colors::GREEN, colors::RESET);
    } else {
        let _ = writeln!(out, "{head}");
    }
    out.push('\n');

    for (y, row) in snapshot.maze.iter().enumerate() {
        for (x, tile) in row.chars().enumerate() {
            let at = Position::new(x as i32, y as i32);
            if let Some(adversary) = snapshot.adversary_at(at) {
                push_colored(&mut out, adversary_glyph(adversary), adversary_color(adversary), config);
            } else if snapshot.player.position == at {
                push_colored(&mut out, PLAYER_GLYPH, colors::YELLOW, config);
            } else if tile == '#' {
                push_colored(&mut out, tile, colors::BLUE, config);
            } else {
                out.push(tile);
            }
        }
        out.push('\n');
    }

    if config.show_controls {
        out.push_str("\nControls: arrows to move, q to quit\n");
    }
    out
}

/// Render whatever the current phase shows.
#[must_use]
pub fn render_frame(snapshot: &Snapshot, config: &AsciiConfig) -> String {
    let countdown = snapshot.countdown_secs.unwrap_or(0);

    match snapshot.phase {
        PhaseKind::Playing => render_board(snapshot, config),
        PhaseKind::LevelIntro => format!(
            "\nLEVEL {}\n\nStarting in {countdown}s\n",
            snapshot.level
        ),
        PhaseKind::Respawning => format!(
            "\nRespawning...\nLives: {}\nGet ready to continue ({countdown}s)\n",
            snapshot.player.lives
        ),
        PhaseKind::GameOver => {
            let mut out = String::from("\nGame Over!\n");
            if snapshot.new_high_score {
                let _ = writeln!(out, "!!! New High Score: {}", snapshot.score);
            } else {
                let _ = writeln!(out, "Your Score: {}", snapshot.score);
                let _ = writeln!(out, "High Score: {}", snapshot.high_score);
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_core::config::GameConfig;
    use chase_core::game::Game;
    use std::time::Duration;

    fn fresh_snapshot() -> Snapshot {
        Game::new(GameConfig::default(), 120)
            .unwrap()
            .snapshot(Duration::ZERO)
    }

    #[test]
    fn test_plain_board_layout() {
        let snapshot = fresh_snapshot();
        let frame = render_frame(&snapshot, &AsciiConfig::plain());
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines[0], "Score: 0   High Score: 120   Lives: 3   Level: 1");
        assert_eq!(lines[1], "");
        assert_eq!(lines.len(), 2 + 17);
        assert_eq!(lines[2], "###################");
        // Player at (9, 11), adversaries on row 7.
        assert_eq!(lines[2 + 11].chars().nth(9), Some(PLAYER_GLYPH));
        assert_eq!(lines[2 + 7], "    .# BI PY #.    ");
        assert!(!frame.contains('\x1b'));
    }

    #[test]
    fn test_colored_board_has_escapes() {
        let frame = render_board(&fresh_snapshot(), &AsciiConfig::default());
        assert!(frame.contains(colors::RED));
        assert!(frame.contains("Controls:"));
    }

    #[test]
    fn test_frightened_glyph() {
        let mut snapshot = fresh_snapshot();
        snapshot.adversaries[0].state = AdversaryState::Frightened;
        snapshot.power_secs = Some(10);
        let frame = render_board(&snapshot, &AsciiConfig::plain());
        assert!(frame.contains("    .# vI PY #.    "));
        assert!(frame.lines().next().unwrap().ends_with("Power: 10s"));
    }

    #[test]
    fn test_pause_screens() {
        let mut snapshot = fresh_snapshot();

        snapshot.phase = PhaseKind::LevelIntro;
        snapshot.level = 2;
        snapshot.countdown_secs = Some(3);
        let frame = render_frame(&snapshot, &AsciiConfig::plain());
        assert!(frame.contains("LEVEL 2"));
        assert!(frame.contains("Starting in 3s"));

        snapshot.phase = PhaseKind::Respawning;
        snapshot.player.lives = 1;
        let frame = render_frame(&snapshot, &AsciiConfig::plain());
        assert!(frame.contains("Lives: 1"));

        snapshot.phase = PhaseKind::GameOver;
        snapshot.score = 40;
        let frame = render_frame(&snapshot, &AsciiConfig::plain());
        assert!(frame.contains("Your Score: 40"));
        assert!(frame.contains("High Score: 120"));

        // Tying the loaded record is not a new one.
        snapshot.score = 120;
        let frame = render_frame(&snapshot, &AsciiConfig::plain());
        assert!(frame.contains("Your Score: 120"));
        assert!(!frame.contains("New High Score"));

        snapshot.score = 500;
        snapshot.high_score = 500;
        snapshot.new_high_score = true;
        let frame = render_frame(&snapshot, &AsciiConfig::plain());
        assert!(frame.contains("New High Score: 500"));
    }
}
