//! Playfields and games for tests.
//!
//! The small layouts keep adversary movement fully predictable: an
//! adversary sealed in a single-cell pocket never moves, and one in a
//! one-wide corridor can only keep going the way it faces.

use std::time::Duration;

use chase_core::components::Position;
use chase_core::config::GameConfig;
use chase_core::game::Game;
use chase_core::level::Blueprint;

/// Corridor on row 1, four sealed single-cell pockets on row 3.
///
/// The corridor holds five collectibles and one power collectible at
/// (5, 1). The cell at (1, 1) is empty.
pub const LANE_LAYOUT: [&str; 5] = [
    "#########",
    "# ...o..#",
    "#########",
    "# # # # #",
    "#########",
];

/// Same shape as [`LANE_LAYOUT`] but row 1 is an empty tunnel with a single
/// collectible in the middle.
pub const TUNNEL_LAYOUT: [&str; 5] = [
    "#########",
    "    .    ",
    "#########",
    "# # # # #",
    "#########",
];

/// Player spawn on the lane layouts.
pub const LANE_PLAYER_HOME: Position = Position::new(1, 1);

/// Far end of the lane corridor.
pub const LANE_FAR_END: Position = Position::new(7, 1);

/// The four sealed pockets, left to right.
pub const POCKETS: [Position; 4] = [
    Position::new(1, 3),
    Position::new(3, 3),
    Position::new(5, 3),
    Position::new(7, 3),
];

/// Collectibles (both kinds) on [`LANE_LAYOUT`].
pub const LANE_COLLECTIBLES: usize = 6;

fn layout(rows: &[&str]) -> Vec<String> {
    rows.iter().map(|row| (*row).to_string()).collect()
}

/// Lane with every adversary sealed away. The player can never be hit.
#[must_use]
pub fn sealed_blueprint() -> Blueprint {
    Blueprint {
        layout: layout(&LANE_LAYOUT),
        player_home: LANE_PLAYER_HOME,
        adversary_homes: POCKETS,
    }
}

/// Lane with Blinky at the far end of the corridor walking toward the
/// player, one cell per adversary interval. The others are sealed.
#[must_use]
pub fn chaser_blueprint() -> Blueprint {
    Blueprint {
        layout: layout(&LANE_LAYOUT),
        player_home: LANE_PLAYER_HOME,
        adversary_homes: [LANE_FAR_END, POCKETS[1], POCKETS[2], POCKETS[3]],
    }
}

/// Tunnel row with the player on the left edge and every adversary sealed.
#[must_use]
pub fn tunnel_blueprint() -> Blueprint {
    Blueprint {
        layout: layout(&TUNNEL_LAYOUT),
        player_home: Position::new(0, 1),
        adversary_homes: POCKETS,
    }
}

/// Milliseconds since session start.
#[must_use]
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Default configuration with a seed and a life count.
#[must_use]
pub fn config_with_lives(seed: u64, lives: u32) -> GameConfig {
    GameConfig {
        starting_lives: lives,
        ..GameConfig::with_seed(seed)
    }
}

/// Game on the standard playfield.
///
/// # Panics
///
/// Panics if the standard playfield fails to build.
#[must_use]
pub fn standard_game(seed: u64) -> Game {
    Game::new(GameConfig::with_seed(seed), 0).expect("standard playfield builds")
}

/// Game on a fixture blueprint.
///
/// # Panics
///
/// Panics if the blueprint or config is invalid.
#[must_use]
pub fn fixture_game(blueprint: Blueprint, config: GameConfig, high_score: u64) -> Game {
    Game::with_blueprint(config, blueprint, high_score).expect("fixture builds")
}

/// Drive heartbeats every `period` from `from` (exclusive) up to and
/// including `to`. Returns the time of the last heartbeat sent.
pub fn heartbeats(game: &mut Game, from: Duration, to: Duration, period: Duration) -> Duration {
    let mut now = from;
    while now + period <= to {
        now += period;
        game.heartbeat(now);
    }
    now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_core::game::Phase;

    #[test]
    fn test_fixture_blueprints_build() {
        for blueprint in [sealed_blueprint(), chaser_blueprint(), tunnel_blueprint()] {
            let maze = blueprint.build_maze().unwrap();
            assert_eq!(maze.width(), 9);
        }
        assert_eq!(
            sealed_blueprint().build_maze().unwrap().count_collectibles(),
            LANE_COLLECTIBLES
        );
        assert!(tunnel_blueprint().build_maze().unwrap().is_wrap_row(1));
    }

    #[test]
    fn test_sealed_adversaries_never_move() {
        let mut game = fixture_game(sealed_blueprint(), GameConfig::with_seed(5), 0);
        heartbeats(&mut game, ms(0), ms(5_000), ms(100));
        for (adversary, pocket) in game.adversaries().iter().zip(POCKETS) {
            assert_eq!(adversary.position(), pocket);
        }
        assert_eq!(game.phase(), Phase::Playing);
    }
}
