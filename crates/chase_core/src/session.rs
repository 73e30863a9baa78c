//! A game bound to a high-score store.

use std::time::Duration;

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{CycleEvents, Event, Game};
use crate::level::Blueprint;
use crate::snapshot::Snapshot;
use crate::store::{HighScoreRecord, ScoreStore};

/// Owns the running [`Game`] and the store its high score comes from.
///
/// The store is read once when each game starts and written only when a
/// finished game beat the score loaded for it. A failed write is logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct Session<S: ScoreStore> {
    store: S,
    game: Game,
}

impl<S: ScoreStore> Session<S> {
    /// Start a session on the standard playfield.
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        Self::with_blueprint(config, Blueprint::standard(), store)
    }

    /// Start a session on a custom playfield.
    pub fn with_blueprint(config: GameConfig, blueprint: Blueprint, store: S) -> Result<Self> {
        let high_score = store.load().high_score;
        tracing::debug!(high_score, "Loaded high score");
        let game = Game::with_blueprint(config, blueprint, high_score)?;

        Ok(Self { store, game })
    }

    /// The running game.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Forward one event to the game, persisting a new high score when the
    /// game ends with one.
    pub fn handle(&mut self, event: Event, now: Duration) -> CycleEvents {
        let events = self.game.handle(event, now);

        if let Some(report) = events.game_over {
            if report.new_high_score {
                let record = HighScoreRecord {
                    high_score: report.score,
                };
                match self.store.save(&record) {
                    Ok(()) => tracing::info!(high_score = report.score, "New high score saved"),
                    Err(err) => tracing::warn!(%err, "Could not save high score"),
                }
            }
        }

        events
    }

    /// Restart the game with full lives, reloading the high score. The
    /// adversary clock of the new game starts at `now`.
    pub fn new_game(&mut self, now: Duration) {
        let high_score = self.store.load().high_score;
        self.game.restart(high_score, now);
    }

    /// Presentation view of the running game.
    #[must_use]
    pub fn snapshot(&self, now: Duration) -> Snapshot {
        self.game.snapshot(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::InputCommand;
    use crate::game::PhaseKind;
    use crate::store::MemoryScoreStore;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_session_loads_high_score() {
        let session = Session::new(GameConfig::default(), MemoryScoreStore::with_high_score(900)).unwrap();
        assert_eq!(session.game().score().high_score(), 900);
        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            starting_lives: 0,
            ..GameConfig::default()
        };
        assert!(Session::new(config, MemoryScoreStore::default()).is_err());
    }

    #[test]
    fn test_new_game_reloads_and_restarts() {
        let mut session = Session::new(GameConfig::default(), MemoryScoreStore::default()).unwrap();
        session.handle(Event::Input(InputCommand::Right), ms(10));
        session.handle(Event::Input(InputCommand::Right), ms(20));
        assert_eq!(session.game().score().value(), 10);

        session.new_game(ms(5_000));
        assert_eq!(session.game().score().value(), 0);
        assert_eq!(session.snapshot(ms(5_000)).phase, PhaseKind::Playing);
        assert!(!session.handle(Event::Heartbeat, ms(5_400)).adversaries_moved);
        assert!(session.handle(Event::Heartbeat, ms(5_500)).adversaries_moved);
    }
}
