//! High-score persistence seam.
//!
//! The engine treats the store as an opaque best-effort cache of one
//! integer. Loading never fails from the caller's point of view; saving may
//! fail and the caller only logs it.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// What gets persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighScoreRecord {
    /// Best score ever reached.
    pub high_score: u64,
}

/// Backend for the high-score record.
pub trait ScoreStore {
    /// Read the stored record. Implementations return the default record
    /// on any read or decode failure.
    fn load(&self) -> HighScoreRecord;

    /// Write the record.
    fn save(&mut self, record: &HighScoreRecord) -> Result<()>;
}

/// In-memory store, for tests and for shells that do not persist.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    record: HighScoreRecord,
    saves: usize,
    fail_saves: bool,
}

impl MemoryScoreStore {
    /// Store preloaded with a high score.
    #[must_use]
    pub fn with_high_score(high_score: u64) -> Self {
        Self {
            record: HighScoreRecord { high_score },
            ..Self::default()
        }
    }

    /// Make every subsequent save fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Number of save calls so far, successful or not.
    #[must_use]
    pub const fn save_count(&self) -> usize {
        self.saves
    }

    /// Currently stored record.
    #[must_use]
    pub const fn record(&self) -> HighScoreRecord {
        self.record
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> HighScoreRecord {
        self.record
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<()> {
        self.saves += 1;
        if self.fail_saves {
            return Err(GameError::Persistence("memory store set to fail".into()));
        }
        self.record = *record;
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&self) -> HighScoreRecord {
        (**self).load()
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<()> {
        (**self).save(record)
    }
}
