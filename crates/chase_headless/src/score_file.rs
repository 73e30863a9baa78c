//! File-backed high-score store.
//!
//! The record is a small JSON envelope:
//!
//! ```text
//! {"version":1,"high_score":4200,"digest":"<sha256 hex>"}
//! ```
//!
//! The digest covers the version and the score, so a hand-edited or
//! truncated file is detected and treated as missing. Anything that goes
//! wrong while loading yields a zero record.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chase_core::error::{GameError, Result};
use chase_core::store::{HighScoreRecord, ScoreStore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Current envelope version.
pub const SCORE_FILE_VERSION: u32 = 1;

/// Default file name.
pub const DEFAULT_SCORE_FILE: &str = "highscore.json";

/// Directory created under the per-user config directory.
pub const APP_DIR: &str = "maze-chase";

/// Per-user location of the high-score file. Falls back to
/// [`DEFAULT_SCORE_FILE`] in the working directory when no config directory
/// can be found.
pub fn default_score_path() -> PathBuf {
    user_config_dir(|key| std::env::var_os(key))
        .map(|dir| dir.join(APP_DIR).join(DEFAULT_SCORE_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORE_FILE))
}

fn user_config_dir(var: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let non_empty = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    if cfg!(windows) {
        non_empty("APPDATA")
    } else if cfg!(target_os = "macos") {
        non_empty("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        non_empty("XDG_CONFIG_HOME").or_else(|| non_empty("HOME").map(|home| home.join(".config")))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    high_score: u64,
    digest: String,
}

fn digest(version: u32, high_score: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(version.to_le_bytes());
    hasher.update(high_score.to_le_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

impl Envelope {
    fn seal(high_score: u64) -> Self {
        Self {
            version: SCORE_FILE_VERSION,
            high_score,
            digest: digest(SCORE_FILE_VERSION, high_score),
        }
    }

    fn open(self) -> std::result::Result<u64, String> {
        if self.version != SCORE_FILE_VERSION {
            return Err(format!("unsupported version {}", self.version));
        }
        if self.digest != digest(self.version, self.high_score) {
            return Err("digest mismatch".to_string());
        }
        Ok(self.high_score)
    }
}

/// High score kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Store backed by `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::result::Result<u64, String> {
        let text = fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| e.to_string())?;
        envelope.open()
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> HighScoreRecord {
        match self.read() {
            Ok(high_score) => HighScoreRecord { high_score },
            Err(reason) => {
                tracing::debug!(path = %self.path.display(), %reason, "No usable high score file");
                HighScoreRecord::default()
            }
        }
    }

    fn save(&mut self, record: &HighScoreRecord) -> Result<()> {
        let json = serde_json::to_string(&Envelope::seal(record.high_score))
            .map_err(|e| GameError::Persistence(format!("Failed to encode score: {}", e)))?;

        // Temp file then rename: the target is never half written.
        let tmp = self.path.with_extension("json.tmp");
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| {
            GameError::Persistence(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), high_score = record.high_score, "High score written");
        Ok(())
    }
}
