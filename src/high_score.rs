//! Best-score persistence: a single JSON object `{"high_score": n}`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    high_score: u32,
}

#[derive(Clone, Debug)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HighScoreStore { path: path.into() }
    }

    /// `$HOME/.space_invaders/high_score.json`, or the working directory
    /// when there is no home.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".space_invaders")
            .join("high_score.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored score, or 0 when the file is missing or unreadable.
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(score) => score,
            Err(GameError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => 0,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable high score");
                0
            }
        }
    }

    pub fn try_load(&self) -> Result<u32, GameError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| GameError::io(&self.path, e))?;
        let record: Record = serde_json::from_str(&contents)?;
        Ok(record.high_score)
    }

    pub fn save(&self, score: u32) -> Result<(), GameError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| GameError::io(dir, e))?;
        }
        let body = serde_json::to_string(&Record { high_score: score })?;
        std::fs::write(&self.path, body).map_err(|e| GameError::io(&self.path, e))
    }
}
