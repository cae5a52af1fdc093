//! Error type shared by the library's fallible I/O boundaries.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid game config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("high score file is not valid JSON: {0}")]
    HighScoreFormat(#[from] serde_json::Error),
}

impl GameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::Io {
            path: path.into(),
            source,
        }
    }
}
