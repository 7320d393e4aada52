/// Crate error type.
///
/// Level failures are fatal at the Load boundary. Save failures are
/// reported and the game carries on. Quitting is not an error; it travels
/// as `Transition::Terminate`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level data in {origin}: {source}")]
    LevelFormat {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("level {name:?} is invalid: {reason}")]
    InvalidLevel { name: String, reason: String },

    #[error("no levels found in {origin}")]
    NoLevels { origin: String },

    #[error("malformed save file {}: {source}", path.display())]
    SaveFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl GameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::Io { path: path.into(), source }
    }
}

pub type GameResult<T> = Result<T, GameError>;
