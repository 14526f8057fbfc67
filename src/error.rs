//! Error type for everything that can fail before or around the game loop.
//!
//! Gameplay itself has no error paths: rejected moves are silent no-ops.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the binary.
#[derive(Debug, Error)]
pub enum GameError {
    /// The map file could not be read. Fatal at startup.
    #[error("failed to load map {}: {source}", path.display())]
    MapLoad {
        /// Map file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An explicitly requested config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid TOML for [`crate::config::GameConfig`].
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The log file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        /// Log file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Terminal setup or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    /// An actor thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Actor name.
        name: &'static str,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = GameError> = std::result::Result<T, E>;
