use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a [`World`](crate::world::World) from map data.
///
/// Raised at load time only; a level that fails to load never reaches the
/// simulation loop.
#[derive(Debug, Error)]
pub enum WorldLoadError {
    #[error("failed to read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map contains no rows")]
    Empty,
    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    InvalidChar { ch: char, row: usize, col: usize },
}

/// Failure to load a JSON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
