// error.rs - Error types for the simulation core and its configuration

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the grid and the transition engine.
///
/// Both are local to the request that caused them; a session never needs to
/// be torn down because of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifeError {
    #[error("grid dimensions must be positive, got {height}x{width}")]
    InvalidDimension { height: usize, width: usize },

    #[error("cell ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: isize,
        col: isize,
        height: usize,
        width: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse config: {0}")]
    Syntax(#[from] toml::de::Error),

    #[error(transparent)]
    Grid(#[from] LifeError),
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;
