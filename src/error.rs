use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::placement::PlacementError;

/// Crate-level error returned by the engine, game loop and binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

pub type Result<T> = std::result::Result<T, Error>;
