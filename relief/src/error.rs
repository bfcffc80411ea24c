use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReliefError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tile name {0}")]
    TileName(PathBuf),

    #[error("invalid tile file len {0} for {1}")]
    TileLen(u64, PathBuf),
}
