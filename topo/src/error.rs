use relief::ReliefError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopoError {
    #[error("missing required parameters")]
    Builder,

    #[error("transect needs at least 2 points, got {0}")]
    Points(usize),

    #[error("invalid region {0:?}")]
    Region(String),

    #[error("region not covered by grid")]
    Cut,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no elevation tiles in {0}")]
    Path(PathBuf),

    #[error("{0}")]
    Relief(#[from] ReliefError),
}
