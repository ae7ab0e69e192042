use crate::grid::Position;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse instance: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("city dimensions must be positive, got {rows}x{columns}")]
    EmptyCity { rows: i32, columns: i32 },
    #[error("{kind} position {position} lies outside the {rows}x{columns} city")]
    OutOfBounds {
        kind: &'static str,
        position: Position,
        rows: i32,
        columns: i32,
    },
    #[error("departure {0} is a blocked cell")]
    BlockedDeparture(Position),
    #[error("the instance has nobody to rescue")]
    NoTargets,
}
