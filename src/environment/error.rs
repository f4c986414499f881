use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Invalid action: {0:?}")]
    InvalidAction(String),

    #[error("Invalid action index: {0} (expected 0..4)")]
    InvalidActionIndex(usize),

    #[error("Cell ({row}, {col}) is outside the {size}x{size} grid")]
    CellOutOfBounds { row: usize, col: usize, size: usize },
}
