use thiserror::Error;

use crate::environment::EnvError;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("No run data available to export. Run a training session first.")]
    NoRunData,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}
