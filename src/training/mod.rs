//! Episode driving, convergence detection and run analysis.
//!
//! [`EpisodeRunner`] advances one run a step at a time; [`Trainer`] drives it
//! under a [`RunControl`] and keeps a [`RunContext`] current for renderers.
//! [`compare`] and [`analysis::summarize`] work offline over finished runs.

pub mod analysis;
pub mod comparison;
pub mod config;
pub mod context;
pub mod control;
pub mod convergence;
pub mod driver;
pub mod error;
pub mod export;
pub mod metrics;
pub mod runner;

pub use analysis::{summarize, RunSummary};
pub use comparison::{compare, run_trial, AlgorithmSummary, ComparisonConfig, ComparisonReport};
pub use config::RunConfig;
pub use context::{RunContext, RunSnapshot};
pub use control::RunControl;
pub use convergence::{check_convergence, first_convergence, ConvergenceCriteria};
pub use driver::{RunOutcome, Trainer};
pub use error::TrainingError;
pub use export::{export_csv, export_file_name, read_csv, CSV_HEADER};
pub use metrics::{EpisodeRecord, EpisodeReport, RunHistory};
pub use runner::{EpisodeRunner, Tick};
