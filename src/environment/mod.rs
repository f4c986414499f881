//! GridWorld environment: layout, dynamics and state encoding.

pub mod config;
pub mod error;
pub mod grid;
pub mod types;
pub mod world;

pub use config::GridConfig;
pub use error::EnvError;
pub use grid::Grid;
pub use types::{Action, Cell};
pub use world::{GridWorld, StepResult};
