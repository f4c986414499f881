//! gridlearn - tabular reinforcement learning on a small grid world
//!
//! A GridWorld environment, Q-Learning, SARSA and Monte-Carlo control agents,
//! a pausable episode driver with convergence detection, and offline tools to
//! compare algorithms and summarize exported runs.

pub mod agents;
pub mod environment;
pub mod training;

/// Identifier type used for training runs.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
