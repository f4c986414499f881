//! Tabular learning agents.
//!
//! Three variants share the [`Agent`] capability set (epsilon-greedy action
//! selection, Q-table access, live parameter changes) and differ in their
//! update rule:
//!
//! - [`QLearningAgent`]: off-policy, bootstraps from `max_a' Q(s', a')`.
//! - [`SarsaAgent`]: on-policy, bootstraps from the next chosen action.
//! - [`MonteCarloAgent`]: on-policy, averages full-episode returns.

pub mod any;
pub mod config;
pub mod monte_carlo;
pub mod q_learning;
pub mod q_table;
pub mod sarsa;
pub mod trait_;
pub mod types;

pub use any::AnyAgent;
pub use config::{AgentParams, ParamsUpdate};
pub use monte_carlo::{discounted_returns, MonteCarloAgent, Transition};
pub use q_learning::QLearningAgent;
pub use q_table::QTable;
pub use sarsa::SarsaAgent;
pub use trait_::{Agent, TabularCore};
pub use types::{Algorithm, UnknownAlgorithm};
