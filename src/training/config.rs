//! Configuration for an interactive training run.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::convergence::ConvergenceCriteria;
use crate::agents::{AgentParams, Algorithm};
use crate::environment::GridConfig;

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunConfig {
    /// Learning algorithm to train.
    pub algorithm: Algorithm,
    /// Number of episodes to run.
    pub episodes: usize,
    /// Environment settings.
    pub grid: GridConfig,
    /// Agent hyperparameters.
    pub params: AgentParams,
    /// Convergence thresholds evaluated after every episode.
    pub convergence: ConvergenceCriteria,
    /// Seed for the agent RNG; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Pause inserted after every step, for paced visualization.
    pub step_delay: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::QLearning,
            episodes: 100,
            grid: GridConfig::default(),
            params: AgentParams::default(),
            convergence: ConvergenceCriteria::default(),
            seed: None,
            step_delay: None,
        }
    }
}
