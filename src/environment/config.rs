//! Configuration for the grid environment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`GridWorld`](super::GridWorld).
///
/// Rewards are configuration, not constants: every field can be overridden
/// with struct-update syntax.
///
/// ```
/// use gridlearn::environment::GridConfig;
///
/// let cfg = GridConfig { size: 7, ..GridConfig::default() };
/// assert_eq!(cfg.max_steps, 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridConfig {
    /// Side length N of the N×N grid. Expected `>= 2`.
    pub size: usize,
    /// Step cap per episode.
    pub max_steps: u32,
    /// Reward added on every step.
    pub step_cost: f64,
    /// Reward added when the agent lands on the goal.
    pub goal_reward: f64,
    /// Extra reward added for bumping into a wall or an obstacle.
    pub obstacle_penalty: f64,
}

impl GridConfig {
    /// Number of encoded states (`size * size`).
    pub fn n_states(&self) -> usize {
        self.size * self.size
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5,
            max_steps: 200,
            step_cost: -0.1,
            goal_reward: 10.0,
            obstacle_penalty: -1.0,
        }
    }
}
