//! Learning hyperparameters shared by all tabular agents.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hyperparameters of a tabular agent.
///
/// Expected domains are `alpha, gamma, epsilon ∈ [0, 1]`. Values outside are
/// not rejected; they give degenerate but well-defined behavior (for example
/// `epsilon > 1` always explores).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentParams {
    /// Learning rate α. Unused by the Monte-Carlo agent, which averages.
    pub alpha: f64,
    /// Discount factor γ.
    pub gamma: f64,
    /// Exploration probability ε.
    pub epsilon: f64,
}

impl AgentParams {
    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: ParamsUpdate) {
        if let Some(alpha) = update.alpha {
            self.alpha = alpha;
        }
        if let Some(gamma) = update.gamma {
            self.gamma = gamma;
        }
        if let Some(epsilon) = update.epsilon {
            self.epsilon = epsilon;
        }
    }
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            epsilon: 0.1,
        }
    }
}

/// Partial parameter change applied to a live agent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamsUpdate {
    pub alpha: Option<f64>,
    pub gamma: Option<f64>,
    pub epsilon: Option<f64>,
}
