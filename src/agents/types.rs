//! Algorithm identifiers.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The tabular control algorithms available to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Off-policy TD control.
    QLearning,
    /// On-policy TD control.
    Sarsa,
    /// Every-visit Monte-Carlo control.
    MonteCarlo,
}

impl Algorithm {
    /// Returns all algorithms in order.
    pub fn all() -> [Algorithm; 3] {
        [Algorithm::QLearning, Algorithm::Sarsa, Algorithm::MonteCarlo]
    }

    /// Short machine-readable name, as used in exported tables.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::QLearning => "qlearning",
            Algorithm::Sarsa => "sarsa",
            Algorithm::MonteCarlo => "montecarlo",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::QLearning => "Q-Learning",
            Algorithm::Sarsa => "SARSA",
            Algorithm::MonteCarlo => "Monte-Carlo",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown algorithm: {0:?}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qlearning" | "q-learning" | "q" => Ok(Algorithm::QLearning),
            "sarsa" => Ok(Algorithm::Sarsa),
            "montecarlo" | "monte-carlo" | "mc" => Ok(Algorithm::MonteCarlo),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}
