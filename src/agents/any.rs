//! Tagged union over the three agent variants.

use super::config::{AgentParams, ParamsUpdate};
use super::monte_carlo::MonteCarloAgent;
use super::q_learning::QLearningAgent;
use super::q_table::QTable;
use super::sarsa::SarsaAgent;
use super::trait_::Agent;
use super::types::Algorithm;

/// Any tabular agent, selected at runtime by [`Algorithm`].
#[derive(Debug, Clone)]
pub enum AnyAgent {
    QLearning(QLearningAgent),
    Sarsa(SarsaAgent),
    MonteCarlo(MonteCarloAgent),
}

impl AnyAgent {
    /// Builds the agent for `algorithm`. A `seed` makes action selection
    /// reproducible.
    pub fn new(
        algorithm: Algorithm,
        states: usize,
        actions: usize,
        params: AgentParams,
        seed: Option<u64>,
    ) -> Self {
        match algorithm {
            Algorithm::QLearning => {
                AnyAgent::QLearning(QLearningAgent::with_seed(states, actions, params, seed))
            }
            Algorithm::Sarsa => AnyAgent::Sarsa(SarsaAgent::with_seed(states, actions, params, seed)),
            Algorithm::MonteCarlo => {
                AnyAgent::MonteCarlo(MonteCarloAgent::with_seed(states, actions, params, seed))
            }
        }
    }

    fn inner(&self) -> &dyn Agent {
        match self {
            AnyAgent::QLearning(a) => a,
            AnyAgent::Sarsa(a) => a,
            AnyAgent::MonteCarlo(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Agent {
        match self {
            AnyAgent::QLearning(a) => a,
            AnyAgent::Sarsa(a) => a,
            AnyAgent::MonteCarlo(a) => a,
        }
    }
}

impl Agent for AnyAgent {
    fn algorithm(&self) -> Algorithm {
        self.inner().algorithm()
    }

    fn choose_action(&mut self, state: usize) -> usize {
        self.inner_mut().choose_action(state)
    }

    fn q_table(&self) -> &QTable {
        self.inner().q_table()
    }

    fn params(&self) -> AgentParams {
        self.inner().params()
    }

    fn set_params(&mut self, update: ParamsUpdate) {
        self.inner_mut().set_params(update);
    }

    fn reinit(&mut self, states: usize, actions: usize) {
        self.inner_mut().reinit(states, actions);
    }
}
