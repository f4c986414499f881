//! Q-Learning agent (off-policy TD control).

use super::config::{AgentParams, ParamsUpdate};
use super::q_table::QTable;
use super::trait_::{Agent, TabularCore};
use super::types::Algorithm;

/// Off-policy TD(0) control.
///
/// Bootstraps from the best next action whatever the policy will actually
/// do next:
///
/// ```text
/// Q(s,a) ← Q(s,a) + α [r + γ · max_a' Q(s',a') − Q(s,a)]
/// ```
///
/// The bootstrap term is dropped when the transition is terminal.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    core: TabularCore,
}

impl QLearningAgent {
    /// Creates an agent seeded from OS entropy.
    pub fn new(states: usize, actions: usize, params: AgentParams) -> Self {
        Self::with_seed(states, actions, params, None)
    }

    /// Creates an agent with a reproducible RNG when `seed` is given.
    pub fn with_seed(states: usize, actions: usize, params: AgentParams, seed: Option<u64>) -> Self {
        Self {
            core: TabularCore::new(states, actions, params, TabularCore::rng_from(seed)),
        }
    }

    /// Applies one Q-Learning update for the transition `(s, a, r, s')`.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not a valid action index.
    pub fn update(&mut self, state: usize, action: usize, reward: f64, next_state: usize, done: bool) {
        self.core.q.ensure_state(state);
        self.core.q.ensure_state(next_state);
        let next = if done {
            0.0
        } else {
            self.core.q.max_value(next_state)
        };
        let target = reward + self.core.params.gamma * next;
        self.core.td_step(state, action, target);
    }
}

impl Agent for QLearningAgent {
    fn algorithm(&self) -> Algorithm {
        Algorithm::QLearning
    }

    fn choose_action(&mut self, state: usize) -> usize {
        self.core.choose_action(state)
    }

    fn q_table(&self) -> &QTable {
        &self.core.q
    }

    fn params(&self) -> AgentParams {
        self.core.params
    }

    fn set_params(&mut self, update: ParamsUpdate) {
        self.core.params.apply(update);
    }

    fn reinit(&mut self, states: usize, actions: usize) {
        self.core.reinit(states, actions);
    }
}
