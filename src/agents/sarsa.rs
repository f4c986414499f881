//! SARSA agent (on-policy TD control).

use super::config::{AgentParams, ParamsUpdate};
use super::q_table::QTable;
use super::trait_::{Agent, TabularCore};
use super::types::Algorithm;

/// On-policy TD(0) control.
///
/// Bootstraps from the action the policy actually takes next, so the driver
/// must choose `a'` before calling [`SarsaAgent::update`]:
///
/// ```text
/// Q(s,a) ← Q(s,a) + α [r + γ · Q(s',a') − Q(s,a)]
/// ```
#[derive(Debug, Clone)]
pub struct SarsaAgent {
    core: TabularCore,
}

impl SarsaAgent {
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

    /// Applies one SARSA update for `(s, a, r, s', a')`.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not a valid action index. An out-of-range
    /// `next_action` reads as 0.
    pub fn update(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
        next_action: usize,
        done: bool,
    ) {
        self.core.q.ensure_state(state);
        self.core.q.ensure_state(next_state);
        let next = if done {
            0.0
        } else {
            self.core.q.get(next_state, next_action)
        };
        let target = reward + self.core.params.gamma * next;
        self.core.td_step(state, action, target);
    }
}

impl Agent for SarsaAgent {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Sarsa
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::QLearningAgent;

    fn greedy_params() -> AgentParams {
        AgentParams {
            alpha: 0.3,
            gamma: 0.95,
            epsilon: 0.0,
        }
    }

    #[test]
    fn bootstraps_from_chosen_next_action() {
        let mut agent = SarsaAgent::with_seed(2, 4, greedy_params(), Some(0));
        agent.core.q.set(1, 0, 10.0);
        agent.core.q.set(1, 1, 2.0);
        agent.update(0, 0, 0.0, 1, 1, false);
        // target = 0.95 * 2, not 0.95 * 10
        assert!((agent.q_table().get(0, 0) - 0.3 * 0.95 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn terminal_update_ignores_next_action() {
        let mut agent = SarsaAgent::with_seed(2, 4, greedy_params(), Some(0));
        agent.core.q.set(1, 1, 50.0);
        agent.update(0, 0, 1.0, 1, 1, true);
        assert!((agent.q_table().get(0, 0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn matches_q_learning_under_greedy_next_action() {
        let mut sarsa = SarsaAgent::with_seed(3, 2, greedy_params(), Some(1));
        let mut qlearn = QLearningAgent::with_seed(3, 2, greedy_params(), Some(1));

        // Deterministic chain 0 -> 1 -> 2 (terminal), repeated.
        let transitions = [(0usize, 1usize, -0.1, 1usize, false), (1, 0, 1.0, 2, true)];
        for _ in 0..50 {
            for &(s, a, r, s_next, done) in &transitions {
                let greedy_next = sarsa.q_table().greedy_actions(s_next)[0];
                sarsa.update(s, a, r, s_next, greedy_next, done);
                qlearn.update(s, a, r, s_next, done);
            }
        }
        for s in 0..3 {
            for a in 0..2 {
                assert!((sarsa.q_table().get(s, a) - qlearn.q_table().get(s, a)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn algorithm_tag() {
        let agent = SarsaAgent::new(1, 4, AgentParams::default());
        assert_eq!(agent.algorithm(), Algorithm::Sarsa);
    }
}
