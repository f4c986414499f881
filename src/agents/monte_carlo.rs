//! Every-visit Monte-Carlo control.

use super::config::{AgentParams, ParamsUpdate};
use super::q_table::QTable;
use super::trait_::{Agent, TabularCore};
use super::types::Algorithm;

/// A single `(state, action, reward)` step recorded during an episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
}

/// Computes discounted returns backward from the final reward.
///
/// `G_t = r_t + γ · G_{t+1}` with `G` past the last step equal to zero.
pub fn discounted_returns(rewards: &[f64], gamma: f64) -> Vec<f64> {
    let mut returns = vec![0.0; rewards.len()];
    let mut g = 0.0;
    for t in (0..rewards.len()).rev() {
        g = rewards[t] + gamma * g;
        returns[t] = g;
    }
    returns
}

/// Episodic on-policy control with every-visit incremental averaging.
///
/// Transitions are buffered with [`MonteCarloAgent::record`] and only
/// folded into the table by [`MonteCarloAgent::finish_episode`]; until then
/// the table does not reflect the current trajectory. Each visit of
/// `(s, a)` moves the estimate by `(G − Q) / N(s, a)`, so `Q` is the running
/// mean of all observed returns and `alpha` is unused.
#[derive(Debug, Clone)]
pub struct MonteCarloAgent {
    core: TabularCore,
    visits: Vec<Vec<u32>>,
    episode: Vec<Transition>,
}

impl MonteCarloAgent {
    /// Creates an agent seeded from OS entropy.
    pub fn new(states: usize, actions: usize, params: AgentParams) -> Self {
        Self::with_seed(states, actions, params, None)
    }

    /// Creates an agent with a reproducible RNG when `seed` is given.
    pub fn with_seed(states: usize, actions: usize, params: AgentParams, seed: Option<u64>) -> Self {
        Self {
            core: TabularCore::new(states, actions, params, TabularCore::rng_from(seed)),
            visits: vec![vec![0; actions]; states],
            episode: Vec::new(),
        }
    }

    /// Clears the transition buffer.
    pub fn start_episode(&mut self) {
        self.episode.clear();
    }

    /// Appends a transition to the current episode.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `action` is not a valid action index;
    /// otherwise the bad index panics in [`MonteCarloAgent::finish_episode`].
    pub fn record(&mut self, state: usize, action: usize, reward: f64) {
        debug_assert!(
            action < self.core.q.n_actions(),
            "action index {action} out of range for {} actions",
            self.core.q.n_actions()
        );
        self.core.q.ensure_state(state);
        self.episode.push(Transition {
            state,
            action,
            reward,
        });
    }

    /// Transitions recorded since the last [`MonteCarloAgent::start_episode`].
    pub fn episode(&self) -> &[Transition] {
        &self.episode
    }

    /// Number of returns averaged into `(state, action)` so far.
    pub fn visit_count(&self, state: usize, action: usize) -> u32 {
        self.visits
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0)
    }

    /// Computes returns for the buffered episode and updates every visited
    /// pair. Drains the buffer; a no-op when nothing was recorded.
    ///
    /// # Panics
    ///
    /// Panics if a recorded action is not a valid action index.
    pub fn finish_episode(&mut self) {
        if self.episode.is_empty() {
            return;
        }
        let rewards: Vec<f64> = self.episode.iter().map(|t| t.reward).collect();
        let returns = discounted_returns(&rewards, self.core.params.gamma);
        let actions = self.core.q.n_actions();

        for (t, g) in self.episode.drain(..).zip(returns) {
            if t.state >= self.visits.len() {
                self.visits.resize(t.state + 1, vec![0; actions]);
            }
            let n = &mut self.visits[t.state][t.action];
            *n += 1;
            let n = f64::from(*n);
            let q = &mut self.core.q.row_mut(t.state)[t.action];
            *q += (g - *q) / n;
        }
    }
}

impl Agent for MonteCarloAgent {
    fn algorithm(&self) -> Algorithm {
        Algorithm::MonteCarlo
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
        self.visits = vec![vec![0; actions]; states];
        self.episode.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AgentParams {
        AgentParams {
            alpha: 0.1,
            gamma: 0.99,
            epsilon: 0.0,
        }
    }

    #[test]
    fn returns_accumulate_right_to_left() {
        let returns = discounted_returns(&[-0.1, -0.1, 10.0], 0.99);
        assert_eq!(returns.len(), 3);
        assert!((returns[2] - 10.0).abs() < 1e-3);
        assert!((returns[1] - 9.8).abs() < 1e-3);
        assert!((returns[0] - 9.602).abs() < 1e-3);
    }

    #[test]
    fn empty_episode_has_no_returns() {
        assert!(discounted_returns(&[], 0.9).is_empty());
    }

    #[test]
    fn finish_episode_sets_first_visit_to_return() {
        let mut agent = MonteCarloAgent::with_seed(25, 4, params(), Some(0));
        agent.start_episode();
        agent.record(0, 1, -0.1);
        agent.record(1, 2, -0.1);
        agent.record(6, 2, 10.0);
        // Stale until the episode is finished.
        assert_eq!(agent.q_table().get(0, 1), 0.0);
        agent.finish_episode();

        assert!((agent.q_table().get(6, 2) - 10.0).abs() < 1e-9);
        assert!((agent.q_table().get(1, 2) - 9.8).abs() < 1e-9);
        assert!((agent.q_table().get(0, 1) - 9.602).abs() < 1e-9);
        assert!(agent.episode().is_empty());
    }

    #[test]
    fn repeated_visits_average_returns() {
        let mut agent = MonteCarloAgent::with_seed(1, 1, params(), Some(0));
        for reward in [2.0, 4.0, 9.0] {
            agent.start_episode();
            agent.record(0, 0, reward);
            agent.finish_episode();
        }
        assert_eq!(agent.visit_count(0, 0), 3);
        assert!((agent.q_table().get(0, 0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn every_visit_counts_each_occurrence() {
        let mut agent = MonteCarloAgent::with_seed(2, 2, params(), Some(0));
        agent.start_episode();
        agent.record(0, 0, 1.0);
        agent.record(0, 0, 1.0);
        agent.finish_episode();
        assert_eq!(agent.visit_count(0, 0), 2);
        // Returns are 1.99 and 1.0; their mean.
        assert!((agent.q_table().get(0, 0) - 1.495).abs() < 1e-12);
    }

    #[test]
    fn start_episode_discards_partial_buffer() {
        let mut agent = MonteCarloAgent::with_seed(2, 2, params(), Some(0));
        agent.record(0, 0, 5.0);
        agent.start_episode();
        agent.finish_episode();
        assert_eq!(agent.q_table().get(0, 0), 0.0);
        assert_eq!(agent.visit_count(0, 0), 0);
    }

    #[test]
    fn grows_for_states_beyond_declared_count() {
        let mut agent = MonteCarloAgent::with_seed(1, 4, params(), Some(0));
        agent.start_episode();
        agent.record(10, 3, 1.0);
        agent.finish_episode();
        assert_eq!(agent.visit_count(10, 3), 1);
        assert_eq!(agent.q_table().get(10, 3), 1.0);
    }

    #[test]
    fn reinit_clears_counts() {
        let mut agent = MonteCarloAgent::with_seed(1, 1, params(), Some(0));
        agent.record(0, 0, 1.0);
        agent.finish_episode();
        agent.reinit(1, 1);
        assert_eq!(agent.visit_count(0, 0), 0);
        assert_eq!(agent.q_table().get(0, 0), 0.0);
    }

    #[test]
    #[should_panic]
    fn unknown_action_is_rejected() {
        let mut agent = MonteCarloAgent::new(3, 4, params());
        agent.start_episode();
        agent.record(0, 9, -0.1);
        agent.finish_episode();
    }
}
