//! Agent trait and the epsilon-greedy core shared by all variants.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::{AgentParams, ParamsUpdate};
use super::q_table::QTable;
use super::types::Algorithm;

/// Capabilities common to every tabular agent.
///
/// The learning update differs per algorithm and lives on the concrete types
/// (and on [`AnyAgent`](super::AnyAgent)); this trait covers what renderers
/// and drivers need regardless of the variant.
pub trait Agent: Send {
    /// Which algorithm this agent implements.
    fn algorithm(&self) -> Algorithm;

    /// Picks an action for `state` using epsilon-greedy selection.
    fn choose_action(&mut self, state: usize) -> usize;

    /// Current Q-table. Values may change after the next update.
    fn q_table(&self) -> &QTable;

    /// Current hyperparameters.
    fn params(&self) -> AgentParams;

    /// Changes hyperparameters in place; learned values are kept.
    fn set_params(&mut self, update: ParamsUpdate);

    /// Discards everything learned and re-zeroes the table.
    fn reinit(&mut self, states: usize, actions: usize);
}

/// Table, hyperparameters and RNG shared by the three agents.
#[derive(Debug, Clone)]
pub struct TabularCore {
    pub q: QTable,
    pub params: AgentParams,
    rng: StdRng,
}

impl TabularCore {
    pub fn new(states: usize, actions: usize, params: AgentParams, rng: StdRng) -> Self {
        Self {
            q: QTable::new(states, actions),
            params,
            rng,
        }
    }

    /// Builds an RNG from `seed`, or from OS entropy when `None`.
    pub fn rng_from(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Epsilon-greedy selection.
    ///
    /// With probability ε a uniformly random action is returned. Otherwise
    /// the action with the highest value wins, with ties broken uniformly at
    /// random among all maximal actions so a flat table carries no
    /// directional bias.
    pub fn choose_action(&mut self, state: usize) -> usize {
        self.q.ensure_state(state);
        let actions = self.q.n_actions();
        if self.rng.gen::<f64>() < self.params.epsilon {
            return self.rng.gen_range(0..actions);
        }
        let best = self.q.greedy_actions(state);
        best.choose(&mut self.rng).copied().unwrap_or(0)
    }

    /// Moves `Q[state][action]` a fraction α toward `target`.
    ///
    /// # Panics
    ///
    /// Panics if `action >= q.n_actions()`.
    pub fn td_step(&mut self, state: usize, action: usize, target: f64) {
        debug_assert!(
            action < self.q.n_actions(),
            "action index {action} out of range for {} actions",
            self.q.n_actions()
        );
        let alpha = self.params.alpha;
        let q = &mut self.q.row_mut(state)[action];
        *q += alpha * (target - *q);
    }

    pub fn reinit(&mut self, states: usize, actions: usize) {
        self.q.reinit(states, actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core(epsilon: f64, seed: u64) -> TabularCore {
        let params = AgentParams {
            epsilon,
            ..AgentParams::default()
        };
        TabularCore::new(4, 4, params, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn greedy_picks_unique_best() {
        let mut c = core(0.0, 1);
        c.q.set(0, 2, 1.0);
        for _ in 0..20 {
            assert_eq!(c.choose_action(0), 2);
        }
    }

    #[test]
    fn ties_are_broken_uniformly() {
        let mut c = core(0.0, 7);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[c.choose_action(0)] += 1;
        }
        for n in counts {
            assert!(n > 800, "tie-breaking is biased: {counts:?}");
        }
    }

    #[test]
    fn ties_only_among_maximal_actions() {
        let mut c = core(0.0, 9);
        c.q.set(0, 1, 3.0);
        c.q.set(0, 3, 3.0);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[c.choose_action(0)] = true;
        }
        assert_eq!(seen, [false, true, false, true]);
    }

    #[test]
    fn epsilon_above_one_always_explores() {
        let mut c = core(1.5, 3);
        c.q.set(0, 0, 100.0);
        let mut non_greedy = 0;
        for _ in 0..400 {
            if c.choose_action(0) != 0 {
                non_greedy += 1;
            }
        }
        assert!(non_greedy > 200);
    }

    #[test]
    fn choose_action_grows_table() {
        let mut c = core(0.0, 1);
        let a = c.choose_action(30);
        assert!(a < 4);
        assert_eq!(c.q.n_states(), 31);
    }

    #[test]
    fn td_step_moves_toward_target() {
        let mut c = core(0.0, 1);
        c.td_step(1, 0, 10.0);
        assert!((c.q.get(1, 0) - 1.0).abs() < 1e-12);
    }
}
