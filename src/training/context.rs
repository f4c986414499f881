//! Shared view of the live run for rendering collaborators.

use std::sync::{Arc, Mutex};

use super::runner::EpisodeRunner;
use crate::agents::{Agent, Algorithm, QTable};
use crate::environment::{Cell, Grid};

/// Copy of everything an overlay needs to draw the current run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSnapshot {
    pub algorithm: Algorithm,
    /// Number of completed episodes.
    pub episodes_done: usize,
    pub grid: Grid,
    pub start: Cell,
    pub goal: Cell,
    pub agent: Cell,
    pub q: QTable,
}

impl RunSnapshot {
    pub fn capture(runner: &EpisodeRunner) -> Self {
        let world = runner.world();
        Self {
            algorithm: runner.algorithm(),
            episodes_done: runner.history().len(),
            grid: world.grid().clone(),
            start: world.start(),
            goal: world.goal(),
            agent: world.agent(),
            q: runner.agent().q_table().clone(),
        }
    }

    /// Greedy action per state, for policy arrows.
    pub fn policy(&self) -> Vec<usize> {
        self.q.greedy_policy()
    }

    /// State values rescaled to `[0, 1]` for a heatmap; a flat table maps
    /// every state to 0.5.
    pub fn normalized_values(&self) -> Vec<f64> {
        let values = self.q.state_values();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        values
            .iter()
            .map(|&v| if max == min { 0.5 } else { (v - min) / (max - min) })
            .collect()
    }
}

/// Handle to the "current run" slot.
///
/// The trainer fills it when a run begins, refreshes it as the run
/// progresses and clears it when the run ends; renderers hold a clone and
/// read [`RunContext::snapshot`]. Empty whenever no run is active.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    current: Arc<Mutex<Option<RunSnapshot>>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a run as active.
    pub fn begin(&self, runner: &EpisodeRunner) {
        self.publish(runner);
    }

    /// Replaces the snapshot with the runner's current state.
    pub fn publish(&self, runner: &EpisodeRunner) {
        let snapshot = RunSnapshot::capture(runner);
        if let Ok(mut current) = self.current.lock() {
            *current = Some(snapshot);
        } else {
            tracing::warn!("Failed to lock run context for update");
        }
    }

    /// Marks the run as finished.
    pub fn end(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        } else {
            tracing::warn!("Failed to lock run context for clear");
        }
    }

    /// Latest snapshot, or `None` when no run is active.
    pub fn snapshot(&self) -> Option<RunSnapshot> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    pub fn is_active(&self) -> bool {
        self.current.lock().map(|c| c.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::RunConfig;

    #[test]
    fn lifecycle() {
        let ctx = RunContext::new();
        assert!(!ctx.is_active());
        assert!(ctx.snapshot().is_none());

        let mut runner = EpisodeRunner::new(RunConfig {
            episodes: 2,
            seed: Some(1),
            ..RunConfig::default()
        });
        ctx.begin(&runner);
        assert!(ctx.is_active());
        let snap = ctx.snapshot().unwrap();
        assert_eq!(snap.episodes_done, 0);
        assert_eq!(snap.agent, Cell::origin());
        assert_eq!(snap.goal, Cell::new(4, 4));

        runner.run_episode().unwrap();
        ctx.publish(&runner);
        assert_eq!(ctx.snapshot().unwrap().episodes_done, 1);

        ctx.end();
        assert!(!ctx.is_active());
    }

    #[test]
    fn normalized_values_are_in_unit_range() {
        let mut runner = EpisodeRunner::new(RunConfig {
            episodes: 5,
            seed: Some(3),
            ..RunConfig::default()
        });
        let flat = RunSnapshot::capture(&runner);
        assert!(flat.normalized_values().iter().all(|&v| v == 0.5));

        runner.run_to_end().unwrap();
        let snap = RunSnapshot::capture(&runner);
        let values = snap.normalized_values();
        assert_eq!(values.len(), 25);
        assert!(values.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(snap.policy().len(), 25);
    }
}
