//! Per-episode metrics and run history.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::agents::{AgentParams, Algorithm};
use crate::Id;

/// Outcome of one completed episode. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpisodeRecord {
    /// 1-based episode number within the run.
    pub episode: usize,
    /// Sum of rewards over the episode.
    pub reward: f64,
    /// Steps taken.
    pub steps: u32,
    /// True iff the episode ended on the goal rather than at the step cap.
    pub reached: bool,
}

/// Per-episode event emitted by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    pub record: EpisodeRecord,
    /// Whether the run has converged at or before this episode.
    pub converged: bool,
}

impl fmt::Display for EpisodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {} - reward {:.2} - steps {} - reached: {} - Converged: {}",
            self.record.episode,
            self.record.reward,
            self.record.steps,
            self.record.reached,
            if self.converged { "YES" } else { "NO" }
        )
    }
}

/// Ordered record of a training run plus the settings that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunHistory {
    /// Unique run identifier.
    pub id: Id,
    pub algorithm: Algorithm,
    /// Number of episodes requested for the run.
    pub episodes: usize,
    pub params: AgentParams,
    /// First episode at which the convergence check passed.
    pub first_converged: Option<usize>,
    records: Vec<EpisodeRecord>,
}

impl RunHistory {
    /// Creates an empty history.
    pub fn new(algorithm: Algorithm, episodes: usize, params: AgentParams) -> Self {
        Self {
            id: crate::generate_id(),
            algorithm,
            episodes,
            params,
            first_converged: None,
            records: Vec::with_capacity(episodes),
        }
    }

    /// Appends a completed episode.
    pub fn push(&mut self, record: EpisodeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.records.last()
    }

    /// Episode rewards in order.
    pub fn rewards(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.reward).collect()
    }

    /// Episode step counts in order.
    pub fn steps(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.steps).collect()
    }

    /// Goal-reached flags in order.
    pub fn reached(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.reached).collect()
    }

    /// Fraction of the last `n` episodes that reached the goal.
    pub fn success_rate_last(&self, n: usize) -> f64 {
        let tail = self.tail(n);
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().filter(|r| r.reached).count() as f64 / tail.len() as f64
    }

    /// Mean reward over the last `window` episodes (0 when empty).
    pub fn moving_average(&self, window: usize) -> f64 {
        let tail = self.tail(window);
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().map(|r| r.reward).sum::<f64>() / tail.len() as f64
    }

    fn tail(&self, n: usize) -> &[EpisodeRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(episode: usize, reward: f64, steps: u32, reached: bool) -> EpisodeRecord {
        EpisodeRecord {
            episode,
            reward,
            steps,
            reached,
        }
    }

    fn history() -> RunHistory {
        let mut h = RunHistory::new(Algorithm::QLearning, 4, AgentParams::default());
        h.push(record(1, -20.0, 200, false));
        h.push(record(2, 5.0, 40, true));
        h.push(record(3, 8.0, 12, true));
        h.push(record(4, 9.2, 8, true));
        h
    }

    #[test]
    fn sequences_follow_insertion_order() {
        let h = history();
        assert_eq!(h.len(), 4);
        assert_eq!(h.rewards(), vec![-20.0, 5.0, 8.0, 9.2]);
        assert_eq!(h.steps(), vec![200, 40, 12, 8]);
        assert_eq!(h.reached(), vec![false, true, true, true]);
        assert_eq!(h.last().map(|r| r.episode), Some(4));
    }

    #[test]
    fn success_rate_over_tail() {
        let h = history();
        assert!((h.success_rate_last(2) - 1.0).abs() < 1e-12);
        assert!((h.success_rate_last(4) - 0.75).abs() < 1e-12);
        assert!((h.success_rate_last(100) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn moving_average_over_tail() {
        let h = history();
        assert!((h.moving_average(2) - 8.6).abs() < 1e-12);
        let empty = RunHistory::new(Algorithm::Sarsa, 0, AgentParams::default());
        assert_eq!(empty.moving_average(10), 0.0);
        assert_eq!(empty.success_rate_last(10), 0.0);
    }

    #[test]
    fn runs_get_distinct_ids() {
        let a = RunHistory::new(Algorithm::Sarsa, 1, AgentParams::default());
        let b = RunHistory::new(Algorithm::Sarsa, 1, AgentParams::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn report_display() {
        let report = EpisodeReport {
            record: record(7, 9.2, 8, true),
            converged: false,
        };
        assert_eq!(
            report.to_string(),
            "Episode 7 - reward 9.20 - steps 8 - reached: true - Converged: NO"
        );
    }
}
