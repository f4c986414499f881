//! Cross-run summaries over exported histories.
//!
//! Runs are grouped by algorithm and aligned on the shortest run of each
//! group. Convergence here uses a looser rule than
//! [`ConvergenceCriteria`](super::ConvergenceCriteria): a trailing window with
//! success rate of at least 0.75 and reward (population) standard deviation of
//! at most 1.0, with no step-trend condition.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::metrics::{EpisodeRecord, RunHistory};
use crate::agents::Algorithm;

const SUCCESS_THRESHOLD: f64 = 0.75;
const REWARD_STD_THRESHOLD: f64 = 1.0;

/// Summary of all runs of one algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    pub algorithm: Algorithm,
    pub runs: usize,
    /// Episodes each run was truncated to.
    pub episodes_used: usize,
    pub mean_reward_last_window: f64,
    /// Sample standard deviation over all runs' trailing rewards.
    pub std_reward_last_window: f64,
    pub mean_steps_last_window: f64,
    pub success_rate_last_window_mean: f64,
    /// Over converged runs only.
    pub mean_convergence_episode: Option<f64>,
    /// Sample standard deviation; needs at least two converged runs.
    pub std_convergence_episode: Option<f64>,
    pub runs_converged: usize,
    /// Per-episode mean reward across the aligned runs.
    pub avg_rewards: Vec<f64>,
    /// Per-episode population standard deviation of reward.
    pub std_rewards: Vec<f64>,
    pub avg_steps: Vec<f64>,
    pub std_steps: Vec<f64>,
}

/// Summarizes `runs` per algorithm, using the last `window` aligned episodes
/// (fewer if the runs are shorter). Empty runs are ignored.
pub fn summarize(runs: &[RunHistory], window: usize) -> Vec<RunSummary> {
    Algorithm::all()
        .into_iter()
        .filter_map(|algorithm| {
            let group: Vec<&RunHistory> = runs
                .iter()
                .filter(|r| r.algorithm == algorithm && !r.is_empty())
                .collect();
            summarize_group(algorithm, &group, window)
        })
        .collect()
}

fn summarize_group(algorithm: Algorithm, group: &[&RunHistory], window: usize) -> Option<RunSummary> {
    let episodes_used = group.iter().map(|r| r.len()).min()?;
    let window = window.min(episodes_used).max(1);
    let tail = episodes_used - window..episodes_used;

    let mut last_rewards = Vec::with_capacity(group.len() * window);
    let mut last_steps = Vec::with_capacity(group.len() * window);
    let mut success_rates = Vec::with_capacity(group.len());
    let mut converged = Vec::new();

    for run in group {
        let records = &run.records()[..episodes_used];
        let trailing = &records[tail.clone()];
        last_rewards.extend(trailing.iter().map(|r| r.reward));
        last_steps.extend(trailing.iter().map(|r| f64::from(r.steps)));
        success_rates.push(trailing.iter().filter(|r| r.reached).count() as f64 / window as f64);

        let rewards: Vec<f64> = records.iter().map(|r| r.reward).collect();
        let reached: Vec<bool> = records.iter().map(|r| r.reached).collect();
        if let Some(ep) = lenient_convergence(&rewards, &reached, window) {
            converged.push(ep as f64);
        }
    }

    let (avg_rewards, std_rewards) = episode_curves(group, episodes_used, |r| r.reward);
    let (avg_steps, std_steps) = episode_curves(group, episodes_used, |r| f64::from(r.steps));

    Some(RunSummary {
        algorithm,
        runs: group.len(),
        episodes_used,
        mean_reward_last_window: mean(&last_rewards),
        std_reward_last_window: sample_std(&last_rewards).unwrap_or(0.0),
        mean_steps_last_window: mean(&last_steps),
        success_rate_last_window_mean: mean(&success_rates),
        mean_convergence_episode: (!converged.is_empty()).then(|| mean(&converged)),
        std_convergence_episode: sample_std(&converged),
        runs_converged: converged.len(),
        avg_rewards,
        std_rewards,
        avg_steps,
        std_steps,
    })
}

/// Mean and population std of `metric` at each aligned episode.
fn episode_curves<F>(group: &[&RunHistory], episodes: usize, metric: F) -> (Vec<f64>, Vec<f64>)
where
    F: Fn(&EpisodeRecord) -> f64,
{
    (0..episodes)
        .map(|i| {
            let column: Vec<f64> = group.iter().map(|run| metric(&run.records()[i])).collect();
            (mean(&column), population_std(&column))
        })
        .unzip()
}

/// First episode (1-based) whose trailing `window` meets the lenient rule.
pub fn lenient_convergence(rewards: &[f64], reached: &[bool], window: usize) -> Option<usize> {
    let n = rewards.len().min(reached.len());
    if window == 0 || n < window {
        return None;
    }
    (window..=n).find(|&ep| {
        let r = &rewards[ep - window..ep];
        let hits = reached[ep - window..ep].iter().filter(|&&x| x).count();
        hits as f64 / window as f64 >= SUCCESS_THRESHOLD && population_std(r) <= REWARD_STD_THRESHOLD
    })
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn population_std(xs: &[f64]) -> f64 {
    let m = mean(xs);
    (xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64).sqrt()
}

fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs);
    Some((xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentParams;

    fn run(algorithm: Algorithm, eps: &[(f64, u32, bool)]) -> RunHistory {
        let mut h = RunHistory::new(algorithm, eps.len(), AgentParams::default());
        for (i, &(reward, steps, reached)) in eps.iter().enumerate() {
            h.push(EpisodeRecord {
                episode: i + 1,
                reward,
                steps,
                reached,
            });
        }
        h
    }

    fn learning_run(algorithm: Algorithm, failures: usize, total: usize) -> RunHistory {
        let eps: Vec<_> = (0..total)
            .map(|i| if i < failures { (-20.0, 200, false) } else { (9.2, 8, true) })
            .collect();
        run(algorithm, &eps)
    }

    #[test]
    fn lenient_rule_finds_first_stable_window() {
        let h = learning_run(Algorithm::QLearning, 3, 12);
        // Window 4 is clean once it no longer holds a failure.
        assert_eq!(lenient_convergence(&h.rewards(), &h.reached(), 4), Some(7));
        assert_eq!(lenient_convergence(&h.rewards(), &h.reached(), 20), None);
    }

    #[test]
    fn groups_by_algorithm_and_aligns_lengths() {
        let runs = vec![
            learning_run(Algorithm::Sarsa, 2, 10),
            learning_run(Algorithm::QLearning, 2, 10),
            learning_run(Algorithm::QLearning, 4, 8),
            RunHistory::new(Algorithm::MonteCarlo, 5, AgentParams::default()),
        ];
        let summary = summarize(&runs, 4);
        assert_eq!(summary.len(), 2);

        let q = &summary[0];
        assert_eq!(q.algorithm, Algorithm::QLearning);
        assert_eq!(q.runs, 2);
        assert_eq!(q.episodes_used, 8);
        assert_eq!(q.success_rate_last_window_mean, 1.0);
        assert!((q.mean_reward_last_window - 9.2).abs() < 1e-9);
        assert_eq!(q.mean_steps_last_window, 8.0);
        assert!(q.std_reward_last_window < 1e-9);
        assert_eq!(q.runs_converged, 2);
        // Converged at 6 and 8.
        assert_eq!(q.mean_convergence_episode, Some(7.0));
        assert!((q.std_convergence_episode.unwrap() - 2f64.sqrt()).abs() < 1e-9);

        let s = &summary[1];
        assert_eq!(s.algorithm, Algorithm::Sarsa);
        assert_eq!(s.runs_converged, 1);
        assert!(s.std_convergence_episode.is_none());
    }

    #[test]
    fn per_episode_curves_span_aligned_runs() {
        let runs = vec![
            learning_run(Algorithm::Sarsa, 1, 4),
            learning_run(Algorithm::Sarsa, 2, 3),
        ];
        let s = &summarize(&runs, 2)[0];
        assert_eq!(s.avg_rewards.len(), 3);
        assert_eq!(s.avg_steps, vec![200.0, 104.0, 8.0]);
        assert_eq!(s.std_steps, vec![0.0, 96.0, 0.0]);
        assert!((s.avg_rewards[1] - (-20.0 + 9.2) / 2.0).abs() < 1e-9);
        assert!((s.std_rewards[1] - 14.6).abs() < 1e-9);
        assert_eq!(s.std_rewards[0], 0.0);
    }

    #[test]
    fn unconverged_group_has_no_convergence_stats() {
        let runs = vec![learning_run(Algorithm::MonteCarlo, 10, 10)];
        let s = &summarize(&runs, 5)[0];
        assert_eq!(s.runs_converged, 0);
        assert!(s.mean_convergence_episode.is_none());
        assert_eq!(s.success_rate_last_window_mean, 0.0);
    }
}
