//! Offline head-to-head comparison of two algorithms.
//!
//! Each trial is an independent, unpaced run with its own environment and
//! agent; metrics are averaged per episode across repeats. With the
//! `parallel` feature trials run on the rayon thread pool; results are the
//! same as the sequential order for a given base seed.

use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::RunConfig;
use super::convergence::ConvergenceCriteria;
use super::error::TrainingError;
use super::metrics::RunHistory;
use super::runner::EpisodeRunner;
use crate::agents::{AgentParams, Algorithm};
use crate::environment::GridConfig;

/// Episodes at the end of a trial used for the path-quality statistic.
const PATH_QUALITY_WINDOW: usize = 100;

/// Settings for [`compare`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonConfig {
    /// The two algorithms compared.
    pub algorithms: [Algorithm; 2],
    /// Independent trials per algorithm.
    pub repeats: usize,
    /// Episodes per trial.
    pub episodes: usize,
    /// Grid side length; other grid settings use defaults.
    pub size: usize,
    pub params: AgentParams,
    pub convergence: ConvergenceCriteria,
    /// Base seed; each trial derives its own.
    pub seed: u64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            algorithms: [Algorithm::QLearning, Algorithm::Sarsa],
            repeats: 5,
            episodes: 500,
            size: 5,
            params: AgentParams::default(),
            convergence: ConvergenceCriteria::default(),
            seed: 0,
        }
    }
}

impl ComparisonConfig {
    /// Seed for trial `repeat` of the algorithm at `slot` (0 or 1).
    pub fn trial_seed(&self, repeat: usize, slot: usize) -> u64 {
        self.seed
            .wrapping_mul(1_000_003)
            .wrapping_add((repeat * self.algorithms.len() + slot) as u64)
    }

    fn run_config(&self, algorithm: Algorithm, seed: u64) -> RunConfig {
        RunConfig {
            algorithm,
            episodes: self.episodes,
            grid: GridConfig {
                size: self.size,
                ..GridConfig::default()
            },
            params: self.params,
            convergence: self.convergence,
            seed: Some(seed),
            step_delay: None,
        }
    }
}

/// Aggregated results for one algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlgorithmSummary {
    pub algorithm: Algorithm,
    /// Mean reward per episode across repeats.
    pub rewards_per_episode: Vec<f64>,
    /// Mean steps per episode across repeats.
    pub steps_per_episode: Vec<f64>,
    /// Fraction of repeats that reached the goal, per episode.
    pub success_per_episode: Vec<f64>,
    /// Per trial: first converging episode, or `episodes` if none.
    pub converge_episodes: Vec<usize>,
    /// Mean of `converge_episodes`.
    pub avg_converge: Option<f64>,
    /// Success-weighted mean steps over the final 100 episodes.
    pub avg_steps_when_success: Option<f64>,
}

impl AlgorithmSummary {
    fn from_trials(algorithm: Algorithm, episodes: usize, trials: &[RunHistory], criteria: &ConvergenceCriteria) -> Self {
        let mut rewards = vec![0.0; episodes];
        let mut steps = vec![0.0; episodes];
        let mut success = vec![0.0; episodes];
        let mut converge_episodes = Vec::with_capacity(trials.len());

        for trial in trials {
            for (i, r) in trial.records().iter().take(episodes).enumerate() {
                rewards[i] += r.reward;
                steps[i] += f64::from(r.steps);
                success[i] += if r.reached { 1.0 } else { 0.0 };
            }
            let converged = criteria
                .first_convergence(&trial.rewards(), &trial.reached(), &trial.steps())
                .unwrap_or(episodes);
            converge_episodes.push(converged);
        }

        if !trials.is_empty() {
            let n = trials.len() as f64;
            for v in rewards.iter_mut().chain(steps.iter_mut()).chain(success.iter_mut()) {
                *v /= n;
            }
        }

        let avg_converge = (!converge_episodes.is_empty()).then(|| {
            converge_episodes.iter().sum::<usize>() as f64 / converge_episodes.len() as f64
        });

        let tail = episodes.saturating_sub(PATH_QUALITY_WINDOW);
        let (weighted_steps, weight) = (tail..episodes)
            .fold((0.0, 0.0), |(sum, w), i| (sum + steps[i] * success[i], w + success[i]));
        let avg_steps_when_success = (weight > 0.0).then(|| weighted_steps / weight);

        Self {
            algorithm,
            rewards_per_episode: rewards,
            steps_per_episode: steps,
            success_per_episode: success,
            converge_episodes,
            avg_converge,
            avg_steps_when_success,
        }
    }
}

/// Results for both compared algorithms, in configuration order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonReport {
    pub repeats: usize,
    pub episodes: usize,
    pub summaries: [AlgorithmSummary; 2],
}

impl ComparisonReport {
    pub fn summary(&self, algorithm: Algorithm) -> Option<&AlgorithmSummary> {
        self.summaries.iter().find(|s| s.algorithm == algorithm)
    }
}

/// Runs one unpaced trial to completion.
pub fn run_trial(config: RunConfig) -> Result<RunHistory, TrainingError> {
    let mut runner = EpisodeRunner::new(config);
    runner.run_to_end()?;
    let (_, _, history) = runner.into_parts();
    Ok(history)
}

/// Runs `repeats` trials of each configured algorithm and aggregates them.
pub fn compare(config: &ComparisonConfig) -> Result<ComparisonReport, TrainingError> {
    info!(
        first = %config.algorithms[0],
        second = %config.algorithms[1],
        repeats = config.repeats,
        episodes = config.episodes,
        size = config.size,
        "Comparison started"
    );

    let trials = run_all_trials(config)?;
    let mut per_algorithm: [Vec<RunHistory>; 2] = [Vec::new(), Vec::new()];
    for (slot, history) in trials {
        per_algorithm[slot].push(history);
    }

    let [first, second] = per_algorithm;
    let summaries = [
        AlgorithmSummary::from_trials(config.algorithms[0], config.episodes, &first, &config.convergence),
        AlgorithmSummary::from_trials(config.algorithms[1], config.episodes, &second, &config.convergence),
    ];
    for s in &summaries {
        info!(
            algorithm = %s.algorithm,
            avg_converge = ?s.avg_converge,
            avg_steps_when_success = ?s.avg_steps_when_success,
            "Comparison summary"
        );
    }

    Ok(ComparisonReport {
        repeats: config.repeats,
        episodes: config.episodes,
        summaries,
    })
}

fn trial_jobs(config: &ComparisonConfig) -> Vec<(usize, usize)> {
    (0..config.repeats)
        .flat_map(|repeat| (0..config.algorithms.len()).map(move |slot| (repeat, slot)))
        .collect()
}

fn run_job(config: &ComparisonConfig, repeat: usize, slot: usize) -> Result<(usize, RunHistory), TrainingError> {
    let algorithm = config.algorithms[slot];
    let history = run_trial(config.run_config(algorithm, config.trial_seed(repeat, slot)))?;
    info!(
        %algorithm,
        repeat,
        success_rate = history.success_rate_last(config.convergence.window),
        "Trial finished"
    );
    Ok((slot, history))
}

#[cfg(not(feature = "parallel"))]
fn run_all_trials(config: &ComparisonConfig) -> Result<Vec<(usize, RunHistory)>, TrainingError> {
    trial_jobs(config)
        .into_iter()
        .map(|(repeat, slot)| run_job(config, repeat, slot))
        .collect()
}

#[cfg(feature = "parallel")]
fn run_all_trials(config: &ComparisonConfig) -> Result<Vec<(usize, RunHistory)>, TrainingError> {
    trial_jobs(config)
        .into_par_iter()
        .map(|(repeat, slot)| run_job(config, repeat, slot))
        .collect()
}
