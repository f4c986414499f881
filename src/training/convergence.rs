//! Convergence detection over trailing episode metrics.
//!
//! Pure functions: the same metric prefix always gives the same answer, so
//! the check can run after every episode or be replayed over prefixes to find
//! the first converging episode.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds for declaring a run converged.
///
/// All conditions must hold over the last `window` episodes:
///
/// 1. goal reached at least `ceil(success_ratio × window)` times;
/// 2. `max(reward) − min(reward) <= reward_tolerance`;
/// 3. mean steps of the second half of the window is at least `step_drop`
///    below the mean of the first half.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConvergenceCriteria {
    pub window: usize,
    pub success_ratio: f64,
    pub reward_tolerance: f64,
    pub step_drop: f64,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            window: 20,
            success_ratio: 0.75,
            reward_tolerance: 1.0,
            step_drop: 0.5,
        }
    }
}

impl ConvergenceCriteria {
    /// Default thresholds with a different window.
    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Minimum number of successes required in the window.
    pub fn min_successes(&self) -> usize {
        (self.success_ratio * self.window as f64).ceil() as usize
    }

    /// Evaluates the trailing window of the three metric sequences.
    ///
    /// Returns false while fewer than `window` episodes exist. The sequences
    /// are expected to have equal length; the shortest one bounds the check.
    pub fn is_converged(&self, rewards: &[f64], reached: &[bool], steps: &[u32]) -> bool {
        let n = rewards.len().min(reached.len()).min(steps.len());
        let window = self.window;
        if window == 0 || n < window {
            return false;
        }
        let start = n - window;
        let rewards = &rewards[start..n];
        let reached = &reached[start..n];
        let steps = &steps[start..n];

        let successes = reached.iter().filter(|&&r| r).count();
        if successes < self.min_successes() {
            return false;
        }

        let r_max = rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let r_min = rewards.iter().copied().fold(f64::INFINITY, f64::min);
        if r_max - r_min > self.reward_tolerance {
            return false;
        }

        let half = window / 2;
        if half == 0 {
            return false;
        }
        let mean = |s: &[u32]| s.iter().map(|&x| f64::from(x)).sum::<f64>() / s.len() as f64;
        let first = mean(&steps[..half]);
        let second = mean(&steps[half..]);
        first - second >= self.step_drop
    }

    /// First episode count `e >= window` whose prefix of length `e`
    /// converges, scanning upward.
    pub fn first_convergence(&self, rewards: &[f64], reached: &[bool], steps: &[u32]) -> Option<usize> {
        let n = rewards.len().min(reached.len()).min(steps.len());
        (self.window.max(1)..=n)
            .find(|&e| self.is_converged(&rewards[..e], &reached[..e], &steps[..e]))
    }
}

/// Convergence check with default thresholds and the given window.
pub fn check_convergence(rewards: &[f64], reached: &[bool], steps: &[u32], window: usize) -> bool {
    ConvergenceCriteria::with_window(window).is_converged(rewards, reached, steps)
}

/// First converging episode under default thresholds, if any.
pub fn first_convergence(rewards: &[f64], reached: &[bool], steps: &[u32], window: usize) -> Option<usize> {
    ConvergenceCriteria::with_window(window).first_convergence(rewards, reached, steps)
}
