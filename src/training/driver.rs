//! Interactive training driver with cooperative pause and cancellation.

use std::thread;

use tracing::info;

use super::config::RunConfig;
use super::context::RunContext;
use super::control::RunControl;
use super::error::TrainingError;
use super::metrics::{EpisodeReport, RunHistory};
use super::runner::{EpisodeRunner, Tick};

/// How a driven run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every requested episode was recorded.
    Completed,
    /// The control handle was cancelled; only completed episodes were kept.
    Cancelled,
}

/// Drives [`EpisodeRunner`]s, honouring a [`RunControl`] between steps and
/// keeping an optional [`RunContext`] up to date.
///
/// ```
/// use gridlearn::training::{RunConfig, Trainer};
///
/// let trainer = Trainer::new();
/// let config = RunConfig { episodes: 3, seed: Some(1), ..RunConfig::default() };
/// let mut seen = 0;
/// let history = trainer.run(config, |_report| seen += 1).unwrap();
/// assert_eq!(history.len(), 3);
/// assert_eq!(seen, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    control: RunControl,
    context: Option<RunContext>,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `control` for pause/resume/cancel signals.
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    /// Publishes run snapshots to `context` while running.
    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Runs `config` from scratch and returns its history.
    ///
    /// A cancelled run returns the episodes completed so far.
    pub fn run<F>(&self, config: RunConfig, on_episode: F) -> Result<RunHistory, TrainingError>
    where
        F: FnMut(&EpisodeReport),
    {
        let mut runner = EpisodeRunner::new(config);
        self.drive(&mut runner, on_episode)?;
        let (_, _, history) = runner.into_parts();
        Ok(history)
    }

    /// Advances `runner` until it finishes or the control cancels it.
    ///
    /// The control is checked before every step; a pause blocks there. Once
    /// the last episode is recorded the run completes regardless. The
    /// context, if any, is set when driving starts, refreshed after every
    /// step, and cleared on exit whatever the outcome.
    pub fn drive<F>(&self, runner: &mut EpisodeRunner, mut on_episode: F) -> Result<RunOutcome, TrainingError>
    where
        F: FnMut(&EpisodeReport),
    {
        info!(
            algorithm = %runner.algorithm(),
            episodes = runner.config().episodes,
            alpha = runner.config().params.alpha,
            gamma = runner.config().params.gamma,
            epsilon = runner.config().params.epsilon,
            "Run started"
        );
        if let Some(ctx) = &self.context {
            ctx.begin(runner);
        }

        let result = self.drive_inner(runner, &mut on_episode);

        if let Some(ctx) = &self.context {
            ctx.end();
        }
        if let Ok(RunOutcome::Cancelled) = result {
            info!(
                algorithm = %runner.algorithm(),
                completed = runner.history().len(),
                "Run cancelled"
            );
        }
        result
    }

    fn drive_inner<F>(&self, runner: &mut EpisodeRunner, on_episode: &mut F) -> Result<RunOutcome, TrainingError>
    where
        F: FnMut(&EpisodeReport),
    {
        let delay = runner.config().step_delay;
        loop {
            if !runner.is_finished() && !self.control.wait_while_paused() {
                return Ok(RunOutcome::Cancelled);
            }
            match runner.tick()? {
                Tick::Stepped => {}
                Tick::EpisodeFinished(report) => on_episode(&report),
                Tick::RunFinished => return Ok(RunOutcome::Completed),
            }
            if let Some(ctx) = &self.context {
                ctx.publish(runner);
            }
            if let Some(delay) = delay {
                thread::sleep(delay);
            }
        }
    }
}
