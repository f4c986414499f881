//! Resumable episode loop.
//!
//! [`EpisodeRunner`] turns the three algorithm-specific interaction loops into
//! a single state machine advanced one environment step per
//! [`EpisodeRunner::tick`]. Between ticks the environment and the agent are
//! always consistent, so an outer loop can pause, render, or stop at any tick
//! boundary.

use tracing::{debug, info, warn};

use super::config::RunConfig;
use super::error::TrainingError;
use super::metrics::{EpisodeRecord, EpisodeReport, RunHistory};
use crate::agents::{Agent, Algorithm, AnyAgent};
use crate::environment::{Action, GridWorld};

/// What a call to [`EpisodeRunner::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// One step was taken; the episode continues.
    Stepped,
    /// The step ended an episode, which has been recorded.
    EpisodeFinished(EpisodeReport),
    /// All requested episodes are done; nothing was executed.
    RunFinished,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Next tick starts a fresh episode.
    BetweenEpisodes,
    /// Mid-episode. `action` is SARSA's pre-selected next action.
    InEpisode {
        state: usize,
        action: Option<usize>,
        reward: f64,
        steps: u32,
        reached: bool,
    },
    Finished,
}

/// Single-run driver owning one environment and one agent.
#[derive(Debug)]
pub struct EpisodeRunner {
    config: RunConfig,
    world: GridWorld,
    agent: AnyAgent,
    history: RunHistory,
    phase: Phase,
}

impl EpisodeRunner {
    /// Builds a fresh environment and agent from `config`.
    pub fn new(config: RunConfig) -> Self {
        let world = GridWorld::new(config.grid.clone());
        let agent = AnyAgent::new(
            config.algorithm,
            world.n_states(),
            Action::COUNT,
            config.params,
            config.seed,
        );
        Self::with_parts(config, world, agent)
    }

    /// Runs `config` against an existing environment and agent, e.g. an
    /// edited maze or an agent trained in a previous run.
    pub fn with_parts(config: RunConfig, world: GridWorld, agent: AnyAgent) -> Self {
        let history = RunHistory::new(agent.algorithm(), config.episodes, agent.params());
        Self {
            config,
            world,
            agent,
            history,
            phase: Phase::BetweenEpisodes,
        }
    }

    /// Advances the run by one environment step.
    ///
    /// Episode boundaries happen inside the tick that needs them: the first
    /// tick of an episode resets the environment before stepping, and the
    /// tick whose step ends the episode also finalizes learning and records
    /// metrics.
    ///
    /// An invalid action aborts the current episode: nothing is recorded and
    /// the next tick starts the same episode number afresh.
    pub fn tick(&mut self) -> Result<Tick, TrainingError> {
        if let Phase::Finished = self.phase {
            return Ok(Tick::RunFinished);
        }
        if let Phase::BetweenEpisodes = self.phase {
            if self.history.len() >= self.config.episodes {
                self.finish();
                return Ok(Tick::RunFinished);
            }
            self.begin_episode();
        }

        let Phase::InEpisode {
            state,
            action,
            mut reward,
            mut steps,
            mut reached,
        } = self.phase
        else {
            return Ok(Tick::RunFinished);
        };

        if self.world.is_done() || steps >= self.world.max_steps() {
            return Ok(Tick::EpisodeFinished(self.end_episode(reward, steps, reached)));
        }

        let result = match self.advance(state, action) {
            Ok(result) => result,
            Err(err) => {
                warn!(episode = self.history.len() + 1, %err, "Episode aborted");
                self.phase = Phase::BetweenEpisodes;
                return Err(err);
            }
        };
        let (next_state, next_action, step_reward, done) = result;

        reward += step_reward;
        steps += 1;
        reached |= self.world.at_goal();

        if done || steps >= self.world.max_steps() {
            return Ok(Tick::EpisodeFinished(self.end_episode(reward, steps, reached)));
        }

        self.phase = Phase::InEpisode {
            state: next_state,
            action: next_action,
            reward,
            steps,
            reached,
        };
        Ok(Tick::Stepped)
    }

    /// Ticks until the current episode ends and returns its report, or
    /// `None` if the run was already complete.
    pub fn run_episode(&mut self) -> Result<Option<EpisodeReport>, TrainingError> {
        loop {
            match self.tick()? {
                Tick::Stepped => continue,
                Tick::EpisodeFinished(report) => return Ok(Some(report)),
                Tick::RunFinished => return Ok(None),
            }
        }
    }

    /// Runs all remaining episodes without suspension.
    pub fn run_to_end(&mut self) -> Result<&RunHistory, TrainingError> {
        while self.run_episode()?.is_some() {}
        Ok(&self.history)
    }

    /// True once every requested episode has been recorded.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// True while an episode is in progress.
    pub fn in_episode(&self) -> bool {
        matches!(self.phase, Phase::InEpisode { .. })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.history.algorithm
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn agent(&self) -> &AnyAgent {
        &self.agent
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Consumes the runner, returning the environment, agent and history.
    pub fn into_parts(self) -> (GridWorld, AnyAgent, RunHistory) {
        (self.world, self.agent, self.history)
    }

    fn begin_episode(&mut self) {
        let state = self.world.reset();
        let action = match &mut self.agent {
            AnyAgent::Sarsa(agent) => Some(agent.choose_action(state)),
            AnyAgent::MonteCarlo(agent) => {
                agent.start_episode();
                None
            }
            AnyAgent::QLearning(_) => None,
        };
        self.phase = Phase::InEpisode {
            state,
            action,
            reward: 0.0,
            steps: 0,
            reached: false,
        };
    }

    /// One interaction step in the loop shape of the current algorithm.
    /// Returns `(next_state, next_action, reward, done)`.
    fn advance(
        &mut self,
        state: usize,
        pending: Option<usize>,
    ) -> Result<(usize, Option<usize>, f64, bool), TrainingError> {
        match &mut self.agent {
            AnyAgent::QLearning(agent) => {
                let action = agent.choose_action(state);
                let res = self.world.step_with(action)?;
                agent.update(state, action, res.reward, res.state, res.done);
                Ok((res.state, None, res.reward, res.done))
            }
            AnyAgent::Sarsa(agent) => {
                let action = match pending {
                    Some(action) => action,
                    None => agent.choose_action(state),
                };
                let res = self.world.step_with(action)?;
                let next_action = agent.choose_action(res.state);
                agent.update(state, action, res.reward, res.state, next_action, res.done);
                Ok((res.state, Some(next_action), res.reward, res.done))
            }
            AnyAgent::MonteCarlo(agent) => {
                let action = agent.choose_action(state);
                let res = self.world.step_with(action)?;
                agent.record(state, action, res.reward);
                Ok((res.state, None, res.reward, res.done))
            }
        }
    }

    fn end_episode(&mut self, reward: f64, steps: u32, reached: bool) -> EpisodeReport {
        if let AnyAgent::MonteCarlo(agent) = &mut self.agent {
            agent.finish_episode();
        }

        let record = EpisodeRecord {
            episode: self.history.len() + 1,
            reward,
            steps,
            reached,
        };
        self.history.push(record);

        if self.history.first_converged.is_none()
            && self.config.convergence.is_converged(
                &self.history.rewards(),
                &self.history.reached(),
                &self.history.steps(),
            )
        {
            self.history.first_converged = Some(record.episode);
            info!(
                algorithm = %self.history.algorithm,
                episode = record.episode,
                "Training converged"
            );
        }

        let report = EpisodeReport {
            record,
            converged: self.history.first_converged.is_some(),
        };
        debug!(
            algorithm = %self.history.algorithm,
            episode = record.episode,
            reward = record.reward,
            steps = record.steps,
            reached = record.reached,
            converged = report.converged,
            "Episode finished"
        );

        self.phase = if self.history.len() >= self.config.episodes {
            Phase::Finished
        } else {
            Phase::BetweenEpisodes
        };
        if let Phase::Finished = self.phase {
            self.log_finished();
        }
        report
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.log_finished();
    }

    fn log_finished(&self) {
        info!(
            algorithm = %self.history.algorithm,
            episodes = self.history.len(),
            first_converged = ?self.history.first_converged,
            "Run finished"
        );
    }
}
