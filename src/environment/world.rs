//! GridWorld environment.
//!
//! Deterministic dynamics over an N×N grid: the agent moves one cell per step,
//! bumping into walls or obstacles costs a penalty and leaves it in place, and
//! landing on the goal ends the episode with a bonus.

use super::config::GridConfig;
use super::error::EnvError;
use super::grid::Grid;
use super::types::{Action, Cell};

/// Result of a single environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Encoded state after the step (`row * size + col`).
    pub state: usize,
    /// Reward earned by this step.
    pub reward: f64,
    /// Whether the episode is over (goal reached or step cap hit).
    pub done: bool,
}

/// The grid environment.
///
/// # Lifecycle
///
/// 1. Call [`GridWorld::new`] with a configuration.
/// 2. Call [`GridWorld::reset`] (or [`GridWorld::reset_with_size`]) to start
///    an episode.
/// 3. Repeatedly call [`GridWorld::step`] until `done`.
///
/// Stepping after `done` is a no-op that returns zero reward.
///
/// ```
/// use gridlearn::environment::{Action, GridConfig, GridWorld};
///
/// let mut world = GridWorld::new(GridConfig::default());
/// assert_eq!(world.reset(), 0);
/// let res = world.step(Action::Right);
/// assert_eq!(res.state, 1);
/// assert!((res.reward - (-0.1)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: GridConfig,
    grid: Grid,
    start: Cell,
    goal: Cell,
    agent: Cell,
    step_count: u32,
    done: bool,
}

impl GridWorld {
    /// Creates an environment with the preset layout for `config.size`,
    /// already reset.
    pub fn new(config: GridConfig) -> Self {
        let size = config.size;
        let mut world = Self {
            grid: Grid::preset(size),
            start: Cell::origin(),
            goal: Cell::new(size.saturating_sub(1), size.saturating_sub(1)),
            agent: Cell::origin(),
            step_count: 0,
            done: false,
            config,
        };
        world.reset();
        world
    }

    /// Starts a new episode on the current layout and returns the initial
    /// state.
    ///
    /// Clears the step counter and the done flag and puts the agent on the
    /// start cell. The grid is not reallocated.
    pub fn reset(&mut self) -> usize {
        self.agent = self.start;
        self.step_count = 0;
        self.done = false;
        self.state()
    }

    /// Starts a new episode, switching to `size` first.
    ///
    /// When the size changes the preset layout is rebuilt and start/goal move
    /// to the corners; otherwise this is [`GridWorld::reset`].
    pub fn reset_with_size(&mut self, size: usize) -> usize {
        if size != self.config.size {
            self.config.size = size;
            self.restore_preset();
        }
        self.reset()
    }

    /// Discards maze edits and restores the preset layout, start (0,0) and
    /// goal (size-1, size-1). Resets the episode.
    pub fn restore_preset(&mut self) -> usize {
        let size = self.config.size;
        self.grid = Grid::preset(size);
        self.start = Cell::origin();
        self.goal = Cell::new(size.saturating_sub(1), size.saturating_sub(1));
        self.reset()
    }

    /// Applies one move.
    ///
    /// Outcomes, in priority order: leaving the grid or hitting an obstacle
    /// costs `step_cost + obstacle_penalty` and leaves the agent in place;
    /// otherwise the agent moves and pays `step_cost`. Landing on the goal
    /// adds `goal_reward` and ends the episode; reaching `max_steps` also ends
    /// it, without a bonus.
    pub fn step(&mut self, action: Action) -> StepResult {
        if self.done {
            return StepResult {
                state: self.state(),
                reward: 0.0,
                done: true,
            };
        }
        self.step_count += 1;

        let mut reward = self.config.step_cost;
        match self.agent.offset(action, self.config.size) {
            Some(next) if !self.grid.is_obstacle(next) => self.agent = next,
            _ => reward += self.config.obstacle_penalty,
        }

        if self.agent == self.goal {
            reward += self.config.goal_reward;
            self.done = true;
        }
        if self.step_count >= self.config.max_steps {
            self.done = true;
        }

        tracing::trace!(
            %action,
            row = self.agent.row,
            col = self.agent.col,
            reward,
            done = self.done,
            "step"
        );

        StepResult {
            state: self.state(),
            reward,
            done: self.done,
        }
    }

    /// Applies a move given as an index (`0..4`) or a symbol (`"up"`, ...).
    ///
    /// Unrecognized actions fail before any state is touched.
    pub fn step_with<A>(&mut self, action: A) -> Result<StepResult, EnvError>
    where
        A: TryInto<Action, Error = EnvError>,
    {
        Ok(self.step(action.try_into()?))
    }

    /// Current encoded agent state.
    pub fn state(&self) -> usize {
        self.rc_to_state(self.agent)
    }

    /// Decodes a state into its cell.
    pub fn state_to_rc(&self, state: usize) -> Cell {
        let size = self.config.size.max(1);
        Cell::new(state / size, state % size)
    }

    /// Encodes a cell as `row * size + col`.
    pub fn rc_to_state(&self, cell: Cell) -> usize {
        cell.row * self.config.size + cell.col
    }

    /// Returns true if `(row, col)` lies inside the grid.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        self.grid.contains(Cell::new(row, col))
    }

    /// Returns true if `(row, col)` is an obstacle.
    pub fn is_obstacle(&self, row: usize, col: usize) -> bool {
        self.grid.is_obstacle(Cell::new(row, col))
    }

    /// Toggles an obstacle. Start and goal are kept clear.
    pub fn toggle_obstacle(&mut self, row: usize, col: usize) -> Result<bool, EnvError> {
        let cell = self.checked_cell(row, col)?;
        self.grid.toggle(cell);
        self.clear_endpoints();
        Ok(self.grid.is_obstacle(cell))
    }

    /// Moves the start cell and places the agent on it.
    pub fn set_start(&mut self, row: usize, col: usize) -> Result<(), EnvError> {
        let cell = self.checked_cell(row, col)?;
        self.start = cell;
        self.agent = cell;
        self.clear_endpoints();
        Ok(())
    }

    /// Moves the goal cell.
    pub fn set_goal(&mut self, row: usize, col: usize) -> Result<(), EnvError> {
        self.goal = self.checked_cell(row, col)?;
        self.clear_endpoints();
        Ok(())
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn max_steps(&self) -> u32 {
        self.config.max_steps
    }

    /// Number of encoded states.
    pub fn n_states(&self) -> usize {
        self.config.n_states()
    }

    /// Read-only obstacle mask.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Cell currently occupied by the agent.
    pub fn agent(&self) -> Cell {
        self.agent
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns true if the agent stands on the goal.
    pub fn at_goal(&self) -> bool {
        self.agent == self.goal
    }

    fn checked_cell(&self, row: usize, col: usize) -> Result<Cell, EnvError> {
        let cell = Cell::new(row, col);
        if self.grid.contains(cell) {
            Ok(cell)
        } else {
            Err(EnvError::CellOutOfBounds {
                row,
                col,
                size: self.config.size,
            })
        }
    }

    fn clear_endpoints(&mut self) {
        self.grid.set(self.start, false);
        self.grid.set(self.goal, false);
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_world() -> GridWorld {
        GridWorld::new(GridConfig::default())
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn reset_places_agent_at_start() {
        let mut world = make_world();
        world.step(Action::Right);
        assert_eq!(world.reset(), 0);
        assert_eq!(world.agent(), Cell::origin());
        assert_eq!(world.goal(), Cell::new(4, 4));
        assert_eq!(world.step_count(), 0);
        assert!(!world.is_done());
    }

    #[test]
    fn state_encoding_round_trip() {
        let world = make_world();
        for row in 0..5 {
            for col in 0..5 {
                let cell = Cell::new(row, col);
                let s = world.rc_to_state(cell);
                assert_eq!(s, row * 5 + col);
                assert_eq!(world.state_to_rc(s), cell);
            }
        }
    }

    #[test]
    fn wall_bump_keeps_position_and_penalizes() {
        let mut world = make_world();
        let res = world.step(Action::Up);
        assert_eq!(res.state, 0);
        assert_close(res.reward, -1.1);
        assert!(!res.done);
        assert_eq!(world.step_count(), 1);
    }

    #[test]
    fn obstacle_bump_keeps_position_and_penalizes() {
        let mut world = make_world();
        world.step(Action::Right); // (0,1)
        world.step(Action::Right); // (0,2)
        let res = world.step(Action::Down); // (1,2) is blocked
        assert_eq!(world.agent(), Cell::new(0, 2));
        assert_eq!(res.state, 2);
        assert_close(res.reward, -1.1);
    }

    #[test]
    fn reaching_goal_pays_bonus_and_ends_episode() {
        let mut world = make_world();
        let path = [
            Action::Right,
            Action::Right,
            Action::Right,
            Action::Right,
            Action::Down,
            Action::Down,
            Action::Down,
        ];
        for a in path {
            let res = world.step(a);
            assert!(!res.done);
            assert_close(res.reward, -0.1);
        }
        let res = world.step(Action::Down);
        assert!(res.done);
        assert_eq!(res.state, 24);
        assert_close(res.reward, 9.9);
        assert!(world.at_goal());
    }

    #[test]
    fn step_cap_ends_episode_without_bonus() {
        let mut world = GridWorld::new(GridConfig {
            max_steps: 3,
            ..GridConfig::default()
        });
        assert!(!world.step(Action::Right).done);
        assert!(!world.step(Action::Left).done);
        let res = world.step(Action::Right);
        assert!(res.done);
        assert_close(res.reward, -0.1);
        assert!(!world.at_goal());
    }

    #[test]
    fn stepping_after_done_is_idempotent() {
        let mut world = GridWorld::new(GridConfig {
            max_steps: 1,
            ..GridConfig::default()
        });
        let last = world.step(Action::Right);
        assert!(last.done);
        for a in Action::ALL {
            let res = world.step(a);
            assert_eq!(res.state, last.state);
            assert_eq!(res.reward, 0.0);
            assert!(res.done);
        }
        assert_eq!(world.step_count(), 1);
    }

    #[test]
    fn position_always_valid_under_random_walk() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(11);
        for size in [2, 3, 5, 7] {
            let mut world = GridWorld::new(GridConfig {
                size,
                max_steps: 500,
                ..GridConfig::default()
            });
            for _ in 0..500 {
                world.step(Action::random(&mut rng));
                let cell = world.agent();
                assert!(cell.row < size && cell.col < size);
                assert!(!world.grid().is_obstacle(cell));
            }
        }
    }

    #[test]
    fn step_with_accepts_indices_and_symbols() {
        let mut world = make_world();
        assert_eq!(world.step_with(1usize).unwrap().state, 1);
        assert_eq!(world.step_with("down").unwrap().state, 6);
    }

    #[test]
    fn step_with_rejects_unknown_actions_without_side_effects() {
        let mut world = make_world();
        assert_eq!(
            world.step_with(9usize),
            Err(EnvError::InvalidActionIndex(9))
        );
        assert!(matches!(
            world.step_with("jump"),
            Err(EnvError::InvalidAction(_))
        ));
        assert_eq!(world.step_count(), 0);
        assert_eq!(world.state(), 0);
    }

    #[test]
    fn custom_rewards_are_honoured() {
        let mut world = GridWorld::new(GridConfig {
            size: 2,
            step_cost: -1.0,
            goal_reward: 5.0,
            obstacle_penalty: -3.0,
            ..GridConfig::default()
        });
        assert_close(world.step(Action::Up).reward, -4.0);
        world.step(Action::Right);
        let res = world.step(Action::Down);
        assert!(res.done);
        assert_close(res.reward, 4.0);
    }

    #[test]
    fn reset_with_size_rebuilds_layout() {
        let mut world = make_world();
        let s = world.reset_with_size(7);
        assert_eq!(s, 0);
        assert_eq!(world.size(), 7);
        assert_eq!(world.n_states(), 49);
        assert_eq!(world.goal(), Cell::new(6, 6));
        assert!(world.is_obstacle(4, 4));
        assert!(!world.is_obstacle(1, 2));
    }

    #[test]
    fn maze_edits_survive_same_size_reset() {
        let mut world = make_world();
        assert!(world.toggle_obstacle(0, 1).unwrap());
        world.reset_with_size(5);
        assert!(world.is_obstacle(0, 1));
        world.restore_preset();
        assert!(!world.is_obstacle(0, 1));
    }

    #[test]
    fn start_and_goal_are_kept_clear() {
        let mut world = make_world();
        assert!(!world.toggle_obstacle(0, 0).unwrap());
        assert!(!world.toggle_obstacle(4, 4).unwrap());

        world.set_goal(1, 2).unwrap();
        assert!(!world.is_obstacle(1, 2));

        world.set_start(2, 2).unwrap();
        assert!(!world.is_obstacle(2, 2));
        assert_eq!(world.agent(), Cell::new(2, 2));
        assert_eq!(world.reset(), 12);
    }

    #[test]
    fn edits_outside_grid_are_rejected() {
        let mut world = make_world();
        assert_eq!(
            world.toggle_obstacle(5, 0),
            Err(EnvError::CellOutOfBounds {
                row: 5,
                col: 0,
                size: 5
            })
        );
        assert!(world.set_start(0, 9).is_err());
        assert!(world.set_goal(9, 9).is_err());
    }
}
