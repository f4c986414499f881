//! Growable state-action value table.

/// Dense Q-table indexed by integer state.
///
/// Every row holds exactly `actions` values, zero-initialized. The declared
/// state count is only a starting capacity: touching a state beyond the
/// current bounds appends zero rows up to and including it, so maze edits and
/// resized grids never index out of range.
///
/// ```
/// use gridlearn::agents::QTable;
///
/// let mut q = QTable::new(4, 2);
/// q.set(9, 1, 0.5);
/// assert_eq!(q.n_states(), 10);
/// assert_eq!(q.get(9, 1), 0.5);
/// assert_eq!(q.get(42, 0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QTable {
    actions: usize,
    rows: Vec<Vec<f64>>,
}

impl QTable {
    /// Creates a zero table with `states` rows of `actions` values.
    pub fn new(states: usize, actions: usize) -> Self {
        Self {
            actions,
            rows: vec![vec![0.0; actions]; states],
        }
    }

    /// Grows the table so that `state` is a valid row.
    pub fn ensure_state(&mut self, state: usize) {
        if state >= self.rows.len() {
            self.rows.resize(state + 1, vec![0.0; self.actions]);
        }
    }

    /// Number of rows currently allocated.
    pub fn n_states(&self) -> usize {
        self.rows.len()
    }

    /// Number of actions per row.
    pub fn n_actions(&self) -> usize {
        self.actions
    }

    /// Value of `(state, action)`; unallocated states read as zero.
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sets `(state, action)`, growing the table if needed.
    ///
    /// # Panics
    ///
    /// Panics if `action >= n_actions()`.
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        self.row_mut(state)[action] = value;
    }

    /// Row for `state`, or `None` if it was never allocated.
    pub fn row(&self, state: usize) -> Option<&[f64]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Mutable row for `state`, growing the table if needed.
    pub fn row_mut(&mut self, state: usize) -> &mut [f64] {
        self.ensure_state(state);
        &mut self.rows[state]
    }

    /// Largest action value in `state` (zero for unallocated states).
    pub fn max_value(&self, state: usize) -> f64 {
        match self.row(state) {
            Some(row) if !row.is_empty() => row.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            _ => 0.0,
        }
    }

    /// All actions whose value equals the row maximum.
    pub fn greedy_actions(&self, state: usize) -> Vec<usize> {
        let Some(row) = self.row(state) else {
            return (0..self.actions).collect();
        };
        let mut best = Vec::with_capacity(self.actions);
        let mut max = f64::NEG_INFINITY;
        for (a, &q) in row.iter().enumerate() {
            if q > max {
                max = q;
                best.clear();
                best.push(a);
            } else if q == max {
                best.push(a);
            }
        }
        best
    }

    /// Per-state maximum value, for value heatmaps.
    pub fn state_values(&self) -> Vec<f64> {
        (0..self.rows.len()).map(|s| self.max_value(s)).collect()
    }

    /// Per-state greedy action (lowest index on ties), for policy arrows.
    pub fn greedy_policy(&self) -> Vec<usize> {
        (0..self.rows.len())
            .map(|s| self.greedy_actions(s).first().copied().unwrap_or(0))
            .collect()
    }

    /// Ordered view of all rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Re-zeroes the table with new dimensions.
    pub fn reinit(&mut self, states: usize, actions: usize) {
        *self = Self::new(states, actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_zeroed() {
        let q = QTable::new(25, 4);
        assert_eq!(q.n_states(), 25);
        assert_eq!(q.n_actions(), 4);
        assert!(q.rows().iter().all(|r| r.len() == 4 && r.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn ensure_state_grows_with_zero_rows() {
        let mut q = QTable::new(2, 3);
        q.ensure_state(5);
        assert_eq!(q.n_states(), 6);
        assert_eq!(q.row(5), Some(&[0.0, 0.0, 0.0][..]));
        // Never shrinks.
        q.ensure_state(1);
        assert_eq!(q.n_states(), 6);
    }

    #[test]
    fn reads_beyond_bounds_are_zero_without_growth() {
        let q = QTable::new(1, 4);
        assert_eq!(q.get(10, 2), 0.0);
        assert_eq!(q.max_value(10), 0.0);
        assert_eq!(q.n_states(), 1);
    }

    #[test]
    fn greedy_actions_returns_all_ties() {
        let mut q = QTable::new(1, 4);
        assert_eq!(q.greedy_actions(0), vec![0, 1, 2, 3]);
        q.set(0, 2, 1.0);
        q.set(0, 3, 1.0);
        assert_eq!(q.greedy_actions(0), vec![2, 3]);
    }

    #[test]
    fn policy_and_values_overlays() {
        let mut q = QTable::new(3, 4);
        q.set(0, 1, 2.0);
        q.set(1, 3, -1.0);
        q.set(2, 2, 0.5);
        assert_eq!(q.greedy_policy(), vec![1, 0, 2]);
        assert_eq!(q.state_values(), vec![2.0, 0.0, 0.5]);
    }

    #[test]
    fn reinit_resets_dimensions() {
        let mut q = QTable::new(3, 4);
        q.set(2, 1, 1.0);
        q.reinit(9, 2);
        assert_eq!(q.n_states(), 9);
        assert_eq!(q.n_actions(), 2);
        assert_eq!(q.get(2, 1), 0.0);
    }
}
