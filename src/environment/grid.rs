//! Obstacle mask for an N×N grid.

use super::types::Cell;

/// Square boolean obstacle mask stored row-major.
///
/// The layout is fixed for the duration of an episode; maze edits go through
/// [`GridWorld`](super::GridWorld) between episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    blocked: Vec<bool>,
}

impl Grid {
    /// Creates an empty grid (no obstacles).
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            blocked: vec![false; size * size],
        }
    }

    /// Creates the deterministic preset layout for `size`.
    ///
    /// The 5×5 layout blocks (1,2), (2,2) and (3,1). Every other size uses
    /// (1,3), (2,3), (3,1) and (4,4); cells outside the grid are skipped.
    /// The start (0,0) and goal (size-1,size-1) are always left clear.
    pub fn preset(size: usize) -> Self {
        let mut grid = Self::empty(size);
        let cells: &[(usize, usize)] = if size == 5 {
            &[(1, 2), (2, 2), (3, 1)]
        } else {
            &[(1, 3), (2, 3), (3, 1), (4, 4)]
        };
        for &(row, col) in cells {
            grid.set(Cell::new(row, col), true);
        }
        if size > 0 {
            grid.set(Cell::origin(), false);
            grid.set(Cell::new(size - 1, size - 1), false);
        }
        grid
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the cell lies within the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Returns true if the cell is blocked. Cells outside the grid are not
    /// obstacles.
    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.blocked[i])
    }

    /// Sets the obstacle flag on a cell. Out-of-grid cells are ignored.
    pub fn set(&mut self, cell: Cell, blocked: bool) {
        if let Some(i) = self.index(cell) {
            self.blocked[i] = blocked;
        }
    }

    /// Flips the obstacle flag on a cell and returns the new value.
    pub fn toggle(&mut self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.blocked[i] = !self.blocked[i];
                self.blocked[i]
            }
            None => false,
        }
    }

    /// All blocked cells in row-major order.
    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(move |(i, _)| Cell::new(i / self.size, i % self.size))
    }

    /// Row-major view of the mask, one slice per row.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.blocked.chunks(self.size.max(1))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.size + cell.col)
    }
}
