//! Core value types for the grid environment: actions and cells.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::EnvError;

/// One of the four grid moves.
///
/// Index encoding: `0 = Up`, `1 = Right`, `2 = Down`, `3 = Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// Number of distinct actions.
    pub const COUNT: usize = 4;

    /// All actions in index order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Returns the index of this action.
    pub fn index(&self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }

    /// Row/column displacement applied by this action.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
        }
    }

    /// Uniformly random action.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::COUNT)]
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(EnvError::InvalidActionIndex(index))
    }
}

impl FromStr for Action {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Action::Up),
            "right" => Ok(Action::Right),
            "down" => Ok(Action::Down),
            "left" => Ok(Action::Left),
            _ => Err(EnvError::InvalidAction(s.to_string())),
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = EnvError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Right => write!(f, "right"),
            Action::Down => write!(f, "down"),
            Action::Left => write!(f, "left"),
        }
    }
}

/// A (row, col) grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Origin cell (0, 0).
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Applies `action` and returns the neighbouring cell, or `None` when the
    /// move leaves an `size`×`size` grid.
    pub fn offset(&self, action: Action, size: usize) -> Option<Cell> {
        let (dr, dc) = action.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < size && col < size).then_some(Cell { row, col })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn action_index_round_trip() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::try_from(i).unwrap(), *action);
        }
    }

    #[test]
    fn action_index_out_of_range() {
        assert_eq!(Action::try_from(4), Err(EnvError::InvalidActionIndex(4)));
    }

    #[test]
    fn action_parses_symbols() {
        assert_eq!("up".parse::<Action>().unwrap(), Action::Up);
        assert_eq!("Right".parse::<Action>().unwrap(), Action::Right);
        assert_eq!(" down ".parse::<Action>().unwrap(), Action::Down);
        assert_eq!("LEFT".parse::<Action>().unwrap(), Action::Left);
        assert!(matches!(
            "north".parse::<Action>(),
            Err(EnvError::InvalidAction(_))
        ));
    }

    #[test]
    fn random_action_is_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let a = Action::random(&mut rng);
            assert!(a.index() < Action::COUNT);
        }
    }

    #[test]
    fn offset_stays_inside_grid() {
        let c = Cell::origin();
        assert_eq!(c.offset(Action::Up, 5), None);
        assert_eq!(c.offset(Action::Left, 5), None);
        assert_eq!(c.offset(Action::Right, 5), Some(Cell::new(0, 1)));
        assert_eq!(c.offset(Action::Down, 5), Some(Cell::new(1, 0)));
        assert_eq!(Cell::new(4, 4).offset(Action::Down, 5), None);
        assert_eq!(Cell::new(4, 4).offset(Action::Right, 5), None);
    }

    #[test]
    fn cell_display() {
        assert_eq!(Cell::new(2, 3).to_string(), "(2, 3)");
    }
}
