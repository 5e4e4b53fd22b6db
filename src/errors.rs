use crate::board::Coord;

#[cfg(doc)]
use crate::board::Grid;

/// Error for [`Grid::assign`] and [`Grid::unassign`]
///
/// Conflicts are recoverable: the solver catches them and moves on to the
/// next candidate. Each conflict carries the coordinate and value of the
/// attempted assignment together with the cell that already holds the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The value is already present in the cell's row.
    #[error("value {value} at {coord} already occurs in the same row at {conflict}")]
    RowConflict {
        /// Coordinate of the attempted assignment
        coord: Coord,
        /// The value that could not be placed
        value: u8,
        /// The cell that already holds `value`
        conflict: Coord,
    },
    /// The value is already present in the cell's column.
    #[error("value {value} at {coord} already occurs in the same column at {conflict}")]
    ColumnConflict {
        /// Coordinate of the attempted assignment
        coord: Coord,
        /// The value that could not be placed
        value: u8,
        /// The cell that already holds `value`
        conflict: Coord,
    },
    /// The value is already present in the cell's box.
    #[error("value {value} at {coord} already occurs in the same box at {conflict}")]
    BoxConflict {
        /// Coordinate of the attempted assignment
        coord: Coord,
        /// The value that could not be placed
        value: u8,
        /// The cell that already holds `value`
        conflict: Coord,
    },
    /// Assignment onto a cell that already holds a value.
    #[error("cell {coord} is already set")]
    AlreadySet {
        /// Coordinate of the attempted assignment
        coord: Coord,
    },
    /// Unassignment of a cell that holds no value.
    #[error("cell {coord} is already empty")]
    AlreadyEmpty {
        /// Coordinate of the attempted unassignment
        coord: Coord,
    },
}

impl GridError {
    /// The coordinate the failing operation was aimed at.
    pub fn coord(&self) -> Coord {
        match *self {
            GridError::RowConflict { coord, .. }
            | GridError::ColumnConflict { coord, .. }
            | GridError::BoxConflict { coord, .. }
            | GridError::AlreadySet { coord }
            | GridError::AlreadyEmpty { coord } => coord,
        }
    }
}

/// No completion of the grid exists from the current state.
///
/// Both the propagator detecting a value with no remaining home and the
/// searcher exhausting every candidate at the root report this. It is a
/// regular outcome, not a bug: the generator treats it as "discard this
/// candidate puzzle".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sudoku is unsolvable from the given state")]
pub struct Unsolvable;

/// The generator ran out of attempts before finding an acceptable puzzle.
///
/// Distinct from [`Unsolvable`]: nothing is wrong with any individual
/// candidate, the requested constraints just were not met within the
/// configured budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no acceptable puzzle found within {tries} attempts")]
pub struct TriesExhausted {
    /// The number of attempts that were made.
    pub tries: u32,
}

/// Error for [`Grid::from_values`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FromValuesError {
    /// The slice does not contain exactly `size * size` cells.
    #[error("expected {expected} cells, found {found}")]
    WrongLength {
        /// `size * size` for the given dimensions
        expected: usize,
        /// Length of the supplied slice
        found: usize,
    },
    /// A cell value lies outside `1..=size` (0 marks an empty cell).
    #[error("cell value {value} out of range 1..={size}")]
    OutOfRange {
        /// The offending value
        value: u8,
        /// The board size
        size: u8,
    },
    /// Two givens violate a row, column or box constraint.
    #[error(transparent)]
    Conflict(#[from] GridError),
}

/// Error for [`Grid::from_str_grid`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseGridError {
    /// A whitespace-separated token is not a cell value.
    #[error("token {token:?} at position {index} is not a cell value")]
    InvalidToken {
        /// The unparsable token
        token: String,
        /// Zero-based position of the token in the input
        index: usize,
    },
    /// The parsed cells do not form a valid board.
    #[error(transparent)]
    Values(#[from] FromValuesError),
}
