use std::fmt;

use crate::board::{Coord, Dimensions, ValueSet};
use crate::errors::{FromValuesError, GridError, ParseGridError, Unsolvable};
use crate::rating::{DifficultyRating, Rater};
use crate::solver::{Searcher, Solutions};

use rand::seq::SliceRandom;
use rand::Rng;

/// A row, column or box; the index runs `0..size` within each kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Unit {
    Row(u8),
    Column(u8),
    Box(u8),
}

/// The main structure exposing all the functionality of the library
///
/// A `Grid` holds the cell values of a partially filled board together with
/// one value set per row, column and box mirroring the cells. The mirrors
/// make constraint checks O(1); a value is in a mirror exactly when some
/// cell of that unit holds it. All mutation goes through
/// [`assign`](Grid::assign) and [`unassign`](Grid::unassign), which keep
/// the mirrors consistent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dims: Dimensions,
    // 0 marks an empty cell, row-major
    cells: Vec<u8>,
    row_values: Vec<ValueSet>,
    col_values: Vec<ValueSet>,
    box_values: Vec<ValueSet>,
}

impl Grid {
    /// Creates an empty board of the given dimensions.
    pub fn empty(dims: Dimensions) -> Grid {
        let size = usize::from(dims.size());
        Grid {
            dims,
            cells: vec![0; dims.n_cells()],
            row_values: vec![ValueSet::NONE; size],
            col_values: vec![ValueSet::NONE; size],
            box_values: vec![ValueSet::NONE; size],
        }
    }

    /// Creates a board from a flat row-major slice of cell values, `0`
    /// marking empty cells.
    ///
    /// Every given is validated against the row, column and box constraints;
    /// the first violation is reported with its coordinates.
    pub fn from_values(dims: Dimensions, values: &[u8]) -> Result<Grid, FromValuesError> {
        if values.len() != dims.n_cells() {
            return Err(FromValuesError::WrongLength {
                expected: dims.n_cells(),
                found: values.len(),
            });
        }
        let mut grid = Grid::empty(dims);
        for (coord, &value) in dims.cells().zip(values) {
            if value == 0 {
                continue;
            }
            if value > dims.size() {
                return Err(FromValuesError::OutOfRange { value, size: dims.size() });
            }
            grid.assign(coord, value)?;
        }
        Ok(grid)
    }

    /// Parses a board from whitespace-separated cell values.
    ///
    /// Cells are listed row-major; `0` or `_` marks an empty cell. The
    /// format matches [`to_str_grid`](Grid::to_str_grid).
    pub fn from_str_grid(dims: Dimensions, s: &str) -> Result<Grid, ParseGridError> {
        let mut values = Vec::with_capacity(dims.n_cells());
        for (index, token) in s.split_whitespace().enumerate() {
            let value = if token == "_" {
                0
            } else {
                token.parse::<u8>().map_err(|_| ParseGridError::InvalidToken {
                    token: token.to_string(),
                    index,
                })?
            };
            values.push(value);
        }
        Ok(Grid::from_values(dims, &values)?)
    }

    /// Writes the board as whitespace-separated cell values, one row per
    /// line, `0` for empty cells.
    pub fn to_str_grid(&self) -> String {
        let size = usize::from(self.size());
        let mut s = String::new();
        for (i, &cell) in self.cells.iter().enumerate() {
            if i > 0 {
                s.push(if i % size == 0 { '\n' } else { ' ' });
            }
            s.push_str(&cell.to_string());
        }
        s
    }

    /// Generates a random completely filled board.
    ///
    /// The first row is seeded with a random permutation of `1..=size` and
    /// the rest is filled by the solver, so the same `rng` state yields the
    /// same board.
    pub fn random_filled<R: Rng>(dims: Dimensions, rng: &mut R) -> Grid {
        let mut first_row: Vec<u8> = (1..=dims.size()).collect();
        loop {
            first_row.shuffle(rng);
            let mut grid = Grid::empty(dims);
            for (x, &value) in (0..).zip(&first_row) {
                grid.assign(Coord::new(x, 0), value)
                    .expect("a permutation row cannot conflict");
            }
            if let Ok(filled) = grid.solve() {
                return filled;
            }
        }
    }

    /// The box dimensions of this board.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Side length of the board and largest cell value.
    pub fn size(&self) -> u8 {
        self.dims.size()
    }

    /// Returns the value of the cell, or `None` if it is empty.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the board.
    pub fn get(&self, coord: Coord) -> Option<u8> {
        match self.cells[self.index(coord)] {
            0 => None,
            value => Some(value),
        }
    }

    /// Assigns `value` to the cell.
    ///
    /// Fails with [`GridError::AlreadySet`] if the cell is occupied and with
    /// one of the conflict errors if the value already occurs in the cell's
    /// row, column or box. On failure the grid is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the board or `value` is not in
    /// `1..=size`.
    pub fn assign(&mut self, coord: Coord, value: u8) -> Result<(), GridError> {
        assert!(value >= 1 && value <= self.size());
        let index = self.index(coord);
        if self.cells[index] != 0 {
            return Err(GridError::AlreadySet { coord });
        }
        if self.row_values[usize::from(coord.y)].contains(value) {
            let conflict = self.find_in_unit(Unit::Row(coord.y), value);
            return Err(GridError::RowConflict { coord, value, conflict });
        }
        if self.col_values[usize::from(coord.x)].contains(value) {
            let conflict = self.find_in_unit(Unit::Column(coord.x), value);
            return Err(GridError::ColumnConflict { coord, value, conflict });
        }
        let b = self.dims.box_of(coord);
        if self.box_values[usize::from(b)].contains(value) {
            let conflict = self.find_in_unit(Unit::Box(b), value);
            return Err(GridError::BoxConflict { coord, value, conflict });
        }
        self.cells[index] = value;
        self.row_values[usize::from(coord.y)].insert(value);
        self.col_values[usize::from(coord.x)].insert(value);
        self.box_values[usize::from(b)].insert(value);
        Ok(())
    }

    /// Assigns `value` to the cell, unassigning first if it is occupied.
    ///
    /// Conflict errors are reported like [`assign`](Grid::assign); if the
    /// new value conflicts, the cell is left empty.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the board or `value` is not in
    /// `1..=size`.
    pub fn force_assign(&mut self, coord: Coord, value: u8) -> Result<(), GridError> {
        if self.get(coord).is_some() {
            let _ = self.unassign(coord);
        }
        self.assign(coord, value)
    }

    /// Clears the cell, returning the value it held.
    ///
    /// Fails with [`GridError::AlreadyEmpty`] if the cell holds no value.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the board.
    pub fn unassign(&mut self, coord: Coord) -> Result<u8, GridError> {
        let index = self.index(coord);
        let value = self.cells[index];
        if value == 0 {
            return Err(GridError::AlreadyEmpty { coord });
        }
        self.cells[index] = 0;
        self.row_values[usize::from(coord.y)].remove(value);
        self.col_values[usize::from(coord.x)].remove(value);
        self.box_values[usize::from(self.dims.box_of(coord))].remove(value);
        Ok(value)
    }

    /// The set of values the cell could legally hold given the current
    /// state: all values absent from its row, column and box.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the board.
    pub fn candidates(&self, coord: Coord) -> ValueSet {
        let taken = self.row_values[usize::from(coord.y)]
            | self.col_values[usize::from(coord.x)]
            | self.box_values[usize::from(self.dims.box_of(coord))];
        self.full_set().without(taken)
    }

    /// Returns whether every cell is filled.
    ///
    /// Grids can only be mutated through [`assign`](Grid::assign), so a full
    /// board is necessarily a valid solution.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&cell| cell != 0)
    }

    /// Returns an iterator over all cells, going from left to right, top to
    /// bottom.
    pub fn iter(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.cells.iter().map(|&cell| if cell == 0 { None } else { Some(cell) })
    }

    /// Returns the board as rows of cells, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Option<u8>>> {
        let size = usize::from(self.size());
        (0..size)
            .map(|y| (0..size).map(|x| self.get(Coord::new(x as u8, y as u8))).collect())
            .collect()
    }

    /// The coordinates of all empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.dims.cells().filter(move |&coord| self.get(coord).is_none())
    }

    /// The coordinates of all filled cells in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.dims.cells().filter(move |&coord| self.get(coord).is_some())
    }

    /// Try to find a solution to the puzzle.
    ///
    /// If multiple solutions exist, the same one is returned every time:
    /// the search is fully deterministic.
    pub fn solve(&self) -> Result<Grid, Unsolvable> {
        let mut searcher = Searcher::new(self.clone());
        searcher.search()?;
        Ok(searcher.into_grid())
    }

    /// Returns a lazy iterator over the distinct solutions of the puzzle.
    pub fn solutions(&self) -> Solutions {
        Solutions::new(Searcher::new(self.clone()))
    }

    /// Returns whether the puzzle has exactly one solution.
    pub fn has_unique_solution(&self) -> bool {
        self.solutions().take(2).count() == 1
    }

    /// Solves the puzzle while recording how much of it yields to pure
    /// inference, and rates its difficulty.
    pub fn difficulty(&self) -> Result<DifficultyRating, Unsolvable> {
        Rater::new(self).difficulty()
    }

    pub(crate) fn full_set(&self) -> ValueSet {
        ValueSet::full(self.size())
    }

    pub(crate) fn units(&self) -> impl Iterator<Item = Unit> {
        let size = self.size();
        (0..size)
            .map(Unit::Row)
            .chain((0..size).map(Unit::Column))
            .chain((0..size).map(Unit::Box))
    }

    pub(crate) fn unit_cells(&self, unit: Unit) -> impl Iterator<Item = Coord> {
        let dims = self.dims;
        match unit {
            Unit::Row(y) => Box::new(dims.row_cells(y)) as Box<dyn Iterator<Item = Coord>>,
            Unit::Column(x) => Box::new(dims.col_cells(x)),
            Unit::Box(b) => Box::new(dims.box_cells(b)),
        }
    }

    pub(crate) fn unit_values(&self, unit: Unit) -> ValueSet {
        match unit {
            Unit::Row(y) => self.row_values[usize::from(y)],
            Unit::Column(x) => self.col_values[usize::from(x)],
            Unit::Box(b) => self.box_values[usize::from(b)],
        }
    }

    fn index(&self, coord: Coord) -> usize {
        assert!(coord.x < self.size() && coord.y < self.size());
        self.dims.index(coord)
    }

    // only called on the cold conflict path
    fn find_in_unit(&self, unit: Unit, value: u8) -> Coord {
        self.unit_cells(unit)
            .find(|&coord| self.get(coord) == Some(value))
            .expect("mirror sets track cell contents")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_width = self.size().to_string().len();
        let boxes_per_band = usize::from(self.dims.box_height());
        let segment = "-".repeat((cell_width + 1) * usize::from(self.dims.box_width()) + 1);
        let border = {
            let mut line = String::from("+");
            for _ in 0..boxes_per_band {
                line.push_str(&segment);
                line.push('+');
            }
            line
        };
        for y in 0..self.size() {
            if y % self.dims.box_height() == 0 {
                writeln!(f, "{}", border)?;
            }
            for x in 0..self.size() {
                if x % self.dims.box_width() == 0 {
                    write!(f, "| ")?;
                }
                match self.get(Coord::new(x, y)) {
                    Some(value) => write!(f, "{:>width$} ", value, width = cell_width)?,
                    None => write!(f, "{:>width$} ", "_", width = cell_width)?,
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "{}", border)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::Grid;
    use crate::board::Dimensions;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct GridRepr {
        box_width: u8,
        box_height: u8,
        cells: Vec<u8>,
    }

    impl Serialize for Grid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            GridRepr {
                box_width: self.dims().box_width(),
                box_height: self.dims().box_height(),
                cells: self.iter().map(|cell| cell.unwrap_or(0)).collect(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Grid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Grid, D::Error> {
            let repr = GridRepr::deserialize(deserializer)?;
            let dims = Dimensions::new_checked(repr.box_width, repr.box_height)
                .ok_or_else(|| D::Error::custom("invalid box dimensions"))?;
            Grid::from_values(dims, &repr.cells).map_err(D::Error::custom)
        }
    }
}
