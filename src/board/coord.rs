use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cell position: `x` is the column, `y` the row, both starting at 0
/// in the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Constructs a new coordinate.
    pub fn new(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }
}

// Row-major order: cells compare by row first, then by column. Tie-breaking
// in the searcher's cell selection relies on this.
impl Ord for Coord {
    fn cmp(&self, other: &Coord) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Coord) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
