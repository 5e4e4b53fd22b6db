//! Types for representing board state.

mod coord;
mod dims;
mod grid;
mod set;

pub use self::coord::Coord;
pub use self::dims::Dimensions;
pub use self::grid::Grid;
pub use self::set::{ValueSet, Values};

pub(crate) use self::grid::Unit;
