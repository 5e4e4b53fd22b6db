use crate::board::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Box dimensions of a board.
///
/// A board consists of `box_height` bands of `box_width` columns of boxes;
/// `size = box_width * box_height` is simultaneously the side length of the
/// board, the number of cells per unit and the largest cell value. The
/// classic 9×9 sudoku is `Dimensions::new(3, 3)`; `Dimensions::new(3, 4)`
/// describes a 12×12 board with 3-wide, 4-tall boxes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    box_width: u8,
    box_height: u8,
}

impl Dimensions {
    /// Constructs new dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either side is 0, the board would be 1×1 or
    /// `box_width * box_height > 64`.
    pub fn new(box_width: u8, box_height: u8) -> Dimensions {
        Dimensions::new_checked(box_width, box_height).unwrap()
    }

    /// Constructs new dimensions. Returns `None` if either side is 0, the
    /// board would be 1×1 or `box_width * box_height > 64`.
    pub fn new_checked(box_width: u8, box_height: u8) -> Option<Dimensions> {
        let size = u16::from(box_width) * u16::from(box_height);
        if box_width == 0 || box_height == 0 || size < 2 || size > 64 {
            return None;
        }
        Some(Dimensions { box_width, box_height })
    }

    /// Width of a box, i.e. the number of box columns per band.
    pub fn box_width(self) -> u8 {
        self.box_width
    }

    /// Height of a box.
    pub fn box_height(self) -> u8 {
        self.box_height
    }

    /// Side length of the board and largest cell value.
    pub fn size(self) -> u8 {
        self.box_width * self.box_height
    }

    /// Total number of cells on the board.
    pub fn n_cells(self) -> usize {
        usize::from(self.size()) * usize::from(self.size())
    }

    /// Row-major cell index of a coordinate.
    pub(crate) fn index(self, coord: Coord) -> usize {
        usize::from(coord.y) * usize::from(self.size()) + usize::from(coord.x)
    }

    /// Index of the box containing a coordinate.
    ///
    /// Boxes are numbered row-major: `box_height` of them per band,
    /// `box_width` bands.
    pub(crate) fn box_of(self, coord: Coord) -> u8 {
        (coord.y / self.box_height) * self.box_height + coord.x / self.box_width
    }

    /// All coordinates in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Coord> {
        let size = self.size();
        (0..size).flat_map(move |y| (0..size).map(move |x| Coord::new(x, y)))
    }

    /// The cells of row `y`, left to right.
    pub(crate) fn row_cells(self, y: u8) -> impl Iterator<Item = Coord> {
        (0..self.size()).map(move |x| Coord::new(x, y))
    }

    /// The cells of column `x`, top to bottom.
    pub(crate) fn col_cells(self, x: u8) -> impl Iterator<Item = Coord> {
        (0..self.size()).map(move |y| Coord::new(x, y))
    }

    /// The cells of box `b`, row-major within the box.
    pub(crate) fn box_cells(self, b: u8) -> impl Iterator<Item = Coord> {
        let x0 = b % self.box_height * self.box_width;
        let y0 = b / self.box_height * self.box_height;
        (0..self.box_height)
            .flat_map(move |dy| (0..self.box_width).map(move |dx| Coord::new(x0 + dx, y0 + dy)))
    }
}
