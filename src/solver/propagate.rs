//! Deterministic inference
//!
//! Two rules fill cells without guessing:
//!
//! - *hidden single*: a missing value that can legally go in only one empty
//!   cell of some unit must go there;
//! - *naked single*: an empty cell with exactly one candidate must hold it.
//!
//! [`run`] applies both rules to a fixpoint, mutating the grid. The `scan_*`
//! functions are the dry-run counterparts: a single pass that reports what
//! the corresponding rule could fill right now without touching the grid.
//! The difficulty rater is built on these.

use crate::board::{Coord, Grid, ValueSet};
use crate::errors::Unsolvable;

/// Applies hidden-single and naked-single inference to a fixpoint.
///
/// Every assignment is appended to `log` in discovery order as it is made,
/// so on `Err(Unsolvable)` the log still names everything that has to be
/// rolled back.
pub(crate) fn run(grid: &mut Grid, log: &mut Vec<(Coord, u8)>) -> Result<(), Unsolvable> {
    loop {
        let before = log.len();
        fill_hidden_singles(grid, log)?;
        fill_naked_singles(grid, log)?;
        if log.len() == before {
            return Ok(());
        }
    }
}

/// One pass over all units, assigning every hidden single.
///
/// A missing value with no possible home proves the state dead. So does a
/// conflict while placing a forced value: it had exactly one home and that
/// home just became illegal.
fn fill_hidden_singles(grid: &mut Grid, log: &mut Vec<(Coord, u8)>) -> Result<(), Unsolvable> {
    let size = grid.size();
    for unit in grid.units() {
        let missing = grid.full_set().without(grid.unit_values(unit));
        if missing.is_empty() {
            continue;
        }
        let (homes, multiple) = sole_homes(grid, unit, missing, size);
        for value in missing.iter() {
            if multiple.contains(value) {
                continue;
            }
            match homes[usize::from(value)] {
                None => return Err(Unsolvable),
                Some(coord) => match grid.assign(coord, value) {
                    Ok(()) => log.push((coord, value)),
                    Err(_) => return Err(Unsolvable),
                },
            }
        }
    }
    Ok(())
}

/// One pass over all cells, assigning every naked single.
///
/// An empty cell with no candidate at all proves the state dead.
fn fill_naked_singles(grid: &mut Grid, log: &mut Vec<(Coord, u8)>) -> Result<(), Unsolvable> {
    for coord in grid.dims().cells() {
        if grid.get(coord).is_some() {
            continue;
        }
        let candidates = grid.candidates(coord);
        match candidates.unique() {
            Some(value) => {
                grid.assign(coord, value)
                    .expect("sole candidate of an empty cell is legal");
                log.push((coord, value));
            }
            None if candidates.is_empty() => return Err(Unsolvable),
            None => {}
        }
    }
    Ok(())
}

/// Dry run of the hidden-single rule: a single pass over all units against
/// the unmodified grid, reporting each (cell, value) it would fill.
///
/// A dead unit ends the scan early; the proposals found up to that point
/// are still returned. Duplicates occur when several units force the same
/// cell.
pub(crate) fn scan_hidden_singles(grid: &Grid) -> Vec<(Coord, u8)> {
    let size = grid.size();
    let mut found = Vec::new();
    for unit in grid.units() {
        let missing = grid.full_set().without(grid.unit_values(unit));
        if missing.is_empty() {
            continue;
        }
        let (homes, multiple) = sole_homes(grid, unit, missing, size);
        for value in missing.iter() {
            if multiple.contains(value) {
                continue;
            }
            match homes[usize::from(value)] {
                None => return found,
                Some(coord) => found.push((coord, value)),
            }
        }
    }
    found
}

/// Dry run of the naked-single rule: reports every empty cell with exactly
/// one candidate. Dead cells are ignored here; the searcher deals with them.
pub(crate) fn scan_naked_singles(grid: &Grid) -> Vec<(Coord, u8)> {
    grid.empty_cells()
        .filter_map(|coord| grid.candidates(coord).unique().map(|value| (coord, value)))
        .collect()
}

// For each missing value of the unit, the first empty cell that can take it,
// plus the set of values with more than one possible home.
fn sole_homes(
    grid: &Grid,
    unit: crate::board::Unit,
    missing: ValueSet,
    size: u8,
) -> (Vec<Option<Coord>>, ValueSet) {
    let mut homes: Vec<Option<Coord>> = vec![None; usize::from(size) + 1];
    let mut seen = ValueSet::NONE;
    let mut multiple = ValueSet::NONE;
    for coord in grid.unit_cells(unit) {
        if grid.get(coord).is_some() {
            continue;
        }
        let possible = grid.candidates(coord) & missing;
        multiple |= seen & possible;
        seen |= possible;
        for value in possible.iter() {
            if homes[usize::from(value)].is_none() {
                homes[usize::from(value)] = Some(coord);
            }
        }
    }
    (homes, multiple)
}
