//! Backtracking search
//!
//! The searcher alternates between three activities: propagating (running
//! inference to a local fixpoint), guessing (committing a trial value in the
//! most constrained cell) and backtracking (rolling the most recent guess
//! back). It terminates when the grid is complete or when the breadcrumb
//! trail is empty and no candidate remains.

use crate::board::{Coord, Grid};
use crate::errors::Unsolvable;
use crate::rating::TierRecorder;
use crate::solver::guess::{GuessArena, NodeId};
use crate::solver::propagate;

pub(crate) struct Searcher {
    grid: Grid,
    arena: GuessArena,
    /// The path of active guesses from the search root to the frontier.
    /// At most one active guess per coordinate.
    breadcrumbs: Vec<NodeId>,
    backtracks: u32,
    solved: bool,
    recorder: Option<TierRecorder>,
}

impl Searcher {
    pub fn new(grid: Grid) -> Searcher {
        Searcher {
            grid,
            arena: GuessArena::new(),
            breadcrumbs: Vec::new(),
            backtracks: 0,
            solved: false,
            recorder: None,
        }
    }

    /// A searcher that measures, at every depth it propagates at, what pure
    /// inference could fill. Used for difficulty rating.
    pub fn with_recorder(grid: Grid) -> Searcher {
        let mut searcher = Searcher::new(grid);
        searcher.recorder = Some(TierRecorder::new());
        searcher
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn backtracks(&self) -> u32 {
        self.backtracks
    }

    /// Number of guesses that still count for difficulty: committed guesses
    /// minus subtrees discarded by rolling back their parents.
    pub fn live_guesses(&self) -> u32 {
        self.arena.live_count()
    }

    pub fn take_recorder(&mut self) -> Option<TierRecorder> {
        self.recorder.take()
    }

    /// Runs the search until the grid is complete.
    ///
    /// Resumable: after a solution, force one backtrack with
    /// [`force_backtrack`](Searcher::force_backtrack) and call this again to
    /// look for a different solution.
    pub fn search(&mut self) -> Result<(), Unsolvable> {
        loop {
            self.observe();
            match self.propagate() {
                Ok(()) => {
                    if self.grid.is_complete() {
                        self.solved = true;
                        return Ok(());
                    }
                    match self.next_guess() {
                        Some((coord, value)) => self.commit_guess(coord, value),
                        None => {
                            if !self.backtrack() {
                                return Err(Unsolvable);
                            }
                        }
                    }
                }
                Err(Unsolvable) => {
                    if !self.backtrack() {
                        return Err(Unsolvable);
                    }
                }
            }
        }
    }

    /// Rolls back the most recent guess without counting it as search work.
    /// Returns `false` if there is no guess to undo, i.e. the last solution
    /// was reached by propagation alone.
    pub fn force_backtrack(&mut self) -> bool {
        match self.breadcrumbs.last().copied() {
            None => false,
            Some(top) => {
                self.unwind(top);
                true
            }
        }
    }

    fn observe(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.observe(&self.grid, self.breadcrumbs.len() as u32);
        }
    }

    /// Runs inference to a fixpoint, crediting every assignment to the
    /// innermost active guess. Assignments made before the first guess are
    /// permanent and belong to no node.
    fn propagate(&mut self) -> Result<(), Unsolvable> {
        let mut log = Vec::new();
        let outcome = propagate::run(&mut self.grid, &mut log);
        if let Some(&top) = self.breadcrumbs.last() {
            self.arena.node_mut(top).consequences.extend(log);
        }
        outcome
    }

    /// Chooses the next trial assignment: the empty cell with the fewest
    /// candidates (ties broken in row-major order), and among its candidates
    /// the smallest value not already tried at this coordinate on the
    /// current trail. `None` means this position is exhausted.
    fn next_guess(&self) -> Option<(Coord, u8)> {
        let grid = &self.grid;
        let cell = grid.empty_cells().min_by_key(|&coord| grid.candidates(coord).len())?;
        let untried = grid.candidates(cell).without(self.arena.tried_values(cell));
        untried.smallest().map(|value| (cell, value))
    }

    fn commit_guess(&mut self, coord: Coord, value: u8) {
        assert!(
            self.breadcrumbs.iter().all(|&id| self.arena.node(id).coord != coord),
            "second active guess at {}",
            coord
        );
        self.grid
            .assign(coord, value)
            .expect("guess candidates are legal by construction");
        let parent = self.breadcrumbs.last().copied();
        let id = self.arena.push(coord, value, parent);
        self.breadcrumbs.push(id);
    }

    fn backtrack(&mut self) -> bool {
        match self.breadcrumbs.last().copied() {
            None => false,
            Some(top) => {
                self.unwind(top);
                self.backtracks += 1;
                true
            }
        }
    }

    /// Rolls back the top guess: discards its subtree depth-first, most
    /// recent child first, then clears its own cell and every consequence.
    /// Afterwards the grid, the mirrors and the trail are exactly as they
    /// were the moment before the guess was committed.
    fn unwind(&mut self, id: NodeId) {
        debug_assert_eq!(self.breadcrumbs.last(), Some(&id));
        self.breadcrumbs.pop();
        let children = self.arena.node(id).children.clone();
        for &child in children.iter().rev() {
            self.discard(child);
        }
        self.clear_node_cells(id);
        self.arena.abandon(id);
    }

    /// Removes an already rolled-back subtree for good, forgetting its
    /// tried values.
    fn discard(&mut self, id: NodeId) {
        let children = self.arena.node(id).children.clone();
        for &child in children.iter().rev() {
            self.discard(child);
        }
        self.clear_node_cells(id);
        self.arena.discard(id);
    }

    fn clear_node_cells(&mut self, id: NodeId) {
        let node = self.arena.node(id);
        let coord = node.coord;
        let consequences = node.consequences.clone();
        self.clear_if_filled(coord);
        for (coord, _) in consequences {
            self.clear_if_filled(coord);
        }
    }

    // abandoned children have already cleared their cells; skip those
    fn clear_if_filled(&mut self, coord: Coord) {
        if self.grid.get(coord).is_some() {
            self.grid.unassign(coord).expect("cell was just checked to be filled");
        }
    }
}

/// Lazy iterator over the distinct solutions of a puzzle, created by
/// [`Grid::solutions`](crate::Grid::solutions).
///
/// After each solution the search is re-triggered by forcing one backtrack;
/// the iterator is exhausted once the trail empties without finding another
/// complete grid.
pub struct Solutions {
    searcher: Searcher,
    yielded_first: bool,
    exhausted: bool,
}

impl Solutions {
    pub(crate) fn new(searcher: Searcher) -> Solutions {
        Solutions {
            searcher,
            yielded_first: false,
            exhausted: false,
        }
    }
}

impl Iterator for Solutions {
    type Item = Grid;

    fn next(&mut self) -> Option<Grid> {
        if self.exhausted {
            return None;
        }
        if self.yielded_first && !self.searcher.force_backtrack() {
            self.exhausted = true;
            return None;
        }
        match self.searcher.search() {
            Ok(()) => {
                self.yielded_first = true;
                Some(self.searcher.grid().clone())
            }
            Err(Unsolvable) => {
                self.exhausted = true;
                None
            }
        }
    }
}
