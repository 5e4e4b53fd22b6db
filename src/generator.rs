//! Puzzle generation
//!
//! A generator owns a completely filled board and produces puzzles from it
//! by keeping a subset of cells as givens. Three selection strategies exist;
//! every candidate puzzle is filtered for solution uniqueness and rated, and
//! generation can additionally target a difficulty band or label. All
//! randomness flows through the injected `Rng`, so a seeded generator is
//! fully reproducible.

use std::collections::BTreeSet;

use crate::board::{Coord, Dimensions, Grid};
use crate::errors::TriesExhausted;
use crate::rating::{DifficultyCategory, DifficultyRating, Rater};

use rand::rngs::ThreadRng;
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// How the generator chooses which cells of the solution to keep as givens.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strategy {
    /// Clue positions sampled uniformly without replacement. Coordinate sets
    /// already produced by this generator are rejected and resampled.
    Uniform,
    /// Clue set closed under the point reflection
    /// `(x, y) -> (size-1-y, size-1-x)`: half the budget is sampled, each
    /// sample's mirror image is added, and random mirror pairs top the set
    /// up to the budget.
    Symmetric,
    /// The clue budget is split across boxes. At `skew` 0 the split is as
    /// even as possible, at 1 boxes are packed completely full one after
    /// another; in between interpolates. Box order is shuffled before
    /// sampling within each box.
    BoxSkewed {
        /// Unevenness of the distribution, in `[0, 1]`.
        skew: f64,
    },
}

/// An inclusive score range for targeted generation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DifficultyBand {
    /// Smallest acceptable score.
    pub lower: f64,
    /// Largest acceptable score.
    pub upper: f64,
}

impl DifficultyBand {
    /// Returns whether the score falls in the band, bounds included.
    pub fn contains(&self, score: f64) -> bool {
        score >= self.lower && score <= self.upper
    }
}

/// Generates puzzles with a unique solution from one random filled board.
///
/// ```no_run
/// use sudokugen::{Dimensions, Generator, Strategy};
///
/// let mut generator = Generator::new(Dimensions::new(3, 3), 30);
/// let (puzzle, rating) = generator.generate_one(Strategy::Symmetric).unwrap();
/// println!("{}\n{}", puzzle, rating);
/// ```
pub struct Generator<R: Rng> {
    solution: Grid,
    clues: usize,
    max_tries: u32,
    // coordinate sets already produced, for the uniform strategy's dedup
    generated: Vec<BTreeSet<Coord>>,
    rng: R,
}

impl Generator<ThreadRng> {
    /// Creates a generator for boards of the given dimensions that keeps
    /// `clues` givens per puzzle, using the thread-local RNG.
    ///
    /// # Panics
    ///
    /// Panics if `clues` exceeds the number of cells.
    pub fn new(dims: Dimensions, clues: usize) -> Generator<ThreadRng> {
        Generator::with_rng(dims, clues, rand::thread_rng())
    }
}

impl<R: Rng> Generator<R> {
    /// Creates a generator with an explicit random source, for reproducible
    /// generation.
    ///
    /// # Panics
    ///
    /// Panics if `clues` exceeds the number of cells.
    pub fn with_rng(dims: Dimensions, clues: usize, mut rng: R) -> Generator<R> {
        let solution = Grid::random_filled(dims, &mut rng);
        Generator::from_solution(solution, clues, rng)
    }

    /// Creates a generator that cuts puzzles out of the given solved board.
    ///
    /// # Panics
    ///
    /// Panics if the board is not completely filled or `clues` exceeds the
    /// number of cells.
    pub fn from_solution(solution: Grid, clues: usize, rng: R) -> Generator<R> {
        assert!(solution.is_complete());
        assert!(clues <= solution.dims().n_cells());
        Generator {
            solution,
            clues,
            max_tries: 100,
            generated: Vec::new(),
            rng,
        }
    }

    /// The filled board puzzles are cut from.
    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    /// Sets the attempt budget for the filtered generation methods.
    pub fn set_max_tries(&mut self, max_tries: u32) {
        self.max_tries = max_tries;
    }

    /// Produces one candidate puzzle with the given strategy, without
    /// checking uniqueness or difficulty.
    pub fn make_puzzle(&mut self, strategy: Strategy) -> Grid {
        let coords = match strategy {
            Strategy::Uniform => self.uniform_coords(),
            Strategy::Symmetric => self.symmetric_coords(),
            Strategy::BoxSkewed { skew } => self.skewed_coords(skew),
        };
        self.puzzle_from_coords(coords)
    }

    /// Produces the next puzzle with a unique solution, together with its
    /// rating. Gives up after the configured number of attempts.
    pub fn generate_one(
        &mut self,
        strategy: Strategy,
    ) -> Result<(Grid, DifficultyRating), TriesExhausted> {
        self.search_puzzle(strategy, |_| true)
    }

    /// Like [`generate_one`](Generator::generate_one), but only accepts
    /// puzzles whose score falls in `band`.
    pub fn generate_in_band(
        &mut self,
        strategy: Strategy,
        band: DifficultyBand,
    ) -> Result<(Grid, DifficultyRating), TriesExhausted> {
        self.search_puzzle(strategy, |rating| band.contains(rating.score()))
    }

    /// Like [`generate_one`](Generator::generate_one), but only accepts
    /// puzzles rated with the given label.
    pub fn generate_for_category(
        &mut self,
        strategy: Strategy,
        category: DifficultyCategory,
    ) -> Result<(Grid, DifficultyRating), TriesExhausted> {
        self.search_puzzle(strategy, |rating| rating.category() == category)
    }

    /// Returns an iterator producing `count` puzzles, optionally restricted
    /// to a difficulty band. The iterator ends early after the first
    /// exhausted attempt budget.
    pub fn generate(
        &mut self,
        count: usize,
        strategy: Strategy,
        band: Option<DifficultyBand>,
    ) -> Puzzles<'_, R> {
        Puzzles {
            generator: self,
            strategy,
            band,
            remaining: count,
            failed: false,
        }
    }

    fn search_puzzle(
        &mut self,
        strategy: Strategy,
        accept: impl Fn(&DifficultyRating) -> bool,
    ) -> Result<(Grid, DifficultyRating), TriesExhausted> {
        for _ in 0..self.max_tries {
            let puzzle = self.make_puzzle(strategy);
            let mut rater = Rater::new(&puzzle);
            if !rater.has_unique_solution() {
                continue;
            }
            let rating = match rater.difficulty() {
                Ok(rating) => rating,
                Err(_) => continue,
            };
            if accept(&rating) {
                return Ok((puzzle, rating));
            }
        }
        Err(TriesExhausted { tries: self.max_tries })
    }

    fn uniform_coords(&mut self) -> BTreeSet<Coord> {
        let all = self.all_coords();
        loop {
            let coords: BTreeSet<Coord> = index::sample(&mut self.rng, all.len(), self.clues)
                .iter()
                .map(|i| all[i])
                .collect();
            if !self.generated.contains(&coords) {
                return coords;
            }
        }
    }

    fn symmetric_coords(&mut self) -> BTreeSet<Coord> {
        let all = self.all_coords();
        let mut coords: BTreeSet<Coord> = index::sample(&mut self.rng, all.len(), self.clues / 2)
            .iter()
            .map(|i| all[i])
            .collect();
        let reflections: Vec<Coord> = coords.iter().map(|&coord| self.reflect(coord)).collect();
        coords.extend(reflections);
        while coords.len() < self.clues {
            let remaining: Vec<Coord> =
                all.iter().copied().filter(|coord| !coords.contains(coord)).collect();
            match remaining.choose(&mut self.rng) {
                None => break,
                Some(&coord) => {
                    coords.insert(coord);
                    coords.insert(self.reflect(coord));
                }
            }
        }
        coords
    }

    fn skewed_coords(&mut self, skew: f64) -> BTreeSet<Coord> {
        assert!((0.0..=1.0).contains(&skew));
        let dims = self.solution.dims();
        let nboxes = usize::from(dims.size());
        let capacity = usize::from(dims.size());
        let mut quotas = Vec::with_capacity(nboxes);
        let mut remaining = self.clues;
        for n in 0..nboxes {
            let share = remaining / (nboxes - n);
            let cap = share + ((capacity - share) as f64 * skew).round() as usize;
            let take = cap.min(remaining).min(capacity);
            quotas.push(take);
            remaining -= take;
        }
        quotas.shuffle(&mut self.rng);
        let mut coords = BTreeSet::new();
        for (b, &quota) in quotas.iter().enumerate() {
            if quota == 0 {
                continue;
            }
            let cells: Vec<Coord> = dims.box_cells(b as u8).collect();
            for i in index::sample(&mut self.rng, cells.len(), quota).iter() {
                coords.insert(cells[i]);
            }
        }
        coords
    }

    /// The 180° point reflection closing symmetric clue sets.
    fn reflect(&self, coord: Coord) -> Coord {
        let upper = self.solution.size() - 1;
        Coord::new(upper - coord.y, upper - coord.x)
    }

    fn puzzle_from_coords(&mut self, coords: BTreeSet<Coord>) -> Grid {
        let mut puzzle = Grid::empty(self.solution.dims());
        for &coord in &coords {
            let value = self.solution.get(coord).expect("solution boards are complete");
            puzzle
                .assign(coord, value)
                .expect("a subset of a valid solution cannot conflict");
        }
        self.generated.push(coords);
        puzzle
    }

    fn all_coords(&self) -> Vec<Coord> {
        self.solution.dims().cells().collect()
    }
}

/// Iterator returned by [`Generator::generate`].
pub struct Puzzles<'a, R: Rng> {
    generator: &'a mut Generator<R>,
    strategy: Strategy,
    band: Option<DifficultyBand>,
    remaining: usize,
    failed: bool,
}

impl<'a, R: Rng> Iterator for Puzzles<'a, R> {
    type Item = Result<(Grid, DifficultyRating), TriesExhausted>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let result = match self.band {
            Some(band) => self.generator.generate_in_band(self.strategy, band),
            None => self.generator.generate_one(self.strategy),
        };
        self.failed = result.is_err();
        Some(result)
    }
}
