//! Difficulty rating
//!
//! A puzzle is rated by solving it with an instrumented searcher. Each time
//! the searcher is about to propagate, the recorder measures against the
//! untouched grid what a single pass of each inference rule could fill at
//! that moment. The measurements are indexed by *tier*, the number of active
//! guesses at that moment: cells that only become inferable deep inside a
//! guess are worth less. Those counts plus the guess and backtrack totals
//! feed a scalar score and a discrete label.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::board::{Coord, Grid};
use crate::errors::Unsolvable;
use crate::solver::{propagate, Searcher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Records dry-run propagation measurements per tier.
///
/// Proposals are deduplicated across the whole solve: a cell counted at one
/// tier is never counted again, no matter how often the searcher passes the
/// same depth.
#[derive(Clone, Debug, Default)]
pub(crate) struct TierRecorder {
    hidden_by_tier: BTreeMap<u32, usize>,
    naked_by_tier: BTreeMap<u32, usize>,
    counted: BTreeSet<(Coord, u8)>,
}

impl TierRecorder {
    pub fn new() -> TierRecorder {
        TierRecorder::default()
    }

    pub fn observe(&mut self, grid: &Grid, tier: u32) {
        let hidden: BTreeSet<(Coord, u8)> = propagate::scan_hidden_singles(grid)
            .into_iter()
            .filter(|proposal| !self.counted.contains(proposal))
            .collect();
        // both scans are filtered against the same counted set, so a cell
        // found by both rules in one measurement counts for each of them
        let naked: BTreeSet<(Coord, u8)> = propagate::scan_naked_singles(grid)
            .into_iter()
            .filter(|proposal| !self.counted.contains(proposal))
            .collect();
        if !hidden.is_empty() {
            *self.hidden_by_tier.entry(tier).or_insert(0) += hidden.len();
        }
        if !naked.is_empty() {
            *self.naked_by_tier.entry(tier).or_insert(0) += naked.len();
        }
        self.counted.extend(hidden);
        self.counted.extend(naked);
    }
}

/// Discrete difficulty label, derived from the score by fixed thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DifficultyCategory {
    /// Score at most 0.45
    Easy,
    /// Score above 0.45 and below 0.59
    Medium,
    /// Score from 0.59 to 0.75 inclusive
    Hard,
    /// Score above 0.75
    VeryHard,
}

impl DifficultyCategory {
    /// The label for a score. The partition is part of the crate's
    /// compatibility contract, boundaries included.
    pub fn from_score(score: f64) -> DifficultyCategory {
        if score > 0.75 {
            DifficultyCategory::VeryHard
        } else if score >= 0.59 {
            DifficultyCategory::Hard
        } else if score > 0.45 {
            DifficultyCategory::Medium
        } else {
            DifficultyCategory::Easy
        }
    }
}

impl fmt::Display for DifficultyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DifficultyCategory::Easy => "Easy",
            DifficultyCategory::Medium => "Medium",
            DifficultyCategory::Hard => "Hard",
            DifficultyCategory::VeryHard => "Very hard",
        })
    }
}

/// How hard a puzzle was to solve, measured on a finished solve.
///
/// The score rewards cells that pure inference could fill (the earlier the
/// better) and penalizes guesses and backtracks:
///
/// ```text
/// score = 1 - hidden_ease/filled - naked_ease/filled
///           + guesses/filled + backtracks/filled
/// ```
///
/// where each ease is `sum(count_at_tier / (tier + 1))` and `filled` is the
/// number of cells that were blank in the original puzzle. The score is not
/// clamped: unusual puzzles can rate below 0 or above 1.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DifficultyRating {
    hidden_by_tier: BTreeMap<u32, usize>,
    naked_by_tier: BTreeMap<u32, usize>,
    guesses: u32,
    backtracks: u32,
    cells_filled: u32,
    hidden_ease: f64,
    naked_ease: f64,
    score: f64,
}

impl DifficultyRating {
    pub(crate) fn new(
        hidden_by_tier: BTreeMap<u32, usize>,
        naked_by_tier: BTreeMap<u32, usize>,
        guesses: u32,
        backtracks: u32,
        cells_filled: u32,
    ) -> DifficultyRating {
        let hidden_ease = diminishing_sum(&hidden_by_tier);
        let naked_ease = diminishing_sum(&naked_by_tier);
        let score = if cells_filled == 0 {
            0.0
        } else {
            let filled = f64::from(cells_filled);
            1.0 - hidden_ease / filled - naked_ease / filled
                + f64::from(guesses) / filled
                + f64::from(backtracks) / filled
        };
        DifficultyRating {
            hidden_by_tier,
            naked_by_tier,
            guesses,
            backtracks,
            cells_filled,
            hidden_ease,
            naked_ease,
            score,
        }
    }

    /// The scalar difficulty score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The discrete label for [`score`](DifficultyRating::score).
    pub fn category(&self) -> DifficultyCategory {
        DifficultyCategory::from_score(self.score)
    }

    /// Number of cells that were blank in the original puzzle.
    pub fn cells_filled(&self) -> u32 {
        self.cells_filled
    }

    /// Number of guesses the solve needed.
    pub fn guesses(&self) -> u32 {
        self.guesses
    }

    /// Number of backtracks the solve needed.
    pub fn backtracks(&self) -> u32 {
        self.backtracks
    }

    /// Cells fillable by the hidden-single rule before any guessing.
    pub fn instant_hidden_singles(&self) -> usize {
        self.hidden_by_tier.get(&0).copied().unwrap_or(0)
    }

    /// Cells fillable by the naked-single rule before any guessing.
    pub fn instant_naked_singles(&self) -> usize {
        self.naked_by_tier.get(&0).copied().unwrap_or(0)
    }

    /// Share of the blanks fillable by the hidden-single rule up front.
    pub fn instant_hidden_proportion(&self) -> f64 {
        self.proportion(self.instant_hidden_singles())
    }

    /// Share of the blanks fillable by the naked-single rule up front.
    pub fn instant_naked_proportion(&self) -> f64 {
        self.proportion(self.instant_naked_singles())
    }

    /// Tier-weighted sum of hidden-single measurements.
    pub fn hidden_single_ease(&self) -> f64 {
        self.hidden_ease
    }

    /// Tier-weighted sum of naked-single measurements.
    pub fn naked_single_ease(&self) -> f64 {
        self.naked_ease
    }

    fn proportion(&self, count: usize) -> f64 {
        if self.cells_filled == 0 {
            0.0
        } else {
            count as f64 / f64::from(self.cells_filled)
        }
    }
}

impl fmt::Display for DifficultyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.category(), self.score)
    }
}

// count/1 for tier 0, count/2 for tier 1, ...
fn diminishing_sum(counts: &BTreeMap<u32, usize>) -> f64 {
    counts
        .iter()
        .map(|(&tier, &count)| count as f64 / f64::from(tier + 1))
        .sum()
}

/// Drives an instrumented search over one puzzle and turns the collected
/// measurements into a [`DifficultyRating`].
pub(crate) struct Rater {
    searcher: Searcher,
    cells_to_fill: u32,
}

impl Rater {
    pub fn new(puzzle: &Grid) -> Rater {
        Rater {
            cells_to_fill: puzzle.empty_cells().count() as u32,
            searcher: Searcher::with_recorder(puzzle.clone()),
        }
    }

    /// Uniqueness probe that shares its statistics with
    /// [`difficulty`](Rater::difficulty): the work spent looking for a
    /// second solution counts towards the rating.
    pub fn has_unique_solution(&mut self) -> bool {
        if self.searcher.search().is_err() {
            return false;
        }
        if !self.searcher.force_backtrack() {
            return true;
        }
        self.searcher.search().is_err()
    }

    pub fn difficulty(mut self) -> Result<DifficultyRating, Unsolvable> {
        if !self.searcher.solved() {
            self.searcher.search()?;
        }
        let recorder = self
            .searcher
            .take_recorder()
            .expect("rater always installs a recorder");
        Ok(DifficultyRating::new(
            recorder.hidden_by_tier,
            recorder.naked_by_tier,
            self.searcher.live_guesses(),
            self.searcher.backtracks(),
            self.cells_to_fill,
        ))
    }
}
