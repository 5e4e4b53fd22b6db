use sudokugen::{
    Coord, DifficultyBand, DifficultyCategory, Dimensions, FromValuesError, Generator, Grid,
    GridError, ParseGridError, Strategy, ValueSet,
};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn dims9() -> Dimensions {
    Dimensions::new(3, 3)
}

fn dims4() -> Dimensions {
    Dimensions::new(2, 2)
}

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

const PUZZLE: &str = "\
0 0 0 2 0 0 0 6 3
3 0 0 0 0 5 4 0 1
0 0 1 0 0 3 9 8 0
0 0 0 0 0 0 0 9 0
0 0 0 5 3 8 0 0 0
0 3 0 0 0 0 0 0 0
0 2 6 3 0 0 5 0 0
5 0 3 7 0 0 0 0 8
4 7 0 0 0 1 0 0 0";

// two boxes share the value pair {1, 3} in a swappable rectangle, so this
// has exactly two solutions
const TWO_SOLUTIONS: &str = "\
0 2 0 4
0 4 0 2
2 1 4 3
4 3 2 1";

// legal givens, but the top-left cell has no candidate: its row is missing
// {1, 2} and its column already contains both
const DEAD_END: &str = "\
0 0 3 4
0 0 1 2
1 3 0 0
2 4 0 0";

fn assert_valid_solution(grid: &Grid) {
    assert!(grid.is_complete());
    let size = grid.size();
    let full: Vec<u8> = (1..=size).collect();
    for i in 0..size {
        let mut row: Vec<u8> = (0..size).map(|x| grid.get(Coord::new(x, i)).unwrap()).collect();
        let mut col: Vec<u8> = (0..size).map(|y| grid.get(Coord::new(i, y)).unwrap()).collect();
        row.sort();
        col.sort();
        assert_eq!(row, full, "row {} is not a permutation", i);
        assert_eq!(col, full, "column {} is not a permutation", i);
    }
    let (bw, bh) = (grid.dims().box_width(), grid.dims().box_height());
    for by in 0..bw {
        for bx in 0..bh {
            let mut values: Vec<u8> = (0..bh)
                .flat_map(|dy| {
                    (0..bw).map(move |dx| (bx * bw + dx, by * bh + dy))
                })
                .map(|(x, y)| grid.get(Coord::new(x, y)).unwrap())
                .collect();
            values.sort();
            assert_eq!(values, full, "box ({}, {}) is not a permutation", bx, by);
        }
    }
}

fn given_coords(grid: &Grid) -> Vec<Coord> {
    grid.filled_cells().collect()
}

#[test]
fn value_set_basics() {
    let mut set = ValueSet::NONE;
    assert!(set.is_empty());
    set.insert(3);
    set.insert(7);
    assert!(set.contains(3));
    assert!(!set.contains(4));
    assert_eq!(set.len(), 2);
    assert_eq!(set.smallest(), Some(3));
    assert_eq!(set.unique(), None);
    set.remove(7);
    assert_eq!(set.unique(), Some(3));
    assert_eq!(ValueSet::full(9).iter().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
}

#[test]
fn coord_order_is_row_major() {
    assert!(Coord::new(8, 0) < Coord::new(0, 1));
    assert!(Coord::new(2, 3) < Coord::new(3, 3));
}

#[test]
fn dimensions_validation() {
    assert!(Dimensions::new_checked(0, 3).is_none());
    assert!(Dimensions::new_checked(1, 1).is_none());
    assert!(Dimensions::new_checked(9, 8).is_none());
    let dims = Dimensions::new_checked(3, 4).unwrap();
    assert_eq!(dims.size(), 12);
    assert_eq!(dims.n_cells(), 144);
}

#[test]
fn parse_and_serialize_round_trip() {
    let grid = Grid::from_str_grid(dims9(), PUZZLE).unwrap();
    let rewritten = grid.to_str_grid();
    assert_eq!(Grid::from_str_grid(dims9(), &rewritten).unwrap(), grid);
}

#[test]
fn parse_rejects_bad_token() {
    let err = Grid::from_str_grid(dims4(), "1 2 x 4").unwrap_err();
    match err {
        ParseGridError::InvalidToken { token, index } => {
            assert_eq!(token, "x");
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn parse_accepts_underscore_for_empty() {
    let grid = Grid::from_str_grid(dims4(), "1 _ _ _ _ _ _ _ _ _ _ _ _ _ _ _").unwrap();
    assert_eq!(grid.get(Coord::new(0, 0)), Some(1));
    assert_eq!(grid.get(Coord::new(1, 0)), None);
}

#[test]
fn from_values_rejects_wrong_length() {
    let err = Grid::from_values(dims4(), &[0; 15]).unwrap_err();
    assert_eq!(err, FromValuesError::WrongLength { expected: 16, found: 15 });
}

#[test]
fn from_values_rejects_out_of_range() {
    let mut values = vec![0; 16];
    values[3] = 5;
    let err = Grid::from_values(dims4(), &values).unwrap_err();
    assert_eq!(err, FromValuesError::OutOfRange { value: 5, size: 4 });
}

#[test]
fn from_values_rejects_conflicting_givens() {
    let mut values = vec![0; 16];
    values[0] = 3;
    values[2] = 3;
    let err = Grid::from_values(dims4(), &values).unwrap_err();
    match err {
        FromValuesError::Conflict(GridError::RowConflict { coord, value, conflict }) => {
            assert_eq!(coord, Coord::new(2, 0));
            assert_eq!(value, 3);
            assert_eq!(conflict, Coord::new(0, 0));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn row_conflict_leaves_grid_unchanged() {
    let mut grid = Grid::empty(dims9());
    grid.assign(Coord::new(0, 0), 5).unwrap();
    let snapshot = grid.clone();
    let err = grid.assign(Coord::new(5, 0), 5).unwrap_err();
    assert_eq!(
        err,
        GridError::RowConflict {
            coord: Coord::new(5, 0),
            value: 5,
            conflict: Coord::new(0, 0),
        }
    );
    assert_eq!(grid, snapshot);
    assert_eq!(grid.get(Coord::new(5, 0)), None);
    let fives = grid.iter().filter(|&cell| cell == Some(5)).count();
    assert_eq!(fives, 1);
}

#[test]
fn column_and_box_conflicts_are_detected() {
    let mut grid = Grid::empty(dims9());
    grid.assign(Coord::new(0, 0), 7).unwrap();
    match grid.assign(Coord::new(0, 8), 7) {
        Err(GridError::ColumnConflict { conflict, .. }) => {
            assert_eq!(conflict, Coord::new(0, 0));
        }
        other => panic!("unexpected result {:?}", other),
    }
    match grid.assign(Coord::new(1, 1), 7) {
        Err(GridError::BoxConflict { conflict, .. }) => {
            assert_eq!(conflict, Coord::new(0, 0));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn assign_then_unassign_restores_grid() {
    let mut grid = Grid::from_str_grid(dims9(), PUZZLE).unwrap();
    let snapshot = grid.clone();
    grid.assign(Coord::new(0, 0), 9).unwrap();
    assert_ne!(grid, snapshot);
    assert_eq!(grid.unassign(Coord::new(0, 0)), Ok(9));
    assert_eq!(grid, snapshot);
}

#[test]
fn unassign_empty_cell_fails() {
    let mut grid = Grid::empty(dims4());
    assert_eq!(
        grid.unassign(Coord::new(1, 1)),
        Err(GridError::AlreadyEmpty { coord: Coord::new(1, 1) })
    );
}

#[test]
fn assign_occupied_cell_fails_unless_forced() {
    let mut grid = Grid::empty(dims4());
    grid.assign(Coord::new(0, 0), 1).unwrap();
    assert_eq!(
        grid.assign(Coord::new(0, 0), 2),
        Err(GridError::AlreadySet { coord: Coord::new(0, 0) })
    );
    grid.force_assign(Coord::new(0, 0), 2).unwrap();
    assert_eq!(grid.get(Coord::new(0, 0)), Some(2));
}

#[test]
#[should_panic]
fn assign_rejects_out_of_range_value() {
    let mut grid = Grid::empty(dims4());
    let _ = grid.assign(Coord::new(0, 0), 5);
}

#[test]
fn candidates_exclude_row_column_and_box() {
    let mut grid = Grid::empty(dims4());
    grid.assign(Coord::new(2, 0), 1).unwrap();
    grid.assign(Coord::new(0, 2), 2).unwrap();
    grid.assign(Coord::new(1, 1), 3).unwrap();
    let candidates: Vec<u8> = grid.candidates(Coord::new(0, 0)).iter().collect();
    assert_eq!(candidates, vec![4]);
}

#[test]
fn empty_grid_is_solvable_but_not_unique() {
    let grid = Grid::empty(dims9());
    let solution = grid.solve().unwrap();
    assert_valid_solution(&solution);
    assert!(!grid.has_unique_solution());
}

#[test]
fn single_blank_cell_is_filled_without_guessing() {
    let solution = Grid::empty(dims9()).solve().unwrap();
    let mut values: Vec<u8> = solution.iter().map(|cell| cell.unwrap()).collect();
    let removed = values[40];
    values[40] = 0;
    let puzzle = Grid::from_values(dims9(), &values).unwrap();

    let solved = puzzle.solve().unwrap();
    assert_eq!(solved, solution);
    assert_eq!(solved.get(Coord::new(4, 4)), Some(removed));

    let rating = puzzle.difficulty().unwrap();
    assert_eq!(rating.guesses(), 0);
    assert_eq!(rating.backtracks(), 0);
    assert_eq!(rating.cells_filled(), 1);
    // the one blank is both a hidden and a naked single, so each ease term
    // contributes a full cell
    assert_eq!(rating.instant_hidden_singles(), 1);
    assert_eq!(rating.instant_naked_singles(), 1);
    assert!((rating.score() + 1.0).abs() < 1e-9);
    assert_eq!(rating.category(), DifficultyCategory::Easy);
}

#[test]
fn known_puzzle_solves_and_is_unique() {
    let puzzle = Grid::from_str_grid(dims9(), PUZZLE).unwrap();
    let solution = puzzle.solve().unwrap();
    assert_valid_solution(&solution);
    for coord in given_coords(&puzzle) {
        assert_eq!(solution.get(coord), puzzle.get(coord));
    }
    assert!(puzzle.has_unique_solution());
    assert_eq!(puzzle.solutions().count(), 1);
}

#[test]
fn two_solution_puzzle_enumerates_both() {
    let puzzle = Grid::from_str_grid(dims4(), TWO_SOLUTIONS).unwrap();
    let solutions: Vec<Grid> = puzzle.solutions().collect();
    assert_eq!(solutions.len(), 2);
    assert_ne!(solutions[0], solutions[1]);
    for solution in &solutions {
        assert_valid_solution(solution);
        for coord in given_coords(&puzzle) {
            assert_eq!(solution.get(coord), puzzle.get(coord));
        }
    }
    // the two solutions differ exactly in the swappable rectangle
    let differing: Vec<Coord> = puzzle
        .empty_cells()
        .filter(|&coord| solutions[0].get(coord) != solutions[1].get(coord))
        .collect();
    assert_eq!(
        differing,
        vec![Coord::new(0, 0), Coord::new(2, 0), Coord::new(0, 1), Coord::new(2, 1)]
    );
    assert!(!puzzle.has_unique_solution());
}

#[test]
fn solution_enumeration_is_deterministic() {
    let puzzle = Grid::from_str_grid(dims4(), TWO_SOLUTIONS).unwrap();
    let first: Vec<Grid> = puzzle.solutions().collect();
    let second: Vec<Grid> = puzzle.solutions().collect();
    assert_eq!(first, second);
    assert_eq!(puzzle.has_unique_solution(), puzzle.has_unique_solution());
}

#[test]
fn dead_end_puzzle_is_unsolvable() {
    let puzzle = Grid::from_str_grid(dims4(), DEAD_END).unwrap();
    assert!(puzzle.solve().is_err());
    assert!(puzzle.difficulty().is_err());
    assert!(!puzzle.has_unique_solution());
    assert_eq!(puzzle.solutions().count(), 0);
}

#[test]
fn guessing_raises_the_score() {
    // nothing on an empty 4x4 board is inferable, so the solve must guess
    let rating = Grid::empty(dims4()).difficulty().unwrap();
    assert!(rating.guesses() >= 1);
    assert_eq!(rating.cells_filled(), 16);
    let filled = f64::from(rating.cells_filled());
    let without_penalty =
        1.0 - rating.hidden_single_ease() / filled - rating.naked_single_ease() / filled;
    let expected = without_penalty
        + f64::from(rating.guesses()) / filled
        + f64::from(rating.backtracks()) / filled;
    assert!((rating.score() - expected).abs() < 1e-9);
    assert!(rating.score() > without_penalty);
}

#[test]
fn rating_is_deterministic() {
    let puzzle = Grid::from_str_grid(dims9(), PUZZLE).unwrap();
    let first = puzzle.difficulty().unwrap();
    let second = puzzle.difficulty().unwrap();
    assert_eq!(first, second);
}

#[test]
fn category_thresholds_are_exact() {
    assert_eq!(DifficultyCategory::from_score(0.76), DifficultyCategory::VeryHard);
    assert_eq!(DifficultyCategory::from_score(0.75), DifficultyCategory::Hard);
    assert_eq!(DifficultyCategory::from_score(0.59), DifficultyCategory::Hard);
    assert_eq!(DifficultyCategory::from_score(0.58), DifficultyCategory::Medium);
    assert_eq!(DifficultyCategory::from_score(0.46), DifficultyCategory::Medium);
    assert_eq!(DifficultyCategory::from_score(0.45), DifficultyCategory::Easy);
    assert_eq!(DifficultyCategory::from_score(0.0), DifficultyCategory::Easy);
    assert_eq!(DifficultyCategory::from_score(-1.0), DifficultyCategory::Easy);
    assert_eq!(DifficultyCategory::from_score(1.5), DifficultyCategory::VeryHard);
    assert_eq!(DifficultyCategory::VeryHard.to_string(), "Very hard");
}

#[test]
fn random_filled_boards_are_valid() {
    let mut rng = seeded(7);
    assert_valid_solution(&Grid::random_filled(dims4(), &mut rng));
    assert_valid_solution(&Grid::random_filled(dims9(), &mut rng));
    assert_valid_solution(&Grid::random_filled(Dimensions::new(3, 4), &mut rng));
}

#[test]
fn generator_is_reproducible_with_a_seed() {
    let mut first = Generator::with_rng(dims9(), 30, seeded(42));
    let mut second = Generator::with_rng(dims9(), 30, seeded(42));
    assert_eq!(first.solution(), second.solution());
    assert_eq!(first.make_puzzle(Strategy::Uniform), second.make_puzzle(Strategy::Uniform));
}

#[test]
fn uniform_strategy_never_repeats_a_coordinate_set() {
    let mut generator = Generator::with_rng(dims4(), 8, seeded(3));
    let first = given_coords(&generator.make_puzzle(Strategy::Uniform));
    let second = given_coords(&generator.make_puzzle(Strategy::Uniform));
    assert_eq!(first.len(), 8);
    assert_eq!(second.len(), 8);
    assert_ne!(first, second);
}

#[test]
fn symmetric_strategy_is_closed_under_point_reflection() {
    let mut generator = Generator::with_rng(dims9(), 30, seeded(11));
    let puzzle = generator.make_puzzle(Strategy::Symmetric);
    let givens = given_coords(&puzzle);
    assert!(givens.len() >= 30);
    for &coord in &givens {
        let reflected = Coord::new(8 - coord.y, 8 - coord.x);
        assert!(
            puzzle.get(reflected).is_some(),
            "{} has no reflected given at {}",
            coord,
            reflected
        );
    }
}

fn box_clue_counts(puzzle: &Grid) -> Vec<usize> {
    let (bw, bh) = (puzzle.dims().box_width(), puzzle.dims().box_height());
    let mut counts = vec![0; usize::from(puzzle.size())];
    for coord in puzzle.filled_cells() {
        let b = (coord.y / bh) * bh + coord.x / bw;
        counts[usize::from(b)] += 1;
    }
    counts
}

#[test]
fn zero_skew_spreads_clues_evenly() {
    let mut generator = Generator::with_rng(dims9(), 30, seeded(5));
    let puzzle = generator.make_puzzle(Strategy::BoxSkewed { skew: 0.0 });
    let counts = box_clue_counts(&puzzle);
    assert_eq!(counts.iter().sum::<usize>(), 30);
    assert!(counts.iter().all(|&count| count == 3 || count == 4), "{:?}", counts);
}

#[test]
fn full_skew_packs_boxes_first() {
    let mut generator = Generator::with_rng(dims9(), 30, seeded(5));
    let puzzle = generator.make_puzzle(Strategy::BoxSkewed { skew: 1.0 });
    let mut counts = box_clue_counts(&puzzle);
    counts.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(counts, vec![9, 9, 9, 3, 0, 0, 0, 0, 0]);
}

#[test]
fn generated_puzzles_are_unique_and_rated() {
    let mut generator = Generator::with_rng(dims4(), 12, seeded(21));
    let (puzzle, rating) = generator.generate_one(Strategy::Uniform).unwrap();
    assert_eq!(given_coords(&puzzle).len(), 12);
    assert!(puzzle.has_unique_solution());
    assert!(rating.score().is_finite());
    assert_valid_solution(&puzzle.solve().unwrap());
}

#[test]
fn band_generation_accepts_any_score_in_a_wide_band() {
    let mut generator = Generator::with_rng(dims4(), 12, seeded(8));
    let band = DifficultyBand { lower: -100.0, upper: 100.0 };
    let (_, rating) = generator.generate_in_band(Strategy::Uniform, band).unwrap();
    assert!(band.contains(rating.score()));
}

#[test]
fn category_generation_matches_the_label() {
    let mut generator = Generator::with_rng(dims4(), 14, seeded(2));
    let (_, rating) = generator
        .generate_for_category(Strategy::Uniform, DifficultyCategory::Easy)
        .unwrap();
    assert_eq!(rating.category(), DifficultyCategory::Easy);
}

#[test]
fn unreachable_band_exhausts_tries() {
    let mut generator = Generator::with_rng(dims4(), 12, seeded(13));
    generator.set_max_tries(3);
    let band = DifficultyBand { lower: 50.0, upper: 60.0 };
    let err = generator.generate_in_band(Strategy::Uniform, band).unwrap_err();
    assert_eq!(err.tries, 3);
}

#[test]
fn generate_yields_the_requested_count() {
    let mut generator = Generator::with_rng(dims4(), 12, seeded(17));
    let puzzles: Vec<_> = generator.generate(3, Strategy::Uniform, None).collect();
    assert_eq!(puzzles.len(), 3);
    for result in puzzles {
        let (puzzle, _) = result.unwrap();
        assert!(puzzle.has_unique_solution());
    }
}

#[test]
fn display_draws_box_borders() {
    let grid = Grid::from_str_grid(dims4(), TWO_SOLUTIONS).unwrap();
    let rendered = grid.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "+-----+-----+");
    assert_eq!(lines[1], "| _ 2 | _ 4 |");
    assert_eq!(lines[3], "+-----+-----+");
    assert_eq!(lines.len(), 7);
}

#[test]
fn twelve_by_twelve_boards_solve() {
    let dims = Dimensions::new(3, 4);
    let solution = Grid::empty(dims).solve().unwrap();
    assert_valid_solution(&solution);
}
