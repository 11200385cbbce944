//! Every solution the search reports must replay cleanly against a freshly
//! parsed grid: all of its removals legal, the grid empty after the last
//! step and not a step earlier.

use lok_solver::parse::parse;
use lok_solver::search::{solve, SolveOptions};
use lok_solver::solution::{replay, ReplayError, Solution};

const PUZZLES: [&str; 6] = [
    "LOKA",
    "TLAK\nQ\nQ",
    "TLAK\nQ  Q",
    "TX\n A",
    "LOLO\nQ",
    "BE_TA",
];

#[test]
fn every_reported_solution_replays_to_an_empty_grid() {
    for puzzle in PUZZLES {
        let mut grid = parse(puzzle).unwrap();
        let report = solve(&mut grid, &SolveOptions::default());
        assert!(!report.solutions.is_empty(), "{puzzle:?} should be solvable");

        for solution in &report.solutions {
            let mut fresh = parse(puzzle).unwrap();
            assert_eq!(replay(&mut fresh, solution), Ok(()), "replaying {solution:?}");
            assert_eq!(fresh.active_count(), 0);
        }
    }
}

#[test]
fn the_grid_is_not_empty_before_the_last_step() {
    for puzzle in PUZZLES {
        let mut grid = parse(puzzle).unwrap();
        let report = solve(&mut grid, &SolveOptions::default());

        for solution in &report.solutions {
            let prefix = Solution {
                steps: solution.steps[..solution.steps.len() - 1].to_vec(),
            };
            let mut fresh = parse(puzzle).unwrap();
            match replay(&mut fresh, &prefix) {
                Err(ReplayError::NotCleared { remaining }) => assert!(remaining > 0),
                other => panic!("prefix of {solution:?} replayed as {other:?}"),
            }
        }
    }
}

#[test]
fn solutions_survive_a_json_round_trip() {
    let mut grid = parse("BE_TA").unwrap();
    let report = solve(&mut grid, &SolveOptions::default());

    for solution in &report.solutions {
        let json = serde_json::to_string(solution).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, solution);

        let mut fresh = parse("BE_TA").unwrap();
        assert_eq!(replay(&mut fresh, &back), Ok(()));
    }
}
