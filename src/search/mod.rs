//! Depth-bounded exhaustive search for cast sequences that clear the grid.
//!
//! One recursive call per explored position. Every state change made before
//! a recursive call (cell removals, a dynamic symbol write, an
//! introduced-symbol push) is reversed exactly once after it returns, so
//! sibling candidates always observe an unmodified grid.

pub mod movegen;

use serde::Serialize;

use crate::grid::{Direction, Grid};
use crate::solution::{Solution, Step, StepAction};
use crate::spell::{Spell, EMPTY, RESERVED_WRITE_LETTERS};

pub use movegen::{find_possible_moves, MoveCandidate};

/// Casts per solution are capped at this depth; deeper branches are pruned,
/// not failed.
pub const MAX_DEPTH: usize = 10;

/// Search configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// Stop once this many solutions have been recorded. `None` keeps
    /// searching until the whole bounded tree is explored.
    pub solution_limit: Option<usize>,
}

/// The outcome of a [`solve`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveReport {
    /// Recursive calls that reached candidate enumeration. Diagnostic only.
    pub explored_states: u64,
    /// Solutions in discovery order.
    pub solutions: Vec<Solution>,
}

/// Search `grid` for cast sequences that remove every cell.
///
/// The grid is mutated during the search but every mutation is undone; on
/// return it is back in its pre-call state, so solving the same grid twice
/// yields identical reports.
pub fn solve(grid: &mut Grid, options: &SolveOptions) -> SolveReport {
    let write_alphabet = write_alphabet(grid);
    let mut searcher = Searcher {
        grid,
        solution_limit: options.solution_limit,
        write_alphabet,
        explored: 0,
        steps: Vec::new(),
        introduced: Vec::new(),
        solutions: Vec::new(),
    };
    searcher.search(0);
    SolveReport {
        explored_states: searcher.explored,
        solutions: searcher.solutions,
    }
}

/// Symbols the write spell may produce: the grid's static symbols minus the
/// empty marker, then any reserved letters not already present.
fn write_alphabet(grid: &Grid) -> Vec<char> {
    let mut alphabet: Vec<char> = grid.static_symbols().filter(|&s| s != EMPTY).collect();
    for letter in RESERVED_WRITE_LETTERS {
        if !alphabet.contains(&letter) {
            alphabet.push(letter);
        }
    }
    alphabet
}

/// All mutable search state, threaded through the recursion as one value.
struct Searcher<'a> {
    grid: &'a mut Grid,
    solution_limit: Option<usize>,
    write_alphabet: Vec<char>,
    explored: u64,
    /// Steps taken on the current path.
    steps: Vec<Step>,
    /// Symbols written by casts currently in effect that are not static on
    /// the grid; push/pop mirrors the write spell's apply/undo.
    introduced: Vec<char>,
    solutions: Vec<Solution>,
}

impl Searcher<'_> {
    fn search(&mut self, depth: usize) {
        if let Some(limit) = self.solution_limit {
            if self.solutions.len() >= limit {
                return;
            }
        }
        if self.grid.active_count() == 0 {
            self.solutions.push(Solution {
                steps: self.steps.clone(),
            });
            return;
        }
        if depth > MAX_DEPTH {
            return;
        }

        self.explored += 1;

        for candidate in find_possible_moves(self.grid) {
            if !self.grid.remove_batch(&candidate.blackout) {
                continue;
            }
            let trail: Vec<String> = candidate
                .trail
                .iter()
                .map(|&id| self.grid.cell(id).label().to_string())
                .collect();

            match candidate.spell {
                Spell::Lok => self.cast_lok(&trail, depth),
                Spell::Tlak => self.cast_tlak(&trail, depth),
                Spell::Ta => self.cast_ta(&trail, depth),
                Spell::Be => self.cast_be(&trail, depth),
                Spell::Lolo => self.cast_lolo(&trail, depth),
            }

            self.grid.undo_last_batch();
        }
    }

    /// LOK: drop any one still-active cell.
    fn cast_lok(&mut self, trail: &[String], depth: usize) {
        for id in 0..self.grid.cell_count() {
            if !self.grid.remove_batch(&[id]) {
                continue;
            }
            self.push_step(Spell::Lok, trail, StepAction::Drop {
                cell: self.grid.cell(id).label().to_string(),
            });
            self.search(depth + 1);
            self.steps.pop();
            self.grid.undo_last_batch();
        }
    }

    /// TLAK: drop a cell together with its right or down list neighbor.
    /// Left/up pairs are intentionally never proposed.
    fn cast_tlak(&mut self, trail: &[String], depth: usize) {
        for fst in 0..self.grid.cell_count() {
            if self.grid.cell(fst).is_removed() {
                continue;
            }
            for dir in [Direction::Right, Direction::Down] {
                let Some(snd) = self.grid.neighbor(fst, dir) else {
                    continue;
                };
                if !self.grid.remove_batch(&[fst, snd]) {
                    continue;
                }
                self.push_step(Spell::Tlak, trail, StepAction::DropPair {
                    cells: [
                        self.grid.cell(fst).label().to_string(),
                        self.grid.cell(snd).label().to_string(),
                    ],
                });
                self.search(depth + 1);
                self.steps.pop();
                self.grid.undo_last_batch();
            }
        }
    }

    /// TA: clear every active cell spelling one chosen symbol. Candidate
    /// symbols are the statically-placed ones plus any introduced by write
    /// casts currently in effect.
    fn cast_ta(&mut self, trail: &[String], depth: usize) {
        let mut symbols: Vec<char> = self.grid.static_symbols().collect();
        symbols.extend(self.introduced.iter().copied());
        for symbol in symbols {
            let batch = self.grid.active_cells_with_symbol(symbol);
            if !self.grid.remove_batch(&batch) {
                continue;
            }
            self.push_step(Spell::Ta, trail, StepAction::ClearSymbol { symbol });
            self.search(depth + 1);
            self.steps.pop();
            self.grid.undo_last_batch();
        }
    }

    /// BE: write one alphabet symbol onto one active, not-yet-written empty
    /// cell.
    fn cast_be(&mut self, trail: &[String], depth: usize) {
        for id in 0..self.grid.cell_count() {
            {
                let cell = self.grid.cell(id);
                if cell.is_removed() || cell.symbol() != EMPTY || cell.written().is_some() {
                    continue;
                }
            }
            for i in 0..self.write_alphabet.len() {
                let symbol = self.write_alphabet[i];
                self.grid.write_symbol(id, symbol);
                let introduced = !self.grid.has_static_symbol(symbol);
                if introduced {
                    self.introduced.push(symbol);
                }
                self.push_step(Spell::Be, trail, StepAction::Write {
                    cell: self.grid.cell(id).label().to_string(),
                    symbol,
                });
                self.search(depth + 1);
                self.steps.pop();
                if introduced {
                    self.introduced.pop();
                }
                self.grid.clear_written(id);
            }
        }
    }

    /// LOLO: clear every active cell on one chosen diagonal.
    fn cast_lolo(&mut self, trail: &[String], depth: usize) {
        for diagonal in 0..self.grid.diagonal_count() {
            let batch = self.grid.active_cells_on_diagonal(diagonal);
            if !self.grid.remove_batch(&batch) {
                continue;
            }
            self.push_step(Spell::Lolo, trail, StepAction::ClearDiagonal { diagonal });
            self.search(depth + 1);
            self.steps.pop();
            self.grid.undo_last_batch();
        }
    }

    fn push_step(&mut self, spell: Spell, trail: &[String], action: StepAction) {
        self.steps.push(Step {
            spell,
            trail: trail.to_vec(),
            action,
        });
    }
}
