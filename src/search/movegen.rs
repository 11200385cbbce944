//! Trail discovery: enumerate every legal spell cast at the current grid
//! state.
//!
//! From each active start-letter cell the walk steps through the row/column
//! lists in one direction, growing the spelled word. A wildcard cell adds no
//! letter and forks the walk into the two perpendicular directions, so trails
//! may bend there (but never double back).

use crate::grid::{CellId, Direction, Grid};
use crate::spell::{self, Spell, MAX_TRAIL_CELLS, WILDCARD};

/// A legal cast discovered at the current grid state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCandidate {
    pub spell: Spell,
    /// The walked cells, wildcards included, in walk order.
    pub trail: Vec<CellId>,
    /// The trail minus wildcard cells: removed as one batch when the cast is
    /// applied.
    pub blackout: Vec<CellId>,
}

/// All legal casts, in discovery order: cell insertion order x direction
/// order x walk recursion order.
pub fn find_possible_moves(grid: &Grid) -> Vec<MoveCandidate> {
    let mut finder = TrailFinder {
        grid,
        walked: Vec::new(),
        found: Vec::new(),
    };

    for (id, cell) in grid.cells() {
        if cell.is_removed() {
            continue;
        }
        let symbol = cell.effective_symbol();
        if !spell::is_start_letter(symbol) {
            continue;
        }
        let mut spelled = String::from(symbol);
        for dir in Direction::ALL {
            finder.walk(id, dir, &mut spelled);
        }
    }

    finder.found
}

struct TrailFinder<'a> {
    grid: &'a Grid,
    walked: Vec<CellId>,
    found: Vec<MoveCandidate>,
}

impl TrailFinder<'_> {
    /// Continue a walk standing on `cell`, with `spelled` already including
    /// `cell`'s letter.
    fn walk(&mut self, cell: CellId, dir: Direction, spelled: &mut String) {
        if let Some(matched) = Spell::from_word(spelled) {
            let mut trail = self.walked.clone();
            trail.push(cell);
            let blackout = trail
                .iter()
                .copied()
                .filter(|&id| self.grid.cell(id).effective_symbol() != WILDCARD)
                .collect();
            self.found.push(MoveCandidate {
                spell: matched,
                trail,
                blackout,
            });
            return;
        }
        if !spell::is_proper_prefix(spelled) {
            return;
        }
        if self.walked.len() > MAX_TRAIL_CELLS {
            return;
        }
        let Some(next) = self.grid.neighbor(cell, dir) else {
            return;
        };

        self.walked.push(cell);
        let next_symbol = self.grid.cell(next).effective_symbol();
        let len_before = spelled.len();
        if next_symbol != WILDCARD {
            spelled.push(next_symbol);
        }

        self.walk(next, dir, spelled);
        if next_symbol == WILDCARD {
            for bent in dir.perpendicular() {
                self.walk(next, bent, spelled);
            }
        }

        spelled.truncate(len_before);
        self.walked.pop();
    }
}
