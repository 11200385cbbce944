//! Recorded solutions: one step per cast, replayable against a fresh grid.
//!
//! Steps store cell labels rather than internal ids so a serialized solution
//! stays meaningful on its own and can be replayed even against a separately
//! parsed copy of the same puzzle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{CellId, Grid};
use crate::spell::{Spell, WILDCARD};

/// The spell-specific payload of a step: what the cast consumed or wrote
/// beyond blacking out its own trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepAction {
    /// Single-drop: one chosen cell removed.
    Drop { cell: String },
    /// Pair-drop: a cell and its right or down list neighbor removed.
    DropPair { cells: [String; 2] },
    /// Symbol-clear: every active cell spelling `symbol` removed.
    ClearSymbol { symbol: char },
    /// Write: `symbol` written onto the empty cell `cell`.
    Write { cell: String, symbol: char },
    /// Diagonal-clear: every active cell with row + col == `diagonal`
    /// removed.
    ClearDiagonal { diagonal: usize },
}

/// One cast: the spell, the walked trail (cell labels, wildcards included),
/// and the cast's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub spell: Spell,
    pub trail: Vec<String>,
    pub action: StepAction,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.spell, self.trail.join(" -> "))?;
        match &self.action {
            StepAction::Drop { cell } => write!(f, ", drop {cell}"),
            StepAction::DropPair { cells } => write!(f, ", drop {} {}", cells[0], cells[1]),
            StepAction::ClearSymbol { symbol } => write!(f, ", clear '{symbol}'"),
            StepAction::Write { cell, symbol } => write!(f, ", write '{symbol}' at {cell}"),
            StepAction::ClearDiagonal { diagonal } => write!(f, ", clear diagonal {diagonal}"),
        }
    }
}

/// An ordered cast sequence whose cumulative effect empties the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub steps: Vec<Step>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// A step names a cell label the grid does not have.
    UnknownCell { step: usize, label: String },
    /// A step's removal batch removed nothing, so the recorded move was not
    /// legal at this point of the replay.
    IneffectiveStep { step: usize },
    /// All steps applied but active cells remain.
    NotCleared { remaining: usize },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::UnknownCell { step, label } => {
                write!(f, "step {step} names unknown cell {label}")
            }
            ReplayError::IneffectiveStep { step } => {
                write!(f, "step {step} removed no cells on replay")
            }
            ReplayError::NotCleared { remaining } => {
                write!(f, "solution replay left {remaining} active cell(s)")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

/// Re-apply a recorded solution to `grid`, erroring unless the grid is
/// driven to exactly zero active cells.
///
/// Each step's blackout set is re-derived from its trail the same way the
/// search derived it: trail cells whose effective symbol is the wildcard at
/// this point of the replay are left on the grid.
pub fn replay(grid: &mut Grid, solution: &Solution) -> Result<(), ReplayError> {
    for (i, step) in solution.steps.iter().enumerate() {
        let mut blackout: Vec<CellId> = Vec::with_capacity(step.trail.len());
        for label in &step.trail {
            let id = lookup(grid, i, label)?;
            if grid.cell(id).effective_symbol() != WILDCARD {
                blackout.push(id);
            }
        }
        if !grid.remove_batch(&blackout) {
            return Err(ReplayError::IneffectiveStep { step: i });
        }

        match &step.action {
            StepAction::Drop { cell } => {
                let id = lookup(grid, i, cell)?;
                if !grid.remove_batch(&[id]) {
                    return Err(ReplayError::IneffectiveStep { step: i });
                }
            }
            StepAction::DropPair { cells } => {
                let fst = lookup(grid, i, &cells[0])?;
                let snd = lookup(grid, i, &cells[1])?;
                if !grid.remove_batch(&[fst, snd]) {
                    return Err(ReplayError::IneffectiveStep { step: i });
                }
            }
            StepAction::ClearSymbol { symbol } => {
                let batch = grid.active_cells_with_symbol(*symbol);
                if !grid.remove_batch(&batch) {
                    return Err(ReplayError::IneffectiveStep { step: i });
                }
            }
            StepAction::Write { cell, symbol } => {
                let id = lookup(grid, i, cell)?;
                grid.write_symbol(id, *symbol);
            }
            StepAction::ClearDiagonal { diagonal } => {
                let batch = grid.active_cells_on_diagonal(*diagonal);
                if !grid.remove_batch(&batch) {
                    return Err(ReplayError::IneffectiveStep { step: i });
                }
            }
        }
    }

    match grid.active_count() {
        0 => Ok(()),
        remaining => Err(ReplayError::NotCleared { remaining }),
    }
}

fn lookup(grid: &Grid, step: usize, label: &str) -> Result<CellId, ReplayError> {
    grid.cell_by_label(label).ok_or_else(|| ReplayError::UnknownCell {
        step,
        label: label.to_string(),
    })
}
