//! Exhaustive solver for LOK word-spell grid puzzles.
//!
//! Tiles carry letters; a cast walks adjacent tiles spelling one of five
//! fixed spell words (`LOK`, `TLAK`, `TA`, `BE`, `LOLO`) and then consumes or
//! mutates tiles as its side effect. The solver searches, depth-bounded and
//! with exact mutation/undo symmetry, for cast sequences that remove every
//! tile.
//!
//! Pipeline: [`parse`] turns puzzle text into a [`grid::Grid`];
//! [`search::solve`] produces a [`search::SolveReport`] of [`solution`]
//! records, which can be re-verified with [`solution::replay`].

pub mod grid;
pub mod parse;
pub mod search;
pub mod solution;
pub mod spell;
