//! Text ingestion: raw puzzle text into a constructed [`Grid`].
//!
//! One character per tile, spaces are blank positions, rows are padded to the
//! longest row. Parse failures are recoverable and surface before any search
//! begins.

use std::fmt;

use crate::grid::Grid;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input contained no non-blank lines at all.
    EmptyInput,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "no puzzle text in input"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse puzzle text into a grid.
///
/// Trailing whitespace is stripped per line and trailing blank lines are
/// discarded; interior blank lines stay as cell-free rows.
pub fn parse(input: &str) -> Result<Grid, ParseError> {
    let mut lines: Vec<&str> = input.lines().map(|l| l.trim_end()).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let ncols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rows = lines
        .iter()
        .map(|line| {
            let mut row: Vec<Option<char>> =
                line.chars().map(|ch| (ch != ' ').then_some(ch)).collect();
            row.resize(ncols, None);
            row
        })
        .collect();

    Ok(Grid::from_rows(rows))
}
