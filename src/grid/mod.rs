//! The tile grid: a sparse 2D arrangement of cells with O(1) adjacency,
//! batched removal, and exact restoration for backtracking.
//!
//! Every row and column is a circular doubly-linked list over its active
//! cells, anchored by a sentinel head that is never a cell. The lists live in
//! an index-based arena: cells and sentinels share one flat index space and
//! adjacency is four parallel vectors of neighbor indices, so removal and
//! restoration are plain index writes.
//!
//! Removal unlinks a cell but leaves the cell's own stored links untouched;
//! restoration reads them back and relinks, which is only sound when batches
//! are undone in exact reverse order of removal. [`Grid::remove_batch`] and
//! [`Grid::undo_last_batch`] enforce that pairing with a stack of batch
//! sizes.

pub mod cell;

use std::fmt;

use rustc_hash::FxHashMap;

pub use cell::{Cell, CellId, Direction};

use crate::spell::EMPTY;

/// The cell matrix. Built once from a parsed tile layout; all later mutation
/// is remove/restore pairs (and dynamic symbol writes) issued by the search.
#[derive(Debug, Clone)]
pub struct Grid {
    nrows: usize,
    ncols: usize,
    /// All cells in insertion (row-major) order. `CellId` indexes this.
    cells: Vec<Cell>,
    /// Cell id per grid position, row-major; `None` for blank positions.
    slots: Vec<Option<CellId>>,
    // arena links; indices < cells.len() are cells, then row heads, then
    // column heads
    left: Vec<usize>,
    right: Vec<usize>,
    up: Vec<usize>,
    down: Vec<usize>,
    active: usize,
    /// Static symbol -> cells constructed with that symbol, in first-seen
    /// order. Indexes cell identity; consumers filter by the removed flag.
    symbol_index: Vec<(char, Vec<CellId>)>,
    symbol_pos: FxHashMap<char, usize>,
    /// Diagonal value (row + col) -> cells on that diagonal.
    diag_index: Vec<Vec<CellId>>,
    label_index: FxHashMap<String, CellId>,
    /// Ids in removal order, across all batches.
    removal_log: Vec<CellId>,
    /// Actual removal count per batch, most recent last.
    batch_sizes: Vec<usize>,
}

impl Grid {
    /// Build a grid from a rectangular matrix of optional tile symbols
    /// (`None` = blank position).
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not rectangular, or if the constructed
    /// row/column lists fail the wellformedness pass (a construction bug,
    /// never an input error).
    pub fn from_rows(rows: Vec<Vec<Option<char>>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());

        let mut cells: Vec<Cell> = Vec::new();
        let mut slots = vec![None; nrows * ncols];
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), ncols, "tile matrix is not rectangular");
            for (c, slot) in row.iter().enumerate() {
                if let Some(symbol) = slot {
                    slots[r * ncols + c] = Some(cells.len());
                    cells.push(Cell::new(r, c, *symbol));
                }
            }
        }

        let ncells = cells.len();
        let nodes = ncells + nrows + ncols;
        let mut left = vec![usize::MAX; nodes];
        let mut right = vec![usize::MAX; nodes];
        let mut up = vec![usize::MAX; nodes];
        let mut down = vec![usize::MAX; nodes];

        let row_head = |r: usize| ncells + r;
        let col_head = |c: usize| ncells + nrows + c;

        // Thread the circular lists in row-major order.
        let mut rows_prev: Vec<usize> = (0..nrows).map(row_head).collect();
        let mut cols_prev: Vec<usize> = (0..ncols).map(col_head).collect();
        for (id, cell) in cells.iter().enumerate() {
            let (r, c) = (cell.row, cell.col);
            right[rows_prev[r]] = id;
            left[id] = rows_prev[r];
            rows_prev[r] = id;

            down[cols_prev[c]] = id;
            up[id] = cols_prev[c];
            cols_prev[c] = id;
        }
        for r in 0..nrows {
            right[rows_prev[r]] = row_head(r);
            left[row_head(r)] = rows_prev[r];
        }
        for c in 0..ncols {
            down[cols_prev[c]] = col_head(c);
            up[col_head(c)] = cols_prev[c];
        }

        let mut symbol_index: Vec<(char, Vec<CellId>)> = Vec::new();
        let mut symbol_pos: FxHashMap<char, usize> = FxHashMap::default();
        for (id, cell) in cells.iter().enumerate() {
            let symbol = cell.effective_symbol();
            match symbol_pos.get(&symbol) {
                Some(&i) => symbol_index[i].1.push(id),
                None => {
                    symbol_pos.insert(symbol, symbol_index.len());
                    symbol_index.push((symbol, vec![id]));
                }
            }
        }

        let ndiags = if nrows + ncols == 0 { 0 } else { nrows + ncols - 1 };
        let mut diag_index = vec![Vec::new(); ndiags];
        for (id, cell) in cells.iter().enumerate() {
            diag_index[cell.diagonal()].push(id);
        }

        let label_index = cells
            .iter()
            .enumerate()
            .map(|(id, c)| (c.label.clone(), id))
            .collect();

        let grid = Self {
            nrows,
            ncols,
            active: ncells,
            cells,
            slots,
            left,
            right,
            up,
            down,
            symbol_index,
            symbol_pos,
            diag_index,
            label_index,
            removal_log: Vec::new(),
            batch_sizes: Vec::new(),
        };
        grid.verify_lists();
        grid
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    /// All cells in insertion order, active or not.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate()
    }

    #[inline]
    fn row_head(&self, r: usize) -> usize {
        self.cells.len() + r
    }

    #[inline]
    fn col_head(&self, c: usize) -> usize {
        self.cells.len() + self.nrows + c
    }

    #[inline]
    fn as_cell(&self, node: usize) -> Option<CellId> {
        (node < self.cells.len()).then_some(node)
    }

    /// The adjacent active cell in `dir`, or `None` when the step lands on
    /// the row/column sentinel. Must be called on an active cell; a removed
    /// cell keeps its pre-removal links for restoration.
    #[inline]
    pub fn neighbor(&self, id: CellId, dir: Direction) -> Option<CellId> {
        let node = match dir {
            Direction::Right => self.right[id],
            Direction::Down => self.down[id],
            Direction::Left => self.left[id],
            Direction::Up => self.up[id],
        };
        self.as_cell(node)
    }

    /// Remove every not-already-removed cell in `batch` from its row and
    /// column lists. Duplicates and already-removed cells are silently
    /// skipped. Returns `true` and records one undo entry iff at least one
    /// cell was actually removed; returns `false` with the grid untouched
    /// otherwise, so callers can treat a no-op batch as "this move is
    /// unavailable now".
    pub fn remove_batch(&mut self, batch: &[CellId]) -> bool {
        let mut removed = 0usize;
        for &id in batch {
            if self.cells[id].removed {
                continue;
            }
            let (l, r) = (self.left[id], self.right[id]);
            self.right[l] = r;
            self.left[r] = l;
            let (u, d) = (self.up[id], self.down[id]);
            self.down[u] = d;
            self.up[d] = u;

            self.cells[id].removed = true;
            self.removal_log.push(id);
            self.active -= 1;
            removed += 1;
        }
        if removed == 0 {
            return false;
        }
        self.batch_sizes.push(removed);
        true
    }

    /// Undo the most recent effective [`Grid::remove_batch`], restoring its
    /// cells in reverse removal order.
    ///
    /// # Panics
    ///
    /// Panics if no batch is outstanding: that is a remove/restore imbalance
    /// in the caller, and continuing would corrupt the grid.
    pub fn undo_last_batch(&mut self) {
        let Some(count) = self.batch_sizes.pop() else {
            panic!("undo_last_batch called with no removal batch outstanding");
        };
        for _ in 0..count {
            let Some(id) = self.removal_log.pop() else {
                panic!("removal log shorter than recorded batch sizes");
            };
            // the removed cell's own links still name its old neighbors
            let (l, r) = (self.left[id], self.right[id]);
            self.right[l] = id;
            self.left[r] = id;
            let (u, d) = (self.up[id], self.down[id]);
            self.down[u] = id;
            self.up[d] = id;

            self.cells[id].removed = false;
            self.active += 1;
        }
    }

    /// Assign a dynamic symbol to an empty cell (write spell only).
    pub fn write_symbol(&mut self, id: CellId, symbol: char) {
        debug_assert_eq!(self.cells[id].symbol, EMPTY, "dynamic write on a non-empty cell");
        debug_assert!(self.cells[id].written.is_none(), "dynamic write over an existing write");
        self.cells[id].written = Some(symbol);
    }

    /// Clear a dynamic symbol written by [`Grid::write_symbol`].
    pub fn clear_written(&mut self, id: CellId) {
        self.cells[id].written = None;
    }

    /// Statically-placed symbols in first-seen (row-major) order.
    pub fn static_symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbol_index.iter().map(|(s, _)| *s)
    }

    #[inline]
    pub fn has_static_symbol(&self, symbol: char) -> bool {
        self.symbol_pos.contains_key(&symbol)
    }

    /// Active cells whose effective symbol equals `symbol`: the symbol's
    /// static index entry plus any active empty cells dynamically written to
    /// match.
    pub fn active_cells_with_symbol(&self, symbol: char) -> Vec<CellId> {
        let mut out = Vec::new();
        if let Some(&i) = self.symbol_pos.get(&symbol) {
            out.extend(self.symbol_index[i].1.iter().copied().filter(|&id| {
                let c = &self.cells[id];
                !c.removed && c.effective_symbol() == symbol
            }));
        }
        if symbol != EMPTY {
            out.extend(self.cells.iter().enumerate().filter_map(|(id, c)| {
                (!c.removed && c.symbol == EMPTY && c.written == Some(symbol)).then_some(id)
            }));
        }
        out
    }

    /// Number of diagonal values the grid spans (`nrows + ncols - 1`).
    #[inline]
    pub fn diagonal_count(&self) -> usize {
        self.diag_index.len()
    }

    /// Active cells on diagonal `d` (row + col == d).
    pub fn active_cells_on_diagonal(&self, d: usize) -> Vec<CellId> {
        self.diag_index[d]
            .iter()
            .copied()
            .filter(|&id| !self.cells[id].removed)
            .collect()
    }

    pub fn cell_by_label(&self, label: &str) -> Option<CellId> {
        self.label_index.get(label).copied()
    }

    /// Current forward traversal order of row `r`.
    pub fn row_order(&self, r: usize) -> Vec<CellId> {
        self.ring_order(self.row_head(r), &self.right)
    }

    /// Current forward traversal order of column `c`.
    pub fn col_order(&self, c: usize) -> Vec<CellId> {
        self.ring_order(self.col_head(c), &self.down)
    }

    fn ring_order(&self, head: usize, next: &[usize]) -> Vec<CellId> {
        let mut out = Vec::new();
        let mut node = next[head];
        while node != head {
            out.push(node);
            node = next[node];
        }
        out
    }

    /// Wellformedness pass run once at construction: every row and column
    /// ring must return to its head exactly once going forward, and every
    /// back link must name the exact predecessor.
    fn verify_lists(&self) {
        for r in 0..self.nrows {
            verify_ring(
                &self.right,
                &self.left,
                self.row_head(r),
                self.cells.len(),
                "row",
                r,
            );
        }
        for c in 0..self.ncols {
            verify_ring(
                &self.down,
                &self.up,
                self.col_head(c),
                self.cells.len(),
                "column",
                c,
            );
        }
    }
}

fn verify_ring(next: &[usize], prev: &[usize], head: usize, max_len: usize, what: &str, index: usize) {
    let mut seen = Vec::new();
    let mut node = next[head];
    while node != head {
        seen.push(node);
        if seen.len() > max_len {
            panic!("{what} {index} list does not cycle back to its head");
        }
        node = next[node];
    }

    let mut expected_prev = head;
    for &n in &seen {
        if prev[n] != expected_prev {
            panic!("{what} {index} list back link of node {n} does not name its predecessor");
        }
        expected_prev = n;
    }
    if prev[head] != expected_prev {
        panic!("{what} {index} list head back link does not close the ring");
    }
}

impl fmt::Display for Grid {
    /// Column-letter header, 1-based row numbers, active cells' effective
    /// symbols.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..self.ncols {
            write!(f, " {}", char::from_u32('A' as u32 + c as u32).unwrap_or('?'))?;
        }
        writeln!(f)?;
        for r in 0..self.nrows {
            write!(f, "{:>2} ", r + 1)?;
            for c in 0..self.ncols {
                match self.slots[r * self.ncols + c] {
                    Some(id) if !self.cells[id].removed => {
                        write!(f, " {}", self.cells[id].effective_symbol())?
                    }
                    _ => write!(f, "  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let ncols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let matrix = rows
            .iter()
            .map(|r| {
                let mut row: Vec<Option<char>> =
                    r.chars().map(|ch| (ch != ' ').then_some(ch)).collect();
                row.resize(ncols, None);
                row
            })
            .collect();
        Grid::from_rows(matrix)
    }

    fn labels(grid: &Grid, ids: &[CellId]) -> Vec<String> {
        ids.iter().map(|&id| grid.cell(id).label().to_string()).collect()
    }

    #[test]
    fn construction_links_skip_blanks() {
        let grid = grid_from(&["L K", "O O"]);
        assert_eq!(grid.cell_count(), 4);
        assert_eq!(grid.active_count(), 4);
        assert_eq!(labels(&grid, &grid.row_order(0)), ["A1", "C1"]);
        assert_eq!(labels(&grid, &grid.row_order(1)), ["A2", "C2"]);
        assert_eq!(labels(&grid, &grid.col_order(0)), ["A1", "A2"]);
        assert!(grid.col_order(1).is_empty());
        assert_eq!(labels(&grid, &grid.col_order(2)), ["C1", "C2"]);

        // blanks never existed, so the row list jumps over them
        let a1 = grid.cell_by_label("A1").unwrap();
        let c1 = grid.cell_by_label("C1").unwrap();
        assert_eq!(grid.neighbor(a1, Direction::Right), Some(c1));
        assert_eq!(grid.neighbor(a1, Direction::Left), None);
        assert_eq!(grid.neighbor(c1, Direction::Down), None);
    }

    #[test]
    fn removal_splices_and_undo_restores_exactly() {
        let mut grid = grid_from(&["LOK", "TAB"]);
        let before_rows: Vec<_> = (0..2).map(|r| grid.row_order(r)).collect();
        let before_cols: Vec<_> = (0..3).map(|c| grid.col_order(c)).collect();

        let b1 = grid.cell_by_label("B1").unwrap();
        let a1 = grid.cell_by_label("A1").unwrap();
        let c1 = grid.cell_by_label("C1").unwrap();
        assert!(grid.remove_batch(&[b1]));
        assert_eq!(grid.active_count(), 5);
        assert_eq!(grid.neighbor(a1, Direction::Right), Some(c1));
        assert_eq!(labels(&grid, &grid.col_order(1)), ["B2"]);

        // second, overlapping batch: the already-removed cell is skipped
        let b2 = grid.cell_by_label("B2").unwrap();
        assert!(grid.remove_batch(&[b1, b2, b2]));
        assert_eq!(grid.active_count(), 4);
        assert!(grid.col_order(1).is_empty());

        grid.undo_last_batch();
        assert_eq!(grid.active_count(), 5);
        grid.undo_last_batch();
        assert_eq!(grid.active_count(), 6);
        for r in 0..2 {
            assert_eq!(grid.row_order(r), before_rows[r]);
        }
        for c in 0..3 {
            assert_eq!(grid.col_order(c), before_cols[c]);
        }
    }

    #[test]
    fn no_op_batch_reports_unavailable() {
        let mut grid = grid_from(&["LO"]);
        let a1 = grid.cell_by_label("A1").unwrap();
        assert!(grid.remove_batch(&[a1]));
        assert!(!grid.remove_batch(&[a1]));
        assert!(!grid.remove_batch(&[]));
        // exactly one batch outstanding
        grid.undo_last_batch();
        assert_eq!(grid.active_count(), 2);
    }

    #[test]
    #[should_panic(expected = "no removal batch outstanding")]
    fn undo_without_batch_is_fatal() {
        let mut grid = grid_from(&["LO"]);
        grid.undo_last_batch();
    }

    #[test]
    fn deep_remove_undo_round_trip_is_identity() {
        let mut grid = grid_from(&["LOKX", "TA_B", "EOLX"]);
        let rows: Vec<_> = (0..3).map(|r| grid.row_order(r)).collect();
        let cols: Vec<_> = (0..4).map(|c| grid.col_order(c)).collect();

        let ids: Vec<CellId> = (0..grid.cell_count()).collect();
        assert!(grid.remove_batch(&ids[0..3]));
        assert!(grid.remove_batch(&ids[3..4]));
        assert!(grid.remove_batch(&ids[4..10]));
        assert!(grid.remove_batch(&ids[10..]));
        assert_eq!(grid.active_count(), 0);

        grid.undo_last_batch();
        grid.undo_last_batch();
        grid.undo_last_batch();
        grid.undo_last_batch();

        assert_eq!(grid.active_count(), grid.cell_count());
        for (r, order) in rows.iter().enumerate() {
            assert_eq!(&grid.row_order(r), order);
        }
        for (c, order) in cols.iter().enumerate() {
            assert_eq!(&grid.col_order(c), order);
        }
    }

    #[test]
    fn symbol_index_keeps_first_seen_order_and_identity() {
        let mut grid = grid_from(&["LOL", "_O_"]);
        let symbols: Vec<char> = grid.static_symbols().collect();
        assert_eq!(symbols, ['L', 'O', '_']);

        let l_cells = grid.active_cells_with_symbol('L');
        assert_eq!(labels(&grid, &l_cells), ["A1", "C1"]);

        // removal does not shrink the index, only the filtered view
        let a1 = grid.cell_by_label("A1").unwrap();
        grid.remove_batch(&[a1]);
        assert_eq!(labels(&grid, &grid.active_cells_with_symbol('L')), ["C1"]);
        grid.undo_last_batch();

        // a written empty matches its written symbol, and stops matching '_'
        let a2 = grid.cell_by_label("A2").unwrap();
        grid.write_symbol(a2, 'L');
        assert_eq!(
            labels(&grid, &grid.active_cells_with_symbol('L')),
            ["A1", "C1", "A2"]
        );
        assert_eq!(labels(&grid, &grid.active_cells_with_symbol('_')), ["C2"]);
        grid.clear_written(a2);
        assert_eq!(labels(&grid, &grid.active_cells_with_symbol('_')), ["A2", "C2"]);
    }

    #[test]
    fn diagonals_group_by_row_plus_col() {
        let grid = grid_from(&["LO", "KT"]);
        assert_eq!(grid.diagonal_count(), 3);
        assert_eq!(labels(&grid, &grid.active_cells_on_diagonal(0)), ["A1"]);
        assert_eq!(labels(&grid, &grid.active_cells_on_diagonal(1)), ["B1", "A2"]);
        assert_eq!(labels(&grid, &grid.active_cells_on_diagonal(2)), ["B2"]);
    }

    #[test]
    fn display_prints_header_rows_and_active_cells() {
        let mut grid = grid_from(&["LO", " K"]);
        assert_eq!(format!("{grid}"), "    A B\n 1  L O\n 2    K\n");
        let a1 = grid.cell_by_label("A1").unwrap();
        grid.remove_batch(&[a1]);
        assert_eq!(format!("{grid}"), "    A B\n 1    O\n 2    K\n");
    }
}
