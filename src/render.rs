//! Plain-text rendering of a board: the lattice of pegs with in-flight beans
//! marked, and the row of slot counts underneath.

use std::fmt::{self, Write as _};

use crate::machine::Board;

/// Field width used by `Board`'s `Display` impl.
pub const DEFAULT_FIELD_WIDTH: usize = 4;

/// Slot counts of `board` right-aligned in fields of `field_width`, no
/// trailing newline.
pub fn slot_row(board: &Board, field_width: usize) -> String {
    counts_row(&board.slot_counts(), field_width)
}

/// Same layout as [`slot_row`] for counts already taken off a board.
pub fn counts_row(counts: &[usize], field_width: usize) -> String {
    let mut out = String::new();
    for count in counts {
        let _ = write!(out, "{count:>field_width$}");
    }
    out
}

/// The whole machine as text. Each peg shows `1` if the in-flight bean of
/// that row sits on it, `0` otherwise; rows are indented into a triangle.
pub struct LatticeView<'a> {
    board: &'a Board,
    field_width: usize,
}

impl<'a> LatticeView<'a> {
    pub fn new(board: &'a Board, field_width: usize) -> Self {
        LatticeView { board, field_width }
    }

    /// Width of the first field of row `y_pos`
    fn indent(&self, y_pos: usize) -> usize {
        let slot_count = self.board.slot_count();
        let root = slot_count.saturating_sub(1) * self.field_width / 2 + self.field_width;
        root.saturating_sub(self.field_width / 2 * y_pos)
    }
}

impl fmt::Display for LatticeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y_pos in 0..self.board.slot_count() {
            let bean_x = self.board.in_flight_bean_x_pos(y_pos);
            for x_pos in 0..=y_pos {
                let width = if x_pos == 0 {
                    self.indent(y_pos)
                } else {
                    self.field_width
                };
                let peg = u8::from(bean_x == Some(x_pos));
                write!(f, "{peg:>width$}")?;
            }
            writeln!(f)?;
        }
        f.write_str(&slot_row(self.board, self.field_width))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        LatticeView::new(self, DEFAULT_FIELD_WIDTH).fmt(f)
    }
}
