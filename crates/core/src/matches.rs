//! Match detection: runs of three or more identical plain pieces.
//!
//! Specials never seed or continue a run. Holes and empty cells break runs
//! naturally since they hold no piece.

use crate::board::Board;
use crate::cellset::CellSet;
use crate::types::{Cell, Piece};

#[inline]
fn plain_at(board: &Board, x: i8, y: i8) -> Option<Piece> {
    board.get(x, y).filter(|p| p.is_plain())
}

fn same_plain_triple(board: &Board, cells: [Cell; 3]) -> bool {
    let Some(first) = plain_at(board, cells[0].x, cells[0].y) else {
        return false;
    };
    cells[1..].iter().all(|c| {
        plain_at(board, c.x, c.y)
            .map(|p| p.color == first.color)
            .unwrap_or(false)
    })
}

/// Every cell that belongs to a horizontal or vertical run of 3+ same-colored plain pieces.
///
/// The result is a flat set; a cell in both a horizontal and a vertical run appears once.
pub fn find_matches(board: &Board) -> CellSet {
    let mut out = CellSet::new(board.width(), board.height());
    let (w, h) = (board.width() as i8, board.height() as i8);

    for x in 0..w {
        for y in 0..h {
            if x + 2 < w {
                let run = [Cell::new(x, y), Cell::new(x + 1, y), Cell::new(x + 2, y)];
                if same_plain_triple(board, run) {
                    out.extend(run);
                }
            }
            if y + 2 < h {
                let run = [Cell::new(x, y), Cell::new(x, y + 1), Cell::new(x, y + 2)];
                if same_plain_triple(board, run) {
                    out.extend(run);
                }
            }
        }
    }
    out
}

/// True if the board holds at least one run.
pub fn has_matches(board: &Board) -> bool {
    !find_matches(board).is_empty()
}
