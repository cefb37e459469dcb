//! Gravity: hole-aware, segment-local column compaction.
//!
//! Each column is split into maximal runs of existing cells (segments). Pieces
//! fall inside their own segment only; a hole stops everything above it.

use crate::board::Board;
use crate::mask::CellMask;
use crate::types::{Cell, Move};

/// Result of one gravity pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityPlan {
    /// Every piece whose row changed, in application order.
    pub moves: Vec<Move>,
    /// Empty cells left at the top of each segment, column by column, bottom-up.
    pub spawns: Vec<Cell>,
}

impl GravityPlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.spawns.is_empty()
    }
}

/// Compact every segment toward its lowest row, mutating `board`.
pub fn apply_gravity(board: &mut Board, mask: &CellMask) -> GravityPlan {
    let mut plan = GravityPlan::default();
    let (w, h) = (board.width() as i8, board.height() as i8);

    for x in 0..w {
        let mut y = 0i8;
        while y < h {
            if !mask.has_cell(x, y) {
                y += 1;
                continue;
            }
            let start = y;
            while y < h && mask.has_cell(x, y) {
                y += 1;
            }
            compact_segment(board, x, start, y, &mut plan);
        }
    }
    plan
}

fn compact_segment(board: &mut Board, x: i8, start: i8, end: i8, plan: &mut GravityPlan) {
    let mut write = start;
    for read in start..end {
        let from = Cell::new(x, read);
        let Some(piece) = board.take(from) else {
            continue;
        };
        let to = Cell::new(x, write);
        board.put(to, Some(piece));
        if read != write {
            plan.moves.push(Move { from, to });
        }
        write += 1;
    }
    plan.spawns.extend((write..end).map(|y| Cell::new(x, y)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    #[test]
    fn full_column_is_untouched() {
        let mut board = Board::parse(&["1", "2", "3"]).unwrap();
        let before = board.clone();
        let plan = apply_gravity(&mut board, &CellMask::full(1, 3));
        assert!(plan.is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn pieces_fall_preserving_order() {
        let mut board = Board::parse(&["4", ".", "5", ".", "."]).unwrap();
        let plan = apply_gravity(&mut board, &CellMask::full(1, 5));

        assert_eq!(board.get(0, 0), Some(Piece::plain(5)));
        assert_eq!(board.get(0, 1), Some(Piece::plain(4)));
        assert_eq!(
            plan.moves,
            vec![
                Move {
                    from: Cell::new(0, 2),
                    to: Cell::new(0, 0)
                },
                Move {
                    from: Cell::new(0, 4),
                    to: Cell::new(0, 1)
                },
            ]
        );
        assert_eq!(
            plan.spawns,
            vec![Cell::new(0, 2), Cell::new(0, 3), Cell::new(0, 4)]
        );
    }

    #[test]
    fn hole_splits_column_into_segments() {
        // y=4 top .. y=0 bottom; hole at y=2
        let rows = ["1", ".", "#", "2", "."];
        let mut board = Board::parse(&rows).unwrap();
        let mask = CellMask::from_board_text(&rows);
        let plan = apply_gravity(&mut board, &mask);

        // lower segment y=0..2: piece 2 drops from y=1 to y=0
        assert_eq!(board.get(0, 0), Some(Piece::plain(2)));
        assert_eq!(board.get(0, 1), None);
        // hole stays empty, upper segment y=3..5: piece 1 drops from y=4 to y=3
        assert_eq!(board.get(0, 2), None);
        assert_eq!(board.get(0, 3), Some(Piece::plain(1)));
        assert_eq!(plan.moves.len(), 2);
        assert_eq!(plan.spawns, vec![Cell::new(0, 1), Cell::new(0, 4)]);
    }

    #[test]
    fn columns_are_independent() {
        let mut board = Board::parse(&["1 .", ". 2"]).unwrap();
        let plan = apply_gravity(&mut board, &CellMask::full(2, 2));
        assert_eq!(board.get(0, 0), Some(Piece::plain(1)));
        assert_eq!(board.get(1, 0), Some(Piece::plain(2)));
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.spawns, vec![Cell::new(0, 1), Cell::new(1, 1)]);
    }
}
