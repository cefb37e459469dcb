//! Special pieces: bomb areas of effect and chain expansion.
//!
//! | Bomb | Shape | Cells |
//! |------|-------|-------|
//! | 4 | plus: center and 4 orthogonal neighbours | 5 |
//! | 5 | 5x5 square without its corners | 21 |
//! | 6 | `|dx|<=3, |dy|<=3, |dx|+|dy|<=4` | 37 |
//! | 7 | `|dx|<=4, |dy|<=4, |dx|+|dy|<=6` | 69 |
//!
//! A cart has no area and is never cleared by [`expand`]; only its own
//! activation removes it.

use std::collections::VecDeque;

use crate::board::Board;
use crate::cellset::CellSet;
use crate::types::{BombSize, Cell, SpecialKind};

/// Half-width of the bounding square of a bomb area.
fn radius(size: BombSize) -> i8 {
    match size {
        BombSize::Four => 1,
        BombSize::Five => 2,
        BombSize::Six => 3,
        BombSize::Seven => 4,
    }
}

fn in_area(size: BombSize, dx: i8, dy: i8) -> bool {
    let (ax, ay) = (dx.abs(), dy.abs());
    let r = radius(size);
    if ax > r || ay > r {
        return false;
    }
    match size {
        BombSize::Four => ax + ay <= 1,
        BombSize::Five => !(ax == 2 && ay == 2),
        BombSize::Six => ax + ay <= 4,
        BombSize::Seven => ax + ay <= 6,
    }
}

/// Offsets covered by a bomb, row by row from the bottom.
pub fn area_offsets(size: BombSize) -> impl Iterator<Item = (i8, i8)> {
    let r = radius(size);
    (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(move |&(dx, dy)| in_area(size, dx, dy))
}

/// In-bounds cells hit by a bomb of `size` centered on `center`.
pub fn area_cells(board: &Board, center: Cell, size: BombSize) -> impl Iterator<Item = Cell> + '_ {
    area_offsets(size)
        .map(move |(dx, dy)| center.offset(dx, dy))
        .filter(move |c| board.contains(*c))
}

/// Outcome of a chain expansion.
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Cells to clear: every reached cell that holds a non-cart piece.
    pub cleared: CellSet,
    /// Bombs that detonated, in trigger order.
    pub detonated: Vec<Cell>,
    /// Sum of the detonated bombs' charge values.
    pub charge: u32,
}

/// Close `seeds` under chain reaction.
///
/// Every reached bomb adds its area; newly reached bombs are queued in turn. A
/// cell is queued at most once, so chains always terminate.
pub fn expand(board: &Board, seeds: &CellSet) -> Expansion {
    let mut reached = CellSet::new(board.width(), board.height());
    let mut queue: VecDeque<Cell> = VecDeque::new();
    for c in seeds.iter() {
        if reached.insert(c) {
            queue.push_back(c);
        }
    }

    let mut detonated = Vec::new();
    let mut charge = 0u32;

    while let Some(cell) = queue.pop_front() {
        let Some(piece) = board.at(cell) else {
            continue;
        };
        let SpecialKind::Bomb(size) = piece.special else {
            continue;
        };
        detonated.push(cell);
        charge += size.charge_value();
        for hit in area_cells(board, cell, size) {
            if reached.insert(hit) {
                queue.push_back(hit);
            }
        }
    }

    let mut cleared = CellSet::new(board.width(), board.height());
    for c in reached.iter() {
        if board.at(c).map(|p| !p.is_cart()).unwrap_or(false) {
            cleared.insert(c);
        }
    }

    Expansion {
        cleared,
        detonated,
        charge,
    }
}
