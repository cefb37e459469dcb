//! Refill policy: colors for newly spawned pieces.
//!
//! A new piece avoids completing a 3-run with the two cells directly to its left
//! or directly below it. No deeper lookahead is done; cascades are allowed to
//! happen through other alignments.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::mask::CellMask;
use crate::rng::RandomSource;
use crate::types::{Cell, ColorId, Piece, MAX_COLORS};

/// Color shared by the two cells at `a` and `b`, if both hold a piece of one color.
fn pair_color(board: &Board, a: (i8, i8), b: (i8, i8)) -> Option<ColorId> {
    if !board.in_bounds(a.0, a.1) || !board.in_bounds(b.0, b.1) {
        return None;
    }
    let pa = board.get(a.0, a.1)?;
    let pb = board.get(b.0, b.1)?;
    (pa.color == pb.color).then_some(pa.color)
}

/// Pick a color for a new piece at (x, y).
///
/// Falls back to an unconstrained pick when every color is excluded, which only
/// happens with two colors.
pub fn choose_color<R: RandomSource>(
    board: &Board,
    x: i8,
    y: i8,
    color_count: u8,
    rng: &mut R,
) -> ColorId {
    let count = color_count.clamp(1, MAX_COLORS);
    let mut candidates: ArrayVec<ColorId, { MAX_COLORS as usize }> = (0..count).collect();

    if let Some(c) = pair_color(board, (x - 1, y), (x - 2, y)) {
        candidates.retain(|k| *k != c);
    }
    if let Some(c) = pair_color(board, (x, y - 1), (x, y - 2)) {
        candidates.retain(|k| *k != c);
    }

    match rng.choose(&candidates) {
        Some(&c) => c,
        None => rng.next_range(count as u32) as ColorId,
    }
}

/// Fill `spawns` in order with new plain pieces. Returns what was placed.
pub fn refill<R: RandomSource>(
    board: &mut Board,
    spawns: &[Cell],
    color_count: u8,
    rng: &mut R,
) -> Vec<(Cell, Piece)> {
    let mut placed = Vec::with_capacity(spawns.len());
    for &cell in spawns {
        let color = choose_color(board, cell.x, cell.y, color_count, rng);
        let piece = Piece::plain(color);
        board.put(cell, Some(piece));
        placed.push((cell, piece));
    }
    placed
}

/// Fill every existing cell of an empty board, bottom-up in each column, left to right.
pub fn fill_board<R: RandomSource>(board: &mut Board, mask: &CellMask, color_count: u8, rng: &mut R) {
    let cells: Vec<Cell> = board.positions().filter(|&c| mask.has(c)).collect();
    refill(board, &cells, color_count, rng);
}
