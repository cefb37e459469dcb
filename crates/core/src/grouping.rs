//! Match grouping: split matched cells into same-color 4-connected islands.
//!
//! The flood fill only walks cells already in the match set, so a group never
//! pulls in unmatched or special pieces. Group size decides bomb promotion.

use std::collections::VecDeque;

use crate::board::Board;
use crate::cellset::CellSet;
use crate::types::{BombSize, Cell, ColorId};

/// One island of matched cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub color: ColorId,
    /// Flood-fill order; `cells[0]` is the seed.
    pub cells: Vec<Cell>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Bomb this group promotes into, if it is large enough.
    pub fn bomb_size(&self) -> Option<BombSize> {
        BombSize::from_group_len(self.len())
    }

    /// Preferred bomb cell: the first of `preferred` inside the group, else the seed.
    pub fn pivot(&self, preferred: &[Cell]) -> Cell {
        preferred
            .iter()
            .copied()
            .find(|&c| self.contains(c))
            .unwrap_or(self.cells[0])
    }
}

/// Group `matches` into maximal same-color islands, in match-set order.
pub fn group_matches(board: &Board, matches: &CellSet) -> Vec<MatchGroup> {
    let mut visited = CellSet::new(board.width(), board.height());
    let mut groups = Vec::new();
    let mut queue = VecDeque::new();

    for seed in matches.iter() {
        if visited.contains(seed) {
            continue;
        }
        let Some(piece) = board.at(seed) else {
            continue;
        };

        let mut cells = Vec::new();
        visited.insert(seed);
        queue.push_back(seed);

        while let Some(c) = queue.pop_front() {
            cells.push(c);
            for n in c.neighbors() {
                if !matches.contains(n) || visited.contains(n) {
                    continue;
                }
                if board.at(n).map(|p| p.color) != Some(piece.color) {
                    continue;
                }
                visited.insert(n);
                queue.push_back(n);
            }
        }

        groups.push(MatchGroup {
            color: piece.color,
            cells,
        });
    }
    groups
}
