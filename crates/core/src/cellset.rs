//! Insertion-ordered set of board cells.
//!
//! Match results, destroy sets and expansion closures are all sets of cells where
//! membership checks must be cheap and iteration order must be deterministic
//! (event order follows it). A bitmap over the grid plus an ordered list gives both.

use crate::types::Cell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    width: u8,
    height: u8,
    member: Vec<bool>,
    order: Vec<Cell>,
}

impl CellSet {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            member: vec![false; width as usize * height as usize],
            order: Vec::new(),
        }
    }

    fn slot(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x as u8 >= self.width || cell.y as u8 >= self.height {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Insert `cell`; returns false if it was already present.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let Some(slot) = self.slot(cell) else {
            panic!(
                "cell {} out of bounds for {}x{} set",
                cell, self.width, self.height
            );
        };
        if self.member[slot] {
            return false;
        }
        self.member[slot] = true;
        self.order.push(cell);
        true
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.slot(cell).map(|s| self.member[s]).unwrap_or(false)
    }

    /// Remove `cell`; returns false if it was absent.
    pub fn remove(&mut self, cell: Cell) -> bool {
        match self.slot(cell) {
            Some(slot) if self.member[slot] => {
                self.member[slot] = false;
                self.order.retain(|&c| c != cell);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.order
    }

    pub fn extend<I: IntoIterator<Item = Cell>>(&mut self, cells: I) {
        for c in cells {
            self.insert(c);
        }
    }

    pub fn clear(&mut self) {
        for c in self.order.drain(..) {
            let slot = c.y as usize * self.width as usize + c.x as usize;
            self.member[slot] = false;
        }
    }
}
