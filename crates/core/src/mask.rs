//! Level mask: which grid cells exist.
//!
//! A hole never holds a piece, never matches and blocks falling across it.

use thiserror::Error;

use crate::types::Cell;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("mask row {row} has invalid character {found:?} at column {col} (expected '0' or '1')")]
    BadChar { row: usize, col: usize, found: char },
    #[error("mask has {rows} rows but the board is only {height} high")]
    TooManyRows { rows: usize, height: u8 },
}

/// Existence predicate over a `width x height` grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellMask {
    width: u8,
    height: u8,
    exists: Vec<bool>,
}

impl CellMask {
    /// Every cell exists.
    pub fn full(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            exists: vec![true; width as usize * height as usize],
        }
    }

    /// Build from level mask rows.
    ///
    /// `rows[y]` describes row `y` (bottom row first); character `x` is `'1'` for an
    /// existing cell and `'0'` for a hole. Missing rows and characters mean the cell
    /// exists. Characters past `width` are ignored.
    pub fn from_rows<S: AsRef<str>>(width: u8, height: u8, rows: &[S]) -> Result<Self, MaskError> {
        if rows.len() > height as usize {
            return Err(MaskError::TooManyRows {
                rows: rows.len(),
                height,
            });
        }
        let mut mask = Self::full(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                let exists = match ch {
                    '1' => true,
                    '0' => false,
                    found => {
                        return Err(MaskError::BadChar {
                            row: y,
                            col: x,
                            found,
                        })
                    }
                };
                if x < width as usize {
                    mask.exists[y * width as usize + x] = exists;
                }
            }
        }
        Ok(mask)
    }

    /// Build from the board fixture notation (top row first), `#` marks a hole.
    pub fn from_board_text(rows: &[&str]) -> Self {
        let height = rows.len() as u8;
        let width = rows
            .first()
            .map(|r| r.split_whitespace().count())
            .unwrap_or(0) as u8;
        let mut mask = Self::full(width, height);
        for (row, line) in rows.iter().enumerate() {
            let y = height as usize - 1 - row;
            for (x, token) in line.split_whitespace().enumerate() {
                if token == "#" && x < width as usize {
                    mask.exists[y * width as usize + x] = false;
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// True if (x, y) is inside the grid and not a hole.
    pub fn has_cell(&self, x: i8, y: i8) -> bool {
        if x < 0 || y < 0 || x as u8 >= self.width || y as u8 >= self.height {
            return false;
        }
        self.exists[y as usize * self.width as usize + x as usize]
    }

    pub fn has(&self, cell: Cell) -> bool {
        self.has_cell(cell.x, cell.y)
    }

    pub fn hole_count(&self) -> usize {
        self.exists.iter().filter(|&&e| !e).count()
    }
}
