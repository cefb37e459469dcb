//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds one [`Piece`].
//! Uses a flat vector for cache locality; dimensions are fixed at construction.
//! Coordinates: (x, y) with the origin at the bottom-left, y grows upward.
//!
//! The board knows nothing about holes. Level masks are tracked separately by
//! [`CellMask`](crate::mask::CellMask); a hole is simply a cell that is never filled.
//!
//! All coordinate access is bounds-checked and panics on violation: an
//! out-of-bounds access is a caller bug, not a game condition.

use std::fmt;

use thiserror::Error;

use crate::types::{Cell, Piece, MAX_BOARD_DIM};

/// Error returned by [`Board::parse`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("board text has no rows")]
    Empty,
    #[error("board is {width}x{height}, max side is {max}")]
    TooLarge { width: usize, height: usize, max: u8 },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid token {token:?} at row {row}, column {col}")]
    BadToken {
        row: usize,
        col: usize,
        token: String,
    },
}

/// The game board, flat storage in row-major order (`y * width + x`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// Create a new empty board
    ///
    /// # Panics
    ///
    /// Panics if a side is zero or larger than [`MAX_BOARD_DIM`].
    pub fn new(width: u8, height: u8) -> Self {
        assert!(
            (1..=MAX_BOARD_DIM).contains(&width) && (1..=MAX_BOARD_DIM).contains(&height),
            "board dimensions {}x{} outside 1..={}",
            width,
            height,
            MAX_BOARD_DIM
        );
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({}, {}) out of bounds for {}x{} board",
            x,
            y,
            self.width,
            self.height
        );
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check if position is inside the grid
    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && (x as u8) < self.width && (y as u8) < self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.in_bounds(cell.x, cell.y)
    }

    /// Get the piece at (x, y)
    pub fn get(&self, x: i8, y: i8) -> Option<Piece> {
        self.cells[self.index(x, y)]
    }

    /// Set cell at (x, y)
    pub fn set(&mut self, x: i8, y: i8, piece: Option<Piece>) {
        let idx = self.index(x, y);
        self.cells[idx] = piece;
    }

    pub fn at(&self, cell: Cell) -> Option<Piece> {
        self.get(cell.x, cell.y)
    }

    pub fn put(&mut self, cell: Cell, piece: Option<Piece>) {
        self.set(cell.x, cell.y, piece);
    }

    /// Remove and return the piece at `cell`.
    pub fn take(&mut self, cell: Cell) -> Option<Piece> {
        let idx = self.index(cell.x, cell.y);
        self.cells[idx].take()
    }

    /// Exchange the contents of two cells. No-op when `a == b`.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        let ia = self.index(a.x, a.y);
        let ib = self.index(b.x, b.y);
        self.cells.swap(ia, ib);
    }

    /// Raw cell storage (row-major), used for hashing and snapshots.
    pub fn cells(&self) -> &[Option<Piece>] {
        &self.cells
    }

    /// Every coordinate, column by column from the left, bottom-up inside a column.
    pub fn positions(&self) -> impl Iterator<Item = Cell> {
        let (w, h) = (self.width as i8, self.height as i8);
        (0..w).flat_map(move |x| (0..h).map(move |y| Cell::new(x, y)))
    }

    /// Every occupied cell with its piece, in [`positions`](Self::positions) order.
    pub fn pieces(&self) -> impl Iterator<Item = (Cell, Piece)> + '_ {
        self.positions()
            .filter_map(move |c| self.at(c).map(|piece| (c, piece)))
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Build a board from text rows, **top row first**.
    ///
    /// Tokens are whitespace separated: `.` or `#` for an empty cell, otherwise
    /// the notation of [`Piece::from_token`].
    ///
    /// ```
    /// use match3_core::Board;
    /// use match3_types::{BombSize, Piece};
    ///
    /// let board = Board::parse(&[
    ///     "0 1 .",
    ///     "2 B4:0 C:1",
    /// ]).unwrap();
    /// assert_eq!(board.width(), 3);
    /// assert_eq!(board.get(0, 1), Some(Piece::plain(0)));
    /// assert_eq!(board.get(1, 0), Some(Piece::bomb(0, BombSize::Four)));
    /// assert_eq!(board.get(2, 1), None);
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Board, BoardParseError> {
        let height = rows.len();
        if height == 0 {
            return Err(BoardParseError::Empty);
        }
        let width = rows[0].split_whitespace().count();
        if width == 0 {
            return Err(BoardParseError::Empty);
        }
        if width > MAX_BOARD_DIM as usize || height > MAX_BOARD_DIM as usize {
            return Err(BoardParseError::TooLarge {
                width,
                height,
                max: MAX_BOARD_DIM,
            });
        }

        let mut board = Board::new(width as u8, height as u8);
        for (row, line) in rows.iter().enumerate() {
            let y = (height - 1 - row) as i8;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != width {
                return Err(BoardParseError::RowWidth {
                    row,
                    expected: width,
                    found: tokens.len(),
                });
            }
            for (col, token) in tokens.into_iter().enumerate() {
                let piece = match token {
                    "." | "#" => None,
                    t => Some(Piece::from_token(t).ok_or_else(|| BoardParseError::BadToken {
                        row,
                        col,
                        token: t.to_string(),
                    })?),
                };
                board.set(col as i8, y, piece);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height as i8).rev() {
            for x in 0..self.width as i8 {
                if x > 0 {
                    f.write_str(" ")?;
                }
                match self.get(x, y) {
                    Some(p) => write!(f, "{}", p)?,
                    None => f.write_str(".")?,
                }
            }
            if y > 0 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
