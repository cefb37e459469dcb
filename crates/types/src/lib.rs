//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, gesture routing, AI protocol).
//!
//! # Coordinates
//!
//! Cells are addressed as `(x, y)` with the origin at the **bottom-left** corner:
//!
//! - `x` grows to the right, `0..width`
//! - `y` grows upward, `0..height`
//! - gravity moves pieces toward decreasing `y`
//!
//! # Level Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 6 | Board columns |
//! | `DEFAULT_HEIGHT` | 6 | Board rows |
//! | `DEFAULT_MAX_MOVES` | 20 | Move budget per level |
//! | `DEFAULT_TARGET_SCORE` | 500 | Score needed to win a level without goals |
//! | `DEFAULT_POINTS_PER_GEM` | 10 | Points per destroyed piece |
//! | `DEFAULT_COLOR_COUNT` | 5 | Distinct piece colors |
//! | `DEFAULT_CART_CHARGE_MAX` | 50 | Charge needed to spawn one cart |
//!
//! # Special Pieces
//!
//! | Special | Created from | Charge value |
//! |---------|--------------|--------------|
//! | `Bomb(Four)` | group of 4 | 12 |
//! | `Bomb(Five)` | group of 5 | 20 |
//! | `Bomb(Six)` | group of 6 | 32 |
//! | `Bomb(Seven)` | group of 7+ | 45 |
//! | `Cart` | full charge meter | 0 |
//!
//! # Examples
//!
//! ```
//! use match3_types::{BombSize, Cell, Piece, SpecialKind};
//!
//! let plain = Piece::plain(2);
//! assert!(plain.is_plain());
//!
//! let bomb = Piece::bomb(2, BombSize::from_group_len(9).unwrap());
//! assert_eq!(bomb.special, SpecialKind::Bomb(BombSize::Seven));
//! assert_eq!(bomb.to_string(), "B7:2");
//!
//! assert!(Cell::new(1, 1).is_adjacent(Cell::new(1, 2)));
//! assert!(!Cell::new(1, 1).is_adjacent(Cell::new(2, 2)));
//! ```

use std::fmt;

/// Default board width in cells
pub const DEFAULT_WIDTH: u8 = 6;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u8 = 6;

/// Largest supported board side (coordinates must fit in `i8`)
pub const MAX_BOARD_DIM: u8 = 64;

/// Default move budget
pub const DEFAULT_MAX_MOVES: u32 = 20;

/// Default score target for levels without explicit goals
pub const DEFAULT_TARGET_SCORE: u32 = 500;

/// Default points awarded per destroyed piece
pub const DEFAULT_POINTS_PER_GEM: u32 = 10;

/// Default number of piece colors
pub const DEFAULT_COLOR_COUNT: u8 = 5;

/// Smallest color count a level may use
pub const MIN_COLORS: u8 = 2;

/// Largest color count a level may use
pub const MAX_COLORS: u8 = 8;

/// Default charge needed to spawn a cart
pub const DEFAULT_CART_CHARGE_MAX: u32 = 50;

/// Default starting charge
pub const DEFAULT_CART_CHARGE_START: u32 = 0;

/// Headless runner poll interval in milliseconds
pub const TICK_MS: u32 = 16;


/// Size class of a bomb, tied to the length of the match that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BombSize {
    Four,
    Five,
    Six,
    /// Seven or more.
    Seven,
}

impl BombSize {
    /// Bomb created by a match group of `len` cells (`None` below 4).
    pub fn from_group_len(len: usize) -> Option<Self> {
        match len {
            0..=3 => None,
            4 => Some(BombSize::Four),
            5 => Some(BombSize::Five),
            6 => Some(BombSize::Six),
            _ => Some(BombSize::Seven),
        }
    }

    /// Numeric size (4..=7).
    pub fn size(self) -> u8 {
        match self {
            BombSize::Four => 4,
            BombSize::Five => 5,
            BombSize::Six => 6,
            BombSize::Seven => 7,
        }
    }

    /// Charge fed to the cart meter when this bomb detonates.
    pub fn charge_value(self) -> u32 {
        match self {
            BombSize::Four => 12,
            BombSize::Five => 20,
            BombSize::Six => 32,
            BombSize::Seven => 45,
        }
    }

    fn from_digit(d: u8) -> Option<Self> {
        match d {
            b'4' => Some(BombSize::Four),
            b'5' => Some(BombSize::Five),
            b'6' => Some(BombSize::Six),
            b'7' => Some(BombSize::Seven),
            _ => None,
        }
    }
}

/// Special behaviour carried by a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecialKind {
    #[default]
    None,
    Bomb(BombSize),
    Cart,
}

impl SpecialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::None => "none",
            SpecialKind::Bomb(BombSize::Four) => "bomb4",
            SpecialKind::Bomb(BombSize::Five) => "bomb5",
            SpecialKind::Bomb(BombSize::Six) => "bomb6",
            SpecialKind::Bomb(BombSize::Seven) => "bomb7",
            SpecialKind::Cart => "cart",
        }
    }
}

/// Color index in `0..color_count`.
pub type ColorId = u8;

/// A game token occupying one board cell.
///
/// Pieces are plain values; the board owns them and never shares one between cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: ColorId,
    pub special: SpecialKind,
}

impl Piece {
    pub const fn plain(color: ColorId) -> Self {
        Self {
            color,
            special: SpecialKind::None,
        }
    }

    pub const fn bomb(color: ColorId, size: BombSize) -> Self {
        Self {
            color,
            special: SpecialKind::Bomb(size),
        }
    }

    pub const fn cart(color: ColorId) -> Self {
        Self {
            color,
            special: SpecialKind::Cart,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.special == SpecialKind::None
    }

    pub fn is_cart(&self) -> bool {
        self.special == SpecialKind::Cart
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self.special, SpecialKind::Bomb(_))
    }

    /// Charge value of this piece (non-zero for bombs only).
    pub fn charge_value(&self) -> u32 {
        match self.special {
            SpecialKind::Bomb(size) => size.charge_value(),
            _ => 0,
        }
    }

    /// Parse the compact text notation used by fixtures and the protocol.
    ///
    /// - `N`: plain piece of color N
    /// - `Bk:N`: bomb of size k (4..=7) with color N
    /// - `C:N`: cart with color N
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::{BombSize, Piece};
    ///
    /// assert_eq!(Piece::from_token("3"), Some(Piece::plain(3)));
    /// assert_eq!(Piece::from_token("B5:1"), Some(Piece::bomb(1, BombSize::Five)));
    /// assert_eq!(Piece::from_token("C:0"), Some(Piece::cart(0)));
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        match b {
            [d] if d.is_ascii_digit() => Some(Piece::plain(d - b'0')),
            [b'B', k, b':', d] if d.is_ascii_digit() => {
                Some(Piece::bomb(d - b'0', BombSize::from_digit(*k)?))
            }
            [b'C', b':', d] if d.is_ascii_digit() => Some(Piece::cart(d - b'0')),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.special {
            SpecialKind::None => write!(f, "{}", self.color),
            SpecialKind::Bomb(size) => write!(f, "B{}:{}", size.size(), self.color),
            SpecialKind::Cart => write!(f, "C:{}", self.color),
        }
    }
}

/// Board coordinate, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i8,
    pub y: i8,
}

impl Cell {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True when `other` shares an edge with `self`.
    pub fn is_adjacent(self, other: Cell) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx + dy == 1
    }

    /// The four orthogonal neighbours (may be out of bounds).
    pub fn neighbors(self) -> [Cell; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A gravity-induced relocation. Never changes piece identity, only its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
}

/// Input gate state.
///
/// The cycle is `Input -> Swapping -> Resolving -> (Input | GameOver)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Input,
    Swapping,
    Resolving,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Input => "input",
            GamePhase::Swapping => "swapping",
            GamePhase::Resolving => "resolving",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Final result of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelOutcome {
    Won,
    Lost,
}

impl LevelOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelOutcome::Won => "won",
            LevelOutcome::Lost => "lost",
        }
    }
}

/// Notification emitted by the engine.
///
/// Events are delivered in the order the board mutations happened so a
/// renderer can replay them as animation steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    /// Two cells exchanged their pieces.
    SwapApplied { a: Cell, b: Cell },
    /// A swap without effect was undone.
    SwapReverted { a: Cell, b: Cell },
    PieceCleared { cell: Cell, piece: Piece },
    /// A plain piece was promoted in place.
    BombCreated { cell: Cell, piece: Piece },
    /// Charge overflow turned a plain piece into a cart.
    CartSpawned { cell: Cell, piece: Piece },
    PieceMoved(Move),
    PieceSpawned { cell: Cell, piece: Piece },
    ScoreChanged(u32),
    MovesChanged(u32),
    /// Normalized charge (`charge / charge_max`).
    CartMeterChanged(f32),
    ObjectivesChanged,
    GameOver,
    LevelFinished(LevelOutcome),
}
