//! Level configuration.
//!
//! Loaded once before the first action and immutable for the session. File
//! loading lives in the adapter crate; this module only defines and validates.

use thiserror::Error;

use crate::mask::{CellMask, MaskError};
use crate::objectives::Goal;
use crate::types::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("board size {width}x{height} outside 1..={max}")]
    BadSize { width: u8, height: u8, max: u8 },
    #[error("color count {0} outside {min}..={max}", min = MIN_COLORS, max = MAX_COLORS)]
    BadColorCount(u8),
    #[error("cart charge max must be positive")]
    ZeroChargeMax,
    #[error("cart charge start {start} must be below max {max}")]
    ChargeStartTooHigh { start: u32, max: u32 },
    #[error("goal {index} names color {color}, level has {color_count} colors")]
    GoalColor {
        index: usize,
        color: ColorId,
        color_count: u8,
    },
    #[error("goal {index} has zero amount")]
    ZeroGoal { index: usize },
    #[error("board is {found_width}x{found_height}, level expects {width}x{height}")]
    BoardMismatch {
        width: u8,
        height: u8,
        found_width: u8,
        found_height: u8,
    },
    #[error(transparent)]
    Mask(#[from] MaskError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub width: u8,
    pub height: u8,
    pub max_moves: u32,
    /// Score needed to win when the level has no goals.
    pub target_score: u32,
    pub points_per_gem: u32,
    pub color_count: u8,
    /// `mask_rows[y]` describes row `y`, bottom first. `'1'` cell, `'0'` hole.
    pub mask_rows: Vec<String>,
    pub cart_charge_max: u32,
    pub cart_charge_start: u32,
    pub goals: Vec<Goal>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_moves: DEFAULT_MAX_MOVES,
            target_score: DEFAULT_TARGET_SCORE,
            points_per_gem: DEFAULT_POINTS_PER_GEM,
            color_count: DEFAULT_COLOR_COUNT,
            mask_rows: Vec::new(),
            cart_charge_max: DEFAULT_CART_CHARGE_MAX,
            cart_charge_start: DEFAULT_CART_CHARGE_START,
            goals: Vec::new(),
        }
    }
}

impl LevelConfig {
    /// Check every field; returns the parsed mask on success.
    pub fn validate(&self) -> Result<CellMask, LevelError> {
        let side_ok = |s: u8| (1..=MAX_BOARD_DIM).contains(&s);
        if !side_ok(self.width) || !side_ok(self.height) {
            return Err(LevelError::BadSize {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_DIM,
            });
        }
        if !(MIN_COLORS..=MAX_COLORS).contains(&self.color_count) {
            return Err(LevelError::BadColorCount(self.color_count));
        }
        if self.cart_charge_max == 0 {
            return Err(LevelError::ZeroChargeMax);
        }
        if self.cart_charge_start >= self.cart_charge_max {
            return Err(LevelError::ChargeStartTooHigh {
                start: self.cart_charge_start,
                max: self.cart_charge_max,
            });
        }
        for (index, goal) in self.goals.iter().enumerate() {
            if goal.amount() == 0 {
                return Err(LevelError::ZeroGoal { index });
            }
            if let Goal::ClearGem { color, .. } = *goal {
                if color >= self.color_count {
                    return Err(LevelError::GoalColor {
                        index,
                        color,
                        color_count: self.color_count,
                    });
                }
            }
        }
        Ok(CellMask::from_rows(self.width, self.height, &self.mask_rows)?)
    }
}
