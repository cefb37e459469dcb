use std::fmt;

use crate::objectives::GoalProgress;
use crate::types::{GamePhase, LevelOutcome, Piece};

/// What an observer sees in one grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellView {
    Hole,
    Empty,
    Filled(Piece),
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellView::Hole => f.write_str("#"),
            CellView::Empty => f.write_str("."),
            CellView::Filled(p) => write!(f, "{}", p),
        }
    }
}

/// Read-only copy of everything an external collaborator may look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// `rows[y][x]`, bottom row first.
    pub rows: Vec<Vec<CellView>>,
    pub phase: GamePhase,
    pub busy: bool,
    pub outcome: Option<LevelOutcome>,
    pub episode_id: u32,
    pub action_id: u32,
    pub seed: u32,
    pub score: u32,
    pub moves_left: u32,
    pub charge: u32,
    pub charge_max: u32,
    pub goals: Vec<GoalProgress>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Input && !self.busy
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn cart_meter(&self) -> f32 {
        self.charge as f32 / self.charge_max.max(1) as f32
    }

    pub fn cell(&self, x: i8, y: i8) -> Option<CellView> {
        self.rows.get(y as usize)?.get(x as usize).copied()
    }
}
