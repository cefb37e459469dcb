//! Level goals and their progress.

use crate::types::{ColorId, Piece};

/// One level goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Clear `amount` plain pieces of `color`.
    ClearGem { color: ColorId, amount: u32 },
    /// Clear `amount` bombs of any size.
    ClearBomb { amount: u32 },
    /// Clear `amount` plain pieces of any color.
    FillCart { amount: u32 },
}

impl Goal {
    pub fn amount(&self) -> u32 {
        match *self {
            Goal::ClearGem { amount, .. } | Goal::ClearBomb { amount } | Goal::FillCart { amount } => {
                amount
            }
        }
    }

    fn counts(&self, piece: &Piece) -> bool {
        match *self {
            Goal::ClearGem { color, .. } => piece.is_plain() && piece.color == color,
            Goal::ClearBomb { .. } => piece.is_bomb(),
            Goal::FillCart { .. } => piece.is_plain(),
        }
    }
}

/// Progress of one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoalProgress {
    pub goal: Goal,
    pub progress: u32,
}

impl GoalProgress {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.goal.amount()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Objectives {
    goals: Vec<GoalProgress>,
}

impl Objectives {
    pub fn new(goals: &[Goal]) -> Self {
        Self {
            goals: goals
                .iter()
                .map(|&goal| GoalProgress { goal, progress: 0 })
                .collect(),
        }
    }

    pub fn has_goals(&self) -> bool {
        !self.goals.is_empty()
    }

    pub fn goals(&self) -> &[GoalProgress] {
        &self.goals
    }

    /// Count a cleared piece. Returns true if any progress changed.
    pub fn on_piece_cleared(&mut self, piece: &Piece) -> bool {
        let mut changed = false;
        for g in &mut self.goals {
            if g.progress < g.goal.amount() && g.goal.counts(piece) {
                g.progress += 1;
                changed = true;
            }
        }
        changed
    }

    /// True when there is at least one goal and all are met.
    pub fn is_complete(&self) -> bool {
        self.has_goals() && self.goals.iter().all(GoalProgress::is_complete)
    }

    pub fn reset(&mut self) {
        for g in &mut self.goals {
            g.progress = 0;
        }
    }
}
