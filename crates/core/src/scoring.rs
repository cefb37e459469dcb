//! Score and move bookkeeping.
//!
//! Score grows by `destroyed * points_per_gem` per clear; each charged player
//! action consumes one move.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMoves {
    score: u32,
    moves_left: u32,
    points_per_gem: u32,
}

impl ScoreMoves {
    pub fn new(max_moves: u32, points_per_gem: u32) -> Self {
        Self {
            score: 0,
            moves_left: max_moves,
            points_per_gem,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn points_per_gem(&self) -> u32 {
        self.points_per_gem
    }

    /// Consume one move and return the moves left (saturates at 0).
    pub fn consume_move(&mut self) -> u32 {
        self.moves_left = self.moves_left.saturating_sub(1);
        self.moves_left
    }

    /// Award points for `destroyed` pieces. Returns the new score, `None` if nothing changed.
    pub fn add_destroyed(&mut self, destroyed: u32) -> Option<u32> {
        let points = destroyed.saturating_mul(self.points_per_gem);
        if points == 0 {
            return None;
        }
        self.score = self.score.saturating_add(points);
        Some(self.score)
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }
}
