//! Cart charge economy.
//!
//! Bomb detonations feed a counter. Each time it reaches `max`, `max` is
//! subtracted and a random plain piece becomes a cart (keeping its color).
//! When no plain piece is on the board the overflow stays in the counter until
//! the next `add`, so the meter can read above 1.0 in that case.

use crate::board::Board;
use crate::rng::RandomSource;
use crate::types::{Cell, Piece};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeMeter {
    charge: u32,
    max: u32,
}

impl ChargeMeter {
    /// `max` must be non-zero (validated by the level config).
    pub fn new(start: u32, max: u32) -> Self {
        Self {
            charge: start,
            max: max.max(1),
        }
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Normalized meter value (`charge / max`).
    pub fn level(&self) -> f32 {
        self.charge as f32 / self.max as f32
    }

    pub fn reset(&mut self, start: u32) {
        self.charge = start;
    }

    /// Add `amount` and convert every full meter into a cart.
    ///
    /// Returns the carts spawned, in spawn order. Amounts of zero are ignored.
    pub fn add<R: RandomSource>(
        &mut self,
        amount: u32,
        board: &mut Board,
        rng: &mut R,
    ) -> Vec<(Cell, Piece)> {
        let mut spawned = Vec::new();
        if amount == 0 {
            return spawned;
        }
        self.charge += amount;

        while self.charge >= self.max {
            let eligible: Vec<(Cell, Piece)> = board.pieces().filter(|(_, p)| p.is_plain()).collect();
            let Some(&(cell, piece)) = rng.choose(&eligible) else {
                break;
            };
            self.charge -= self.max;
            let cart = Piece::cart(piece.color);
            board.put(cell, Some(cart));
            spawned.push((cell, cart));
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    fn plain_board() -> Board {
        Board::parse(&["0 1 2", "1 2 0", "2 0 1"]).unwrap()
    }

    #[test]
    fn below_max_only_accumulates() {
        let mut meter = ChargeMeter::new(0, 50);
        let mut board = plain_board();
        let spawned = meter.add(12, &mut board, &mut SimpleRng::new(1));
        assert!(spawned.is_empty());
        assert_eq!(meter.charge(), 12);
        assert!((meter.level() - 0.24).abs() < 1e-6);
    }

    #[test]
    fn overflow_spawns_cart_keeping_color() {
        let mut meter = ChargeMeter::new(40, 50);
        let mut board = plain_board();
        let before = board.clone();
        let spawned = meter.add(20, &mut board, &mut SimpleRng::new(3));

        assert_eq!(spawned.len(), 1);
        assert_eq!(meter.charge(), 10);
        let (cell, cart) = spawned[0];
        assert!(cart.is_cart());
        assert_eq!(Some(cart.color), before.at(cell).map(|p| p.color));
        assert_eq!(board.at(cell), Some(cart));
    }

    #[test]
    fn large_amount_spawns_several() {
        let mut meter = ChargeMeter::new(0, 50);
        let mut board = plain_board();
        let spawned = meter.add(145, &mut board, &mut SimpleRng::new(8));
        assert_eq!(spawned.len(), 2);
        assert_eq!(meter.charge(), 45);
        assert_ne!(spawned[0].0, spawned[1].0);
    }

    #[test]
    fn no_eligible_cell_keeps_overflow() {
        let mut meter = ChargeMeter::new(0, 50);
        let mut board = Board::parse(&["C:0 B4:1"]).unwrap();
        let spawned = meter.add(60, &mut board, &mut SimpleRng::new(1));
        assert!(spawned.is_empty());
        assert_eq!(meter.charge(), 60);
        assert!(meter.level() > 1.0);
    }

    #[test]
    fn zero_amount_is_ignored() {
        let mut meter = ChargeMeter::new(50, 50);
        let mut board = plain_board();
        assert!(meter.add(0, &mut board, &mut SimpleRng::new(1)).is_empty());
        assert_eq!(meter.charge(), 50);
    }

    #[test]
    fn repeated_adds_conserve_charge() {
        let amounts = [12u32, 20, 32, 45, 12, 12, 20, 45, 32, 32, 20];
        let total: u32 = amounts.iter().sum();

        let mut meter = ChargeMeter::new(0, 50);
        let mut board = Board::new(8, 8);
        for c in board.positions().collect::<Vec<_>>() {
            board.put(c, Some(Piece::plain(((c.x * 3 + c.y) % 5) as u8)));
        }
        let mut rng = SimpleRng::new(77);
        let mut carts = 0;
        for a in amounts {
            carts += meter.add(a, &mut board, &mut rng).len() as u32;
        }
        assert_eq!(carts, total / 50);
        assert_eq!(meter.charge(), total % 50);
    }
}
