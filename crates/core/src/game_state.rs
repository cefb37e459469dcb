//! Game state module - the resolution orchestrator
//!
//! Ties together board, matching, specials, gravity, refill, charge and scoring.
//! Player actions pass through a small gate (phase plus `busy` flag) and are then
//! resolved as a finite sequence of stages:
//!
//! ```text
//! request_swap ──► Swap ─┬─► Rollback ─────────────────────────────► Finish
//!                        ├─► ColorClear ─┐
//!                        ├─► Detonate ───┼─► Settle ─► Cascade ─┬─► Settle ...
//!                        └─► Cascade ◄───┘                      └─► Finish
//! ```
//!
//! Each call to [`GameState::step`] performs exactly one stage and returns the
//! events it produced, so a renderer can animate between stages. Nothing here
//! sleeps or reads a clock. [`GameState::resolve`] runs an action to the end.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::cellset::CellSet;
use crate::charge::ChargeMeter;
use crate::gravity::apply_gravity;
use crate::grouping::group_matches;
use crate::level::{LevelConfig, LevelError};
use crate::mask::CellMask;
use crate::matches::find_matches;
use crate::objectives::{GoalProgress, Objectives};
use crate::refill::{fill_board, refill};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::ScoreMoves;
use crate::snapshot::{CellView, GameSnapshot};
use crate::specials::expand;
use crate::types::*;

/// Why a player request was refused. The game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    NotPlayable,
    Busy,
    OutOfBounds,
    NoCell,
    Empty,
    NotAdjacent,
    NotDetonatable,
    NotCart,
    InvalidColor,
}

impl RequestError {
    pub fn code(self) -> &'static str {
        match self {
            RequestError::NotPlayable => "not_playable",
            RequestError::Busy => "busy",
            RequestError::OutOfBounds
            | RequestError::NoCell
            | RequestError::Empty
            | RequestError::NotAdjacent => "invalid_cell",
            RequestError::NotDetonatable | RequestError::NotCart | RequestError::InvalidColor => {
                "invalid_activation"
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RequestError::NotPlayable => "game is not playable",
            RequestError::Busy => "an action is already resolving",
            RequestError::OutOfBounds => "cell is outside the board",
            RequestError::NoCell => "cell is a hole",
            RequestError::Empty => "cell holds no piece",
            RequestError::NotAdjacent => "swap cells must share an edge",
            RequestError::NotDetonatable => "cell does not hold a bomb",
            RequestError::NotCart => "cell does not hold a cart",
            RequestError::InvalidColor => "color is outside the level palette",
        }
    }
}

/// Kind of the stage a [`Step`] performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Swap,
    Rollback,
    Detonate,
    ColorClear,
    Cascade,
    Settle,
    Finish,
}

/// One discrete board mutation plus the notifications it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub stage: StageKind,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Swap { a: Cell, b: Cell },
    Rollback { a: Cell, b: Cell },
    Detonate { seeds: ArrayVec<Cell, 2>, scored: bool },
    /// `color == None` picks a random color among plain pieces on the board.
    ColorClear { cart: Cell, color: Option<ColorId> },
    Cascade,
    Settle,
    Finish,
}

impl Stage {
    fn kind(&self) -> StageKind {
        match self {
            Stage::Swap { .. } => StageKind::Swap,
            Stage::Rollback { .. } => StageKind::Rollback,
            Stage::Detonate { .. } => StageKind::Detonate,
            Stage::ColorClear { .. } => StageKind::ColorClear,
            Stage::Cascade => StageKind::Cascade,
            Stage::Settle => StageKind::Settle,
            Stage::Finish => StageKind::Finish,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    config: LevelConfig,
    mask: CellMask,
    board: Board,
    rng: R,
    /// Copy of the source as constructed, restored on restart.
    initial_rng: R,
    seed: u32,
    charge: ChargeMeter,
    score: ScoreMoves,
    objectives: Objectives,
    phase: GamePhase,
    busy: bool,
    pending: Option<Stage>,
    /// Preferred bomb cells for the current action (the swapped pair).
    pivots: ArrayVec<Cell, 2>,
    move_charged: bool,
    outcome: Option<LevelOutcome>,
    /// Events produced since the last step was handed out.
    events: Vec<GameEvent>,
    started: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id of accepted actions within the episode.
    action_id: u32,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given RNG seed. Call [`start`](Self::start) to fill the board.
    pub fn new(config: LevelConfig, seed: u32) -> Result<Self, LevelError> {
        let mut state = Self::with_rng(config, SimpleRng::new(seed))?;
        state.seed = seed;
        Ok(state)
    }
}

impl<R: RandomSource + Clone> GameState<R> {
    /// Create a game drawing from an arbitrary random source.
    pub fn with_rng(config: LevelConfig, rng: R) -> Result<Self, LevelError> {
        let mask = config.validate()?;
        let board = Board::new(config.width, config.height);
        Ok(Self {
            charge: ChargeMeter::new(config.cart_charge_start, config.cart_charge_max),
            score: ScoreMoves::new(config.max_moves, config.points_per_gem),
            objectives: Objectives::new(&config.goals),
            initial_rng: rng.clone(),
            rng,
            seed: 0,
            config,
            mask,
            board,
            phase: GamePhase::Input,
            busy: false,
            pending: None,
            pivots: ArrayVec::new(),
            move_charged: false,
            outcome: None,
            events: Vec::new(),
            started: false,
            episode_id: 0,
            action_id: 0,
        })
    }

    /// Create a started game on a prepared board. No fill and no initial resolution.
    ///
    /// Pieces placed on hole cells are removed.
    pub fn with_board(config: LevelConfig, mut board: Board, rng: R) -> Result<Self, LevelError> {
        if board.width() != config.width || board.height() != config.height {
            return Err(LevelError::BoardMismatch {
                width: config.width,
                height: config.height,
                found_width: board.width(),
                found_height: board.height(),
            });
        }
        let mut state = Self::with_rng(config, rng)?;
        for c in board.positions().collect::<Vec<_>>() {
            if !state.mask.has(c) {
                board.put(c, None);
            }
        }
        state.board = board;
        state.started = true;
        Ok(state)
    }

    /// Fill the board and clear any accidental starting matches.
    ///
    /// The starting resolution is silent: score, charge and goals are reset afterwards.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.board.clear();
        fill_board(
            &mut self.board,
            &self.mask,
            self.config.color_count,
            &mut self.rng,
        );
        while self.run_cascade() == Stage::Settle {
            self.run_settle();
        }
        self.events.clear();
        self.pivots.clear();
        self.score.reset_score();
        self.charge.reset(self.config.cart_charge_start);
        self.objectives.reset();
    }

    /// Start a new episode of the same level with the same seed.
    pub fn restart(&mut self) {
        self.rng = self.initial_rng.clone();
        self.charge = ChargeMeter::new(self.config.cart_charge_start, self.config.cart_charge_max);
        self.score = ScoreMoves::new(self.config.max_moves, self.config.points_per_gem);
        self.objectives = Objectives::new(&self.config.goals);
        self.phase = GamePhase::Input;
        self.busy = false;
        self.pending = None;
        self.pivots.clear();
        self.move_charged = false;
        self.outcome = None;
        self.events.clear();
        self.episode_id += 1;
        self.action_id = 0;
        self.started = false;
        self.start();
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mask(&self) -> &CellMask {
        &self.mask
    }

    pub fn has_cell(&self, x: i8, y: i8) -> bool {
        self.mask.has_cell(x, y)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// True when a new action would be accepted.
    pub fn is_playable(&self) -> bool {
        self.started && !self.busy && self.phase == GamePhase::Input
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn moves_left(&self) -> u32 {
        self.score.moves_left()
    }

    pub fn charge(&self) -> u32 {
        self.charge.charge()
    }

    pub fn cart_meter(&self) -> f32 {
        self.charge.level()
    }

    pub fn goals(&self) -> &[GoalProgress] {
        self.objectives.goals()
    }

    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn action_id(&self) -> u32 {
        self.action_id
    }

    /// Current score, moves and meter, for an observer that just attached.
    pub fn ui_state_events(&self) -> [GameEvent; 3] {
        [
            GameEvent::ScoreChanged(self.score.score()),
            GameEvent::MovesChanged(self.score.moves_left()),
            GameEvent::CartMeterChanged(self.charge.level()),
        ]
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (w, h) = (self.board.width() as i8, self.board.height() as i8);
        let rows = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| {
                        if !self.mask.has_cell(x, y) {
                            CellView::Hole
                        } else {
                            self.board
                                .get(x, y)
                                .map(CellView::Filled)
                                .unwrap_or(CellView::Empty)
                        }
                    })
                    .collect()
            })
            .collect();

        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            rows,
            phase: self.phase,
            busy: self.busy,
            outcome: self.outcome,
            episode_id: self.episode_id,
            action_id: self.action_id,
            seed: self.seed,
            score: self.score.score(),
            moves_left: self.score.moves_left(),
            charge: self.charge.charge(),
            charge_max: self.charge.max(),
            goals: self.objectives.goals().to_vec(),
        }
    }

    // ---------------------------------------------------------------------
    // Requests (input gate)
    // ---------------------------------------------------------------------

    fn gate(&self) -> Result<(), RequestError> {
        if !self.started || self.phase == GamePhase::GameOver {
            return Err(RequestError::NotPlayable);
        }
        if self.busy || self.phase != GamePhase::Input {
            return Err(RequestError::Busy);
        }
        Ok(())
    }

    fn piece_for_request(&self, cell: Cell) -> Result<Piece, RequestError> {
        if !self.board.contains(cell) {
            return Err(RequestError::OutOfBounds);
        }
        if !self.mask.has(cell) {
            return Err(RequestError::NoCell);
        }
        self.board.at(cell).ok_or(RequestError::Empty)
    }

    fn begin(&mut self, phase: GamePhase, stage: Stage) {
        self.busy = true;
        self.action_id += 1;
        self.move_charged = false;
        self.pivots.clear();
        self.set_phase(phase);
        self.pending = Some(stage);
    }

    /// Stage a swap of two adjacent cells.
    pub fn request_swap(&mut self, a: Cell, b: Cell) -> Result<(), RequestError> {
        self.gate()?;
        self.piece_for_request(a)?;
        self.piece_for_request(b)?;
        if !a.is_adjacent(b) {
            return Err(RequestError::NotAdjacent);
        }
        self.begin(GamePhase::Swapping, Stage::Swap { a, b });
        Ok(())
    }

    /// Stage a direct detonation of the bomb at `cell`. Charges a move.
    pub fn request_activate_special(&mut self, cell: Cell) -> Result<(), RequestError> {
        self.gate()?;
        let piece = self.piece_for_request(cell)?;
        if !piece.is_bomb() {
            return Err(RequestError::NotDetonatable);
        }
        let mut seeds = ArrayVec::new();
        seeds.push(cell);
        self.begin(
            GamePhase::Resolving,
            Stage::Detonate {
                seeds,
                scored: true,
            },
        );
        self.charge_move();
        Ok(())
    }

    /// Stage a cart activation. `color == None` targets a random color present
    /// among plain pieces. Charges a move.
    pub fn request_activate_cart(
        &mut self,
        cell: Cell,
        color: Option<ColorId>,
    ) -> Result<(), RequestError> {
        self.gate()?;
        let piece = self.piece_for_request(cell)?;
        if !piece.is_cart() {
            return Err(RequestError::NotCart);
        }
        if color.map(|c| c >= self.config.color_count).unwrap_or(false) {
            return Err(RequestError::InvalidColor);
        }
        self.begin(GamePhase::Resolving, Stage::ColorClear { cart: cell, color });
        self.charge_move();
        Ok(())
    }

    /// End the level now. Only accepted while idle.
    pub fn force_game_over(&mut self) -> Result<Vec<GameEvent>, RequestError> {
        self.gate()?;
        let outcome = self.evaluate_outcome();
        self.end(outcome);
        Ok(std::mem::take(&mut self.events))
    }

    // ---------------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------------

    /// Perform the next stage of the action in flight. `None` when idle.
    pub fn step(&mut self) -> Option<Step> {
        let stage = self.pending.take()?;
        let kind = stage.kind();
        self.pending = match stage {
            Stage::Swap { a, b } => Some(self.run_swap(a, b)),
            Stage::Rollback { a, b } => {
                self.board.swap(a, b);
                self.events.push(GameEvent::SwapReverted { a, b });
                Some(Stage::Finish)
            }
            Stage::Detonate { seeds, scored } => {
                self.run_detonate(&seeds, scored);
                Some(Stage::Settle)
            }
            Stage::ColorClear { cart, color } => {
                self.run_color_clear(cart, color);
                Some(Stage::Settle)
            }
            Stage::Cascade => Some(self.run_cascade()),
            Stage::Settle => {
                self.run_settle();
                Some(Stage::Cascade)
            }
            Stage::Finish => {
                self.finish();
                None
            }
        };
        Some(Step {
            stage: kind,
            events: std::mem::take(&mut self.events),
        })
    }

    /// Run the action in flight to completion and return all of its events in order.
    pub fn resolve(&mut self) -> Vec<GameEvent> {
        let mut out = Vec::new();
        while let Some(step) = self.step() {
            out.extend(step.events);
        }
        out
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    fn charge_move(&mut self) {
        let left = self.score.consume_move();
        self.move_charged = true;
        self.events.push(GameEvent::MovesChanged(left));
    }

    fn run_swap(&mut self, a: Cell, b: Cell) -> Stage {
        self.board.swap(a, b);
        self.events.push(GameEvent::SwapApplied { a, b });

        let (pa, pb) = (self.board.at(a), self.board.at(b));

        // Cart swapped with a plain piece clears that piece's color.
        let cart_clear = match (pa, pb) {
            (Some(x), Some(y)) if x.is_cart() && y.is_plain() => Some((a, y.color)),
            (Some(x), Some(y)) if y.is_cart() && x.is_plain() => Some((b, x.color)),
            _ => None,
        };
        if let Some((cart, color)) = cart_clear {
            self.charge_move();
            self.set_phase(GamePhase::Resolving);
            return Stage::ColorClear {
                cart,
                color: Some(color),
            };
        }

        let seeds: ArrayVec<Cell, 2> = [a, b]
            .into_iter()
            .filter(|&c| self.board.at(c).map(|p| p.is_bomb()).unwrap_or(false))
            .collect();
        if !seeds.is_empty() {
            self.charge_move();
            self.set_phase(GamePhase::Resolving);
            return Stage::Detonate {
                seeds,
                scored: false,
            };
        }

        if find_matches(&self.board).is_empty() {
            return Stage::Rollback { a, b };
        }

        self.pivots.push(a);
        self.pivots.push(b);
        self.charge_move();
        self.set_phase(GamePhase::Resolving);
        Stage::Cascade
    }

    fn run_detonate(&mut self, seeds: &[Cell], scored: bool) {
        let mut set = CellSet::new(self.board.width(), self.board.height());
        set.extend(seeds.iter().copied());
        let expansion = expand(&self.board, &set);
        let destroyed = self.clear_cells(&expansion.cleared);
        if scored {
            self.award(destroyed);
        }
        self.add_charge(expansion.charge);
    }

    /// A random-color activation with no plain piece on the board leaves the
    /// cart in place; the move stays charged.
    fn run_color_clear(&mut self, cart: Cell, color: Option<ColorId>) {
        let target = match color {
            Some(c) => c,
            None => {
                let present = self.plain_colors_present();
                match self.rng.choose(&present) {
                    Some(&c) => c,
                    None => return,
                }
            }
        };

        let mut set = CellSet::new(self.board.width(), self.board.height());
        for (cell, piece) in self.board.pieces() {
            if piece.color == target && !piece.is_cart() {
                set.insert(cell);
            }
        }
        set.insert(cart);

        let destroyed = self.clear_cells(&set);
        self.award(destroyed);
    }

    /// Colors of plain pieces on the board, ascending.
    fn plain_colors_present(&self) -> ArrayVec<ColorId, { MAX_COLORS as usize }> {
        let mut seen = [false; MAX_COLORS as usize];
        for (_, piece) in self.board.pieces() {
            if piece.is_plain() && (piece.color as usize) < seen.len() {
                seen[piece.color as usize] = true;
            }
        }
        (0..MAX_COLORS).filter(|&c| seen[c as usize]).collect()
    }

    /// One cascade pass: promote, expand and clear every match group.
    ///
    /// Returns the next stage: `Settle` after a clear, `Finish` on a stable board.
    fn run_cascade(&mut self) -> Stage {
        let matches = find_matches(&self.board);
        if matches.is_empty() {
            return Stage::Finish;
        }

        let groups = group_matches(&self.board, &matches);
        let mut destroyed = 0u32;
        let mut charge = 0u32;

        for group in &groups {
            let mut destroy = CellSet::new(self.board.width(), self.board.height());
            destroy.extend(group.cells.iter().copied());

            if let Some(size) = group.bomb_size() {
                let pivot = group.pivot(&self.pivots);
                let bomb = Piece::bomb(group.color, size);
                self.board.put(pivot, Some(bomb));
                self.events.push(GameEvent::BombCreated {
                    cell: pivot,
                    piece: bomb,
                });
                destroy.remove(pivot);
            }

            let expansion = expand(&self.board, &destroy);
            destroyed += self.clear_cells(&expansion.cleared);
            charge += expansion.charge;
        }

        self.award(destroyed);
        self.add_charge(charge);
        Stage::Settle
    }

    /// Gravity then refill.
    fn run_settle(&mut self) {
        let plan = apply_gravity(&mut self.board, &self.mask);
        self.events
            .extend(plan.moves.iter().map(|&m| GameEvent::PieceMoved(m)));
        let placed = refill(
            &mut self.board,
            &plan.spawns,
            self.config.color_count,
            &mut self.rng,
        );
        self.events.extend(
            placed
                .into_iter()
                .map(|(cell, piece)| GameEvent::PieceSpawned { cell, piece }),
        );
    }

    /// Clear every cell in `cells`; returns how many held a piece.
    fn clear_cells(&mut self, cells: &CellSet) -> u32 {
        let mut destroyed = 0;
        let mut goals_changed = false;
        for cell in cells.iter() {
            let Some(piece) = self.board.take(cell) else {
                continue;
            };
            destroyed += 1;
            goals_changed |= self.objectives.on_piece_cleared(&piece);
            self.events.push(GameEvent::PieceCleared { cell, piece });
        }
        if goals_changed {
            self.events.push(GameEvent::ObjectivesChanged);
        }
        destroyed
    }

    fn award(&mut self, destroyed: u32) {
        if let Some(score) = self.score.add_destroyed(destroyed) {
            self.events.push(GameEvent::ScoreChanged(score));
        }
    }

    fn add_charge(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        let spawned = self.charge.add(amount, &mut self.board, &mut self.rng);
        self.events.extend(
            spawned
                .into_iter()
                .map(|(cell, piece)| GameEvent::CartSpawned { cell, piece }),
        );
        self.events
            .push(GameEvent::CartMeterChanged(self.charge.level()));
    }

    fn finish(&mut self) {
        self.busy = false;
        self.pivots.clear();

        if self.objectives.is_complete() {
            self.end(LevelOutcome::Won);
        } else if self.move_charged && self.score.moves_left() == 0 {
            let outcome = self.evaluate_outcome();
            self.end(outcome);
        } else {
            self.set_phase(GamePhase::Input);
        }
    }

    fn evaluate_outcome(&self) -> LevelOutcome {
        let won = if self.objectives.has_goals() {
            self.objectives.is_complete()
        } else {
            self.score.score() >= self.config.target_score
        };
        if won {
            LevelOutcome::Won
        } else {
            LevelOutcome::Lost
        }
    }

    fn end(&mut self, outcome: LevelOutcome) {
        self.outcome = Some(outcome);
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver);
        self.events.push(GameEvent::LevelFinished(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn stable_rows() -> [&'static str; 4] {
        [
            "0 1 2 3", //
            "2 3 0 1",
            "0 1 2 3",
            "2 3 0 1",
        ]
    }

    fn level(w: u8, h: u8) -> LevelConfig {
        LevelConfig {
            width: w,
            height: h,
            color_count: 4,
            ..Default::default()
        }
    }

    fn game(rows: &[&str]) -> GameState<ScriptedRng> {
        let board = Board::parse(rows).unwrap();
        GameState::with_board(
            level(board.width(), board.height()),
            board,
            ScriptedRng::new(vec![0, 1, 2, 3, 5, 7, 11]),
        )
        .unwrap()
    }

    #[test]
    fn swap_pivots_last_one_action() {
        let mut gs = game(&[
            "2 3 0 1 2 3",
            "0 1 2 3 0 1",
            "2 3 0 1 2 3",
            "3 2 1 0 3 2",
            "1 0 3 2 1 0",
            "0 1 0 0 2 3",
        ]);
        gs.request_swap(Cell::new(1, 0), Cell::new(1, 1)).unwrap();
        assert_eq!(gs.step().unwrap().stage, StageKind::Swap);
        assert_eq!(gs.pivots.as_slice(), &[Cell::new(1, 0), Cell::new(1, 1)]);

        gs.resolve();
        assert!(gs.pivots.is_empty());
    }

    #[test]
    fn new_game_is_not_started() {
        let mut gs = GameState::new(LevelConfig::default(), 1).unwrap();
        assert!(!gs.started());
        assert_eq!(
            gs.request_swap(Cell::new(0, 0), Cell::new(1, 0)),
            Err(RequestError::NotPlayable)
        );
    }

    #[test]
    fn start_fills_a_stable_board() {
        let mut gs = GameState::new(LevelConfig::default(), 42).unwrap();
        gs.start();
        assert!(gs.board().cells().iter().all(|c| c.is_some()));
        assert!(find_matches(gs.board()).is_empty());
        assert_eq!(gs.score(), 0);
        assert_eq!(gs.moves_left(), 20);
        assert!(gs.is_playable());
    }

    #[test]
    fn same_seed_same_board() {
        let mut a = GameState::new(LevelConfig::default(), 7).unwrap();
        let mut b = GameState::new(LevelConfig::default(), 7).unwrap();
        a.start();
        b.start();
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn rejects_invalid_requests() {
        let mut gs = game(&stable_rows());
        assert_eq!(
            gs.request_swap(Cell::new(0, 0), Cell::new(2, 0)),
            Err(RequestError::NotAdjacent)
        );
        assert_eq!(
            gs.request_swap(Cell::new(3, 0), Cell::new(4, 0)),
            Err(RequestError::OutOfBounds)
        );
        assert_eq!(
            gs.request_activate_special(Cell::new(0, 0)),
            Err(RequestError::NotDetonatable)
        );
        assert_eq!(
            gs.request_activate_cart(Cell::new(0, 0), None),
            Err(RequestError::NotCart)
        );
        assert!(gs.is_playable());
        assert_eq!(gs.moves_left(), 20);
    }

    #[test]
    fn second_request_while_busy_is_dropped() {
        let mut gs = game(&stable_rows());
        gs.request_swap(Cell::new(0, 0), Cell::new(1, 0)).unwrap();
        assert!(gs.is_busy());
        assert_eq!(
            gs.request_swap(Cell::new(2, 2), Cell::new(3, 2)),
            Err(RequestError::Busy)
        );
        gs.resolve();
        assert!(!gs.is_busy());
    }

    #[test]
    fn swap_without_match_rolls_back() {
        let mut gs = game(&stable_rows());
        let before = gs.board().clone();
        gs.request_swap(Cell::new(0, 0), Cell::new(0, 1)).unwrap();

        let swap = gs.step().unwrap();
        assert_eq!(swap.stage, StageKind::Swap);
        let rollback = gs.step().unwrap();
        assert_eq!(rollback.stage, StageKind::Rollback);
        assert_eq!(
            rollback.events,
            vec![GameEvent::SwapReverted {
                a: Cell::new(0, 0),
                b: Cell::new(0, 1)
            }]
        );
        let finish = gs.step().unwrap();
        assert_eq!(finish.stage, StageKind::Finish);
        assert!(gs.step().is_none());

        assert_eq!(gs.board(), &before);
        assert_eq!(gs.moves_left(), 20);
        assert_eq!(gs.phase(), GamePhase::Input);
    }

    #[test]
    fn idle_step_is_none() {
        let mut gs = game(&stable_rows());
        assert!(gs.step().is_none());
        assert!(gs.resolve().is_empty());
    }

    #[test]
    fn force_game_over_only_when_idle() {
        let mut gs = game(&stable_rows());
        let events = gs.force_game_over().unwrap();
        assert!(events.contains(&GameEvent::GameOver));
        assert!(events.contains(&GameEvent::LevelFinished(LevelOutcome::Lost)));
        assert_eq!(gs.phase(), GamePhase::GameOver);
        assert_eq!(gs.force_game_over(), Err(RequestError::NotPlayable));
    }

    #[test]
    fn restart_bumps_episode_and_refills() {
        let mut gs = GameState::new(LevelConfig::default(), 3).unwrap();
        gs.start();
        let first = gs.board().clone();
        gs.force_game_over().unwrap();
        gs.restart();
        assert_eq!(gs.episode_id(), 1);
        assert_eq!(gs.action_id(), 0);
        assert!(gs.is_playable());
        assert_eq!(gs.board(), &first);
    }

    #[test]
    fn hole_requests_are_rejected() {
        let rows = ["0 1 2", "1 # 0", "2 0 1"];
        let board = Board::parse(&rows).unwrap();
        let cfg = LevelConfig {
            width: 3,
            height: 3,
            color_count: 3,
            mask_rows: vec!["111".into(), "101".into()],
            ..Default::default()
        };
        let mut gs = GameState::with_board(cfg, board, ScriptedRng::new(vec![1])).unwrap();
        assert_eq!(
            gs.request_swap(Cell::new(0, 1), Cell::new(1, 1)),
            Err(RequestError::NoCell)
        );
        assert_eq!(gs.snapshot().cell(1, 1), Some(CellView::Hole));
    }

    #[test]
    fn ui_state_events_report_current_values() {
        let gs = game(&stable_rows());
        let [score, moves, meter] = gs.ui_state_events();
        assert_eq!(score, GameEvent::ScoreChanged(0));
        assert_eq!(moves, GameEvent::MovesChanged(20));
        assert_eq!(meter, GameEvent::CartMeterChanged(0.0));
    }

    #[test]
    fn request_error_codes() {
        assert_eq!(RequestError::Busy.code(), "busy");
        assert_eq!(RequestError::NotAdjacent.code(), "invalid_cell");
        assert_eq!(RequestError::NotCart.code(), "invalid_activation");
        assert_eq!(RequestError::NoCell.message(), "cell is a hole");
    }
}
