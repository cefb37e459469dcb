//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the match-3 rules, state management, and resolution logic.
//! It has **no dependencies** on rendering, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for AI training and replays)
//! - **Testable**: Boards are built from text fixtures, randomness is injectable
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//! - **Clock-free**: Resolution advances one stage per call; the caller owns pacing
//!
//! # Module Structure
//!
//! - [`board`]: Grid storage, bounds-checked access and the text fixture format
//! - [`mask`]: Level mask (holes)
//! - [`matches`]: Runs of three or more identical plain pieces
//! - [`grouping`]: Same-color islands of matched cells, used for bomb promotion
//! - [`gravity`]: Hole-aware, segment-local column compaction
//! - [`refill`]: Color choice for spawned cells that avoids instant 3-runs
//! - [`specials`]: Bomb areas of effect and chain expansion
//! - [`charge`]: Cart charge meter
//! - [`scoring`]: Score and move bookkeeping
//! - [`objectives`]: Level goals
//! - [`level`]: Level configuration and validation
//! - [`game_state`]: The orchestrator and input gate
//! - [`snapshot`]: Read-only views for observers
//! - [`rng`]: Injectable random source
//!
//! # Rules
//!
//! - **Swap**: adjacent cells only; a swap that creates no match is rolled back free of charge
//! - **Bombs**: a group of 4, 5, 6 or 7+ becomes a bomb at the swapped cell (or the group's first cell)
//! - **Chains**: a bomb caught in another clear detonates too, each at most once
//! - **Carts**: detonations fill a meter; each full meter turns a random plain piece into a cart
//! - **Game over**: when a charged action leaves no moves, or all goals are met
//!
//! # Example
//!
//! ```
//! use match3_core::{Board, GameState, LevelConfig, SimpleRng};
//! use match3_types::{Cell, GameEvent};
//!
//! let board = Board::parse(&[
//!     "2 3 0 1 2 3",
//!     "0 1 2 3 0 1",
//!     "2 3 0 1 2 3",
//!     "3 2 1 0 3 2",
//!     "1 0 3 2 1 0",
//!     "0 1 0 0 2 3",
//! ])
//! .unwrap();
//! let config = LevelConfig { color_count: 4, ..Default::default() };
//! let mut game = GameState::with_board(config, board, SimpleRng::new(1)).unwrap();
//!
//! // Moving the 0 down completes 0 0 0 0 on the bottom row.
//! game.request_swap(Cell::new(1, 0), Cell::new(1, 1)).unwrap();
//! let events = game.resolve();
//!
//! assert!(events.iter().any(|e| matches!(e, GameEvent::BombCreated { .. })));
//! assert_eq!(game.moves_left(), 19);
//! ```

pub mod board;
pub mod cellset;
pub mod charge;
pub mod game_state;
pub mod gravity;
pub mod grouping;
pub mod level;
pub mod mask;
pub mod matches;
pub mod objectives;
pub mod refill;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod specials;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardParseError};
pub use cellset::CellSet;
pub use charge::ChargeMeter;
pub use game_state::{GameState, RequestError, StageKind, Step};
pub use gravity::{apply_gravity, GravityPlan};
pub use grouping::{group_matches, MatchGroup};
pub use level::{LevelConfig, LevelError};
pub use mask::{CellMask, MaskError};
pub use matches::{find_matches, has_matches};
pub use objectives::{Goal, GoalProgress, Objectives};
pub use refill::{choose_color, fill_board, refill};
pub use rng::{RandomSource, ScriptedRng, SimpleRng};
pub use scoring::ScoreMoves;
pub use snapshot::{CellView, GameSnapshot};
pub use specials::{area_cells, area_offsets, expand, Expansion};
