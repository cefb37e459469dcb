//! Resolution scenarios: swaps, cascades, detonations, carts and game over.

use match3::core::{
    apply_gravity, expand, find_matches, Board, CellSet, GameState, LevelConfig, RequestError,
    ScriptedRng, SimpleRng, StageKind,
};
use match3::types::{BombSize, Cell, GameEvent, GamePhase, LevelOutcome, Piece};

/// 6x6, four colors, no runs. Swapping (1,0) with (1,1) completes `0 0 0 0` on the bottom row.
const FOUR_RUN: [&str; 6] = [
    "2 3 0 1 2 3",
    "0 1 2 3 0 1",
    "2 3 0 1 2 3",
    "3 2 1 0 3 2",
    "1 0 3 2 1 0",
    "0 1 0 0 2 3",
];

fn config(w: u8, h: u8, colors: u8) -> LevelConfig {
    LevelConfig {
        width: w,
        height: h,
        color_count: colors,
        ..Default::default()
    }
}

fn game_with(rows: &[&str], config: LevelConfig) -> GameState<SimpleRng> {
    let board = Board::parse(rows).unwrap();
    GameState::with_board(config, board, SimpleRng::new(11)).unwrap()
}

/// Square board with no runs: color `(x + 2y) % 4`.
fn striped(size: u8) -> Board {
    let mut board = Board::new(size, size);
    for c in board.positions().collect::<Vec<_>>() {
        board.put(c, Some(Piece::plain(((c.x + 2 * c.y) % 4) as u8)));
    }
    board
}

fn cleared_cells(events: &[GameEvent]) -> Vec<Cell> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PieceCleared { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect()
}

fn count(events: &[GameEvent], wanted: &GameEvent) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

#[test]
fn run_of_four_becomes_bomb_at_swap_pivot() {
    let mut gs = game_with(&FOUR_RUN, config(6, 6, 4));
    gs.request_swap(Cell::new(1, 0), Cell::new(1, 1)).unwrap();

    let swap = gs.step().unwrap();
    assert_eq!(swap.stage, StageKind::Swap);
    assert!(swap.events.contains(&GameEvent::MovesChanged(19)));

    let cascade = gs.step().unwrap();
    assert_eq!(cascade.stage, StageKind::Cascade);
    assert_eq!(
        cascade.events[0],
        GameEvent::BombCreated {
            cell: Cell::new(1, 0),
            piece: Piece::bomb(0, BombSize::Four)
        }
    );
    let mut cleared = cleared_cells(&cascade.events);
    cleared.sort_by_key(|c| c.x);
    assert_eq!(cleared, vec![Cell::new(0, 0), Cell::new(2, 0), Cell::new(3, 0)]);
    assert_eq!(cascade.events.last(), Some(&GameEvent::ScoreChanged(30)));
    assert_eq!(gs.board().get(1, 0), Some(Piece::bomb(0, BombSize::Four)));

    let settle = gs.step().unwrap();
    assert_eq!(settle.stage, StageKind::Settle);

    gs.resolve();
    assert!(gs.score() >= 30);
    assert!(gs.is_playable());
    assert!(find_matches(gs.board()).is_empty());
    assert!(gs.board().cells().iter().all(|c| c.is_some()));
}

#[test]
fn overlapping_bombs_clear_their_union_once() {
    let mut board = striped(7);
    board.set(2, 2, Some(Piece::bomb(0, BombSize::Four)));
    board.set(2, 3, Some(Piece::bomb(1, BombSize::Five)));

    let mut seeds = CellSet::new(7, 7);
    seeds.extend([Cell::new(2, 2), Cell::new(2, 3)]);
    let ex = expand(&board, &seeds);

    // The plus around (2,2) lies inside the 5x5 area around (2,3).
    assert_eq!(ex.cleared.len(), 21);
    assert_eq!(ex.detonated, vec![Cell::new(2, 2), Cell::new(2, 3)]);
    assert_eq!(ex.charge, 12 + 20);
}

#[test]
fn swapping_two_bombs_detonates_both() {
    let mut board = striped(7);
    board.set(2, 2, Some(Piece::bomb(0, BombSize::Four)));
    board.set(2, 3, Some(Piece::bomb(1, BombSize::Five)));
    let mut gs = GameState::with_board(config(7, 7, 4), board, SimpleRng::new(3)).unwrap();

    gs.request_swap(Cell::new(2, 2), Cell::new(2, 3)).unwrap();
    let swap = gs.step().unwrap();
    assert!(swap.events.contains(&GameEvent::MovesChanged(19)));

    let det = gs.step().unwrap();
    assert_eq!(det.stage, StageKind::Detonate);
    let mut cleared = cleared_cells(&det.events);
    assert_eq!(cleared.len(), 21);
    cleared.sort_by_key(|c| (c.y, c.x));
    cleared.dedup();
    assert_eq!(cleared.len(), 21);
    assert!(det.events.contains(&GameEvent::CartMeterChanged(32.0 / 50.0)));
    assert_eq!(gs.charge(), 32);

    gs.resolve();
    assert!(gs.is_playable());
    assert_eq!(gs.moves_left(), 19);
}

#[test]
fn detonation_overflowing_the_meter_spawns_a_cart() {
    let mut board = striped(7);
    board.set(2, 2, Some(Piece::bomb(0, BombSize::Four)));
    board.set(2, 3, Some(Piece::bomb(1, BombSize::Five)));
    let cfg = LevelConfig {
        cart_charge_max: 20,
        ..config(7, 7, 4)
    };
    let mut gs = GameState::with_board(cfg, board, SimpleRng::new(3)).unwrap();

    gs.request_swap(Cell::new(2, 2), Cell::new(2, 3)).unwrap();
    gs.step().unwrap();
    let det = gs.step().unwrap();

    let spawned: Vec<_> = det
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CartSpawned { cell, piece } => Some((*cell, *piece)),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    let (cell, cart) = spawned[0];
    assert!(cart.is_cart());
    assert_eq!(gs.board().at(cell), Some(cart));
    assert_eq!(gs.charge(), 12);
}

#[test]
fn cart_without_color_picks_among_present_plain_colors() {
    // Plain counts: color 0 five times, color 2 three times, color 1 only on the cart.
    let rows = ["0 2 0", "2 0 2", "C:1 0 0"];

    for (script, expected) in [(0u32, 0u8), (1, 2)] {
        let board = Board::parse(&rows).unwrap();
        let mut gs =
            GameState::with_board(config(3, 3, 3), board, ScriptedRng::new(vec![script])).unwrap();
        gs.request_activate_cart(Cell::new(0, 0), None).unwrap();
        assert_eq!(gs.moves_left(), 19);

        let clear = gs.step().unwrap();
        assert_eq!(clear.stage, StageKind::ColorClear);
        let colors: Vec<Piece> = clear
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PieceCleared { piece, .. } => Some(*piece),
                _ => None,
            })
            .collect();
        let plain = colors.iter().filter(|p| p.is_plain()).count();
        assert_eq!(plain, if expected == 0 { 5 } else { 3 });
        assert!(colors.iter().filter(|p| p.is_plain()).all(|p| p.color == expected));
        assert!(colors.contains(&Piece::cart(1)));
        assert_eq!(gs.score(), (plain as u32 + 1) * 10);
    }
}

#[test]
fn random_cart_without_plain_pieces_stays_put() {
    let board = Board::parse(&["B4:0 B5:1", "C:2 B4:1"]).unwrap();
    let mut gs = GameState::with_board(config(2, 2, 3), board, SimpleRng::new(5)).unwrap();

    gs.request_activate_cart(Cell::new(0, 0), None).unwrap();
    let events = gs.resolve();

    assert!(cleared_cells(&events).is_empty());
    assert_eq!(gs.board().get(0, 0), Some(Piece::cart(2)));
    assert_eq!(gs.score(), 0);
    assert_eq!(gs.moves_left(), 19);
    assert_eq!(gs.phase(), GamePhase::Input);
    assert!(!gs.is_busy());
}

#[test]
fn cart_with_explicit_color_and_palette_check() {
    let rows = ["0 2 0", "2 0 2", "C:1 0 0"];
    let board = Board::parse(&rows).unwrap();
    let mut gs = GameState::with_board(config(3, 3, 3), board, ScriptedRng::new(vec![0])).unwrap();

    assert_eq!(
        gs.request_activate_cart(Cell::new(0, 0), Some(3)),
        Err(RequestError::InvalidColor)
    );
    gs.request_activate_cart(Cell::new(0, 0), Some(2)).unwrap();
    let clear = gs.step().unwrap();
    assert_eq!(cleared_cells(&clear.events).len(), 4);
}

#[test]
fn swapping_cart_with_plain_piece_clears_that_color() {
    let board = Board::parse(&["0 1 2", "1 C:0 0", "2 0 1"]).unwrap();
    let mut gs = GameState::with_board(config(3, 3, 3), board, ScriptedRng::new(vec![2])).unwrap();

    gs.request_swap(Cell::new(1, 1), Cell::new(2, 1)).unwrap();
    gs.step().unwrap();
    let clear = gs.step().unwrap();
    assert_eq!(clear.stage, StageKind::ColorClear);
    let pieces: Vec<Piece> = clear
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PieceCleared { piece, .. } => Some(*piece),
            _ => None,
        })
        .collect();
    // Three plain 0s plus the cart itself.
    assert_eq!(pieces.len(), 4);
    assert!(pieces.iter().all(|p| p.color == 0));
    assert_eq!(gs.moves_left(), 19);
}

#[test]
fn last_move_ends_the_game_once_after_cascades() {
    let cfg = LevelConfig {
        max_moves: 1,
        target_score: 10_000,
        ..config(6, 6, 4)
    };
    let mut gs = game_with(&FOUR_RUN, cfg);
    gs.request_swap(Cell::new(1, 0), Cell::new(1, 1)).unwrap();
    let events = gs.resolve();

    assert_eq!(gs.moves_left(), 0);
    assert_eq!(count(&events, &GameEvent::GameOver), 1);
    assert_eq!(
        count(&events, &GameEvent::LevelFinished(LevelOutcome::Lost)),
        1
    );

    let over = events.iter().position(|e| *e == GameEvent::GameOver).unwrap();
    let last_board_change = events
        .iter()
        .rposition(|e| {
            matches!(
                e,
                GameEvent::PieceCleared { .. }
                    | GameEvent::PieceMoved(_)
                    | GameEvent::PieceSpawned { .. }
            )
        })
        .unwrap();
    assert!(over > last_board_change);

    assert_eq!(gs.phase(), GamePhase::GameOver);
    assert_eq!(gs.outcome(), Some(LevelOutcome::Lost));
    assert_eq!(
        gs.request_swap(Cell::new(0, 0), Cell::new(1, 0)),
        Err(RequestError::NotPlayable)
    );
    assert!(gs.resolve().is_empty());
}

#[test]
fn rolled_back_swap_never_ends_the_game() {
    let cfg = LevelConfig {
        max_moves: 1,
        ..config(6, 6, 4)
    };
    let mut gs = game_with(&FOUR_RUN, cfg);
    let before = gs.board().clone();

    gs.request_swap(Cell::new(4, 0), Cell::new(5, 0)).unwrap();
    let events = gs.resolve();

    assert_eq!(gs.board(), &before);
    assert_eq!(gs.moves_left(), 1);
    assert!(!events.contains(&GameEvent::GameOver));
    assert!(events.contains(&GameEvent::SwapReverted {
        a: Cell::new(4, 0),
        b: Cell::new(5, 0)
    }));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::MovesChanged(_))));
    assert!(gs.is_playable());
}

#[test]
fn stable_board_resolves_without_mutation() {
    let mut gs = GameState::new(LevelConfig::default(), 21).unwrap();
    gs.start();
    let before = gs.board().clone();

    assert!(gs.step().is_none());
    assert!(find_matches(gs.board()).is_empty());

    let mut board = gs.board().clone();
    let plan = apply_gravity(&mut board, gs.mask());
    assert!(plan.is_empty());
    assert_eq!(gs.board(), &before);
}

#[test]
fn direct_detonation_scores_and_charges() {
    let board = Board::parse(&[
        "0 1 2 3 0",
        "2 3 0 1 2",
        "0 1 B4:2 3 0",
        "2 3 0 1 2",
        "0 1 2 3 0",
    ])
    .unwrap();
    let mut gs = GameState::with_board(config(5, 5, 4), board, SimpleRng::new(2)).unwrap();

    gs.request_activate_special(Cell::new(2, 2)).unwrap();
    let det = gs.step().unwrap();
    assert_eq!(det.stage, StageKind::Detonate);
    assert_eq!(cleared_cells(&det.events).len(), 5);
    assert!(det.events.contains(&GameEvent::ScoreChanged(50)));
    assert!(det.events.contains(&GameEvent::CartMeterChanged(12.0 / 50.0)));

    gs.resolve();
    assert_eq!(gs.moves_left(), 19);
    assert!(gs.is_playable());
}

#[test]
fn stepping_reports_busy_until_finish() {
    let mut gs = game_with(&FOUR_RUN, config(6, 6, 4));
    gs.request_swap(Cell::new(1, 0), Cell::new(1, 1)).unwrap();

    let mut stages = Vec::new();
    while let Some(step) = gs.step() {
        if step.stage != StageKind::Finish {
            assert!(gs.is_busy());
            assert_eq!(
                gs.request_swap(Cell::new(0, 5), Cell::new(1, 5)),
                Err(RequestError::Busy)
            );
        }
        stages.push(step.stage);
    }
    assert_eq!(stages.first(), Some(&StageKind::Swap));
    assert_eq!(stages.last(), Some(&StageKind::Finish));
    assert!(!gs.is_busy());
}

#[test]
fn same_seed_same_game() {
    let play = |seed| {
        let mut gs = GameState::new(LevelConfig::default(), seed).unwrap();
        gs.start();
        let mut log = Vec::new();
        'outer: for y in 0..6 {
            for x in 0..5 {
                if gs.request_swap(Cell::new(x, y), Cell::new(x + 1, y)).is_ok() {
                    log.extend(gs.resolve());
                }
                if gs.game_over() {
                    break 'outer;
                }
            }
        }
        (gs.snapshot(), log)
    };
    assert_eq!(play(99), play(99));
}
