//! Wire format tests for the adapter protocol

use match3::adapter::protocol::*;
use match3::adapter::server::build_observation;
use match3::core::{Board, GameState, Goal, LevelConfig, SimpleRng};
use match3::types::{BombSize, Cell, GameEvent, LevelOutcome, Piece};

#[test]
fn hello_parses_with_and_without_role() {
    let json = r#"{"type":"hello","seq":1,"ts":5,"client":{"name":"bot","version":"1"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}"#;
    match parse_message(json).unwrap() {
        ParsedMessage::Hello(h) => {
            assert_eq!(h.seq, 1);
            assert_eq!(h.client.name, "bot");
            assert!(h.requested.stream_observations);
            assert_eq!(h.requested.role, None);
        }
        other => panic!("expected hello, got {:?}", other),
    }

    let json = r#"{"type":"hello","seq":1,"ts":5,"client":{"name":"bot","version":"1"},"protocol_version":"1.0.0","requested":{"stream_observations":false,"role":"observer"}}"#;
    match parse_message(json).unwrap() {
        ParsedMessage::Hello(h) => assert_eq!(h.requested.role, Some(RequestedRole::Observer)),
        other => panic!("expected hello, got {:?}", other),
    }
}

#[test]
fn created_hello_parses_back() {
    let json = serde_json::to_string(&create_hello(1, "bot", "1.0.0")).unwrap();
    match parse_message(&json).unwrap() {
        ParsedMessage::Hello(h) => {
            assert_eq!(h.client.name, "bot");
            assert_eq!(h.protocol_version, "1.0.0");
            assert_eq!(h.requested.role, Some(RequestedRole::Auto));
        }
        other => panic!("expected hello, got {:?}", other),
    }
}

#[test]
fn command_modes_parse() {
    let cases = [
        (r#"{"type":"command","seq":2,"ts":0,"mode":"swap","swap":{"a":[1,2],"b":[1,3]}}"#, CommandMode::Swap),
        (r#"{"type":"command","seq":2,"ts":0,"mode":"activate","activate":{"x":4,"y":0}}"#, CommandMode::Activate),
        (r#"{"type":"command","seq":2,"ts":0,"mode":"cart","cart":{"x":0,"y":0,"color":3}}"#, CommandMode::Cart),
        (r#"{"type":"command","seq":2,"ts":0,"mode":"restart"}"#, CommandMode::Restart),
    ];
    for (json, mode) in cases {
        match parse_message(json).unwrap() {
            ParsedMessage::Command(c) => assert_eq!(c.mode, mode),
            other => panic!("expected command, got {:?}", other),
        }
    }

    match parse_message(cases[2].0).unwrap() {
        ParsedMessage::Command(c) => {
            let cart = c.cart.unwrap();
            assert_eq!((cart.x, cart.y, cart.color), (0, 0, Some(3)));
        }
        _ => unreachable!(),
    }
}

#[test]
fn unknown_type_and_bad_json() {
    match parse_message(r#"{"type":"dance","seq":9}"#).unwrap() {
        ParsedMessage::Unknown(u) => assert_eq!(u.seq, 9),
        other => panic!("expected unknown, got {:?}", other),
    }
    assert!(parse_message("{not json").is_err());
    // Known type with a bad body is a parse error, not an unknown message.
    assert!(parse_message(r#"{"type":"command","seq":1,"ts":0,"mode":"fly"}"#).is_err());
}

#[test]
fn control_parses() {
    match parse_message(r#"{"type":"control","seq":4,"ts":0,"action":"release"}"#).unwrap() {
        ParsedMessage::Control(c) => assert_eq!(c.action, ControlAction::Release),
        other => panic!("expected control, got {:?}", other),
    }
}

#[test]
fn welcome_lists_capabilities() {
    let w = create_welcome(1, "1.0.0", 7, AssignedRole::Observer, Some(3));
    let v = serde_json::to_value(&w).unwrap();
    assert_eq!(v["type"], "welcome");
    assert_eq!(v["client_id"], 7);
    assert_eq!(v["role"], "observer");
    assert_eq!(v["controller_id"], 3);
    assert_eq!(
        v["capabilities"]["command_modes"],
        serde_json::json!(["swap", "activate", "cart", "restart"])
    );
    assert!(v["capabilities"]["features"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("state_hash")));

    let w = create_welcome(1, "1.0.0", 7, AssignedRole::Controller, None);
    let v = serde_json::to_value(&w).unwrap();
    assert!(v.get("controller_id").is_none());
}

#[test]
fn error_codes_are_snake_case() {
    let e = create_error(3, ErrorCode::HandshakeRequired, "hello first");
    let v = serde_json::to_value(&e).unwrap();
    assert_eq!(v["type"], "error");
    assert_eq!(v["code"], "handshake_required");
    assert_eq!(v["message"], "hello first");

    assert_eq!(ErrorCode::from_request_code("busy"), ErrorCode::Busy);
    assert_eq!(ErrorCode::from_request_code("invalid_cell"), ErrorCode::InvalidCell);
    assert_eq!(ErrorCode::from_request_code("???"), ErrorCode::InvalidCommand);
}

#[test]
fn event_records_use_board_tokens() {
    let ev = GameEvent::BombCreated {
        cell: Cell::new(2, 0),
        piece: Piece::bomb(1, BombSize::Six),
    };
    let v = serde_json::to_value(EventRecord::from(&ev)).unwrap();
    assert_eq!(
        v,
        serde_json::json!({"event":"bomb_created","cell":[2,0],"piece":"B6:1"})
    );

    let v = serde_json::to_value(EventRecord::from(&GameEvent::LevelFinished(LevelOutcome::Won))).unwrap();
    assert_eq!(v, serde_json::json!({"event":"level_finished","outcome":"won"}));

    let v = serde_json::to_value(EventRecord::from(&GameEvent::GameOver)).unwrap();
    assert_eq!(v, serde_json::json!({"event":"game_over"}));
}

#[test]
fn observation_shows_holes_goals_and_cart() {
    let board = Board::parse(&["0 1 2", "1 # 0", "C:2 0 1"]).unwrap();
    let cfg = LevelConfig {
        width: 3,
        height: 3,
        color_count: 3,
        mask_rows: vec!["111".into(), "101".into()],
        goals: vec![Goal::ClearGem { color: 1, amount: 4 }],
        ..Default::default()
    };
    let gs = GameState::with_board(cfg, board, SimpleRng::new(1)).unwrap();
    let obs = build_observation(&gs.snapshot(), 12, &[]);
    let v = serde_json::to_value(&obs).unwrap();

    assert_eq!(v["type"], "observation");
    assert_eq!(v["seq"], 12);
    assert_eq!(v["board"]["cells"][0], serde_json::json!(["C:2", "0", "1"]));
    assert_eq!(v["board"]["cells"][1][1], "#");
    assert_eq!(
        v["goals"],
        serde_json::json!([{"kind":"clear_gem","color":1,"amount":4,"progress":0}])
    );
    assert_eq!(v["cart"]["charge"], 0);
    assert_eq!(v["cart"]["max"], 50);
    assert!(v.get("outcome").is_none());

    let hash = v["state_hash"].as_str().unwrap();
    assert_eq!(hash.len(), 16);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));

    let back: ObservationMessage = serde_json::from_value(v).unwrap();
    assert_eq!(back.state_hash, obs.state_hash);
}
