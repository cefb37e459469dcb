//! Protocol module - JSON message types for the AI adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sequence number)
//! and `ts` (timestamp in ms).

use serde::{Deserialize, Serialize};

use match3_core::{CellView, Goal, GoalProgress};
use match3_types::{Cell, GameEvent, GamePhase, LevelOutcome};

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[default]
    #[serde(rename = "command")]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[default]
    #[serde(rename = "control")]
    Control,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    pub stream_observations: bool,
    /// Only `observer` changes anything: such a client is never made controller on hello.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RequestedRole>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedRole {
    Auto,
    Controller,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedRole {
    Controller,
    Observer,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub mode: CommandMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate: Option<CellRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    Swap,
    Activate,
    Cart,
    Restart,
}

/// `{"a":[x,y],"b":[x,y]}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCommand {
    pub a: [i8; 2],
    pub b: [i8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub x: i8,
    pub y: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCommand {
    pub x: i8,
    pub y: i8,
    /// Target color; omitted means a random color present on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
}

/// Control message (claim/release controller status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ControlType,
    pub seq: u64,
    pub ts: u64,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Claim,
    Release,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    ControllerActive,
    InvalidCommand,
    /// Request rejected by the game gate while an action is resolving.
    Busy,
    NotPlayable,
    InvalidCell,
    InvalidActivation,
    Backpressure,
}

impl ErrorCode {
    /// Map a core rejection code onto the wire enum.
    pub fn from_request_code(code: &str) -> Self {
        match code {
            "busy" => ErrorCode::Busy,
            "not_playable" => ErrorCode::NotPlayable,
            "invalid_cell" => ErrorCode::InvalidCell,
            "invalid_activation" => ErrorCode::InvalidActivation,
            _ => ErrorCode::InvalidCommand,
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub command_modes: Vec<CommandMode>,
    pub features: Vec<CapabilityFeature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityFeature {
    Holes,
    Goals,
    Cart,
    LastEvents,
    StateHash,
}

/// Acknowledgment for command receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Game state observation (sent to all streaming clients)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub playable: bool,
    pub busy: bool,
    pub game_over: bool,
    pub phase: PhaseLower,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeLower>,
    pub episode_id: u32,
    pub action_id: u32,
    pub seed: u32,
    pub board: BoardSnapshot,
    pub score: u32,
    pub moves_left: u32,
    pub cart: CartSnapshot,
    pub goals: Vec<GoalSnapshot>,
    /// Events of the action that produced this observation, in order.
    pub last_events: Vec<EventRecord>,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    /// `cells[y][x]`, bottom row first. `"#"` hole, `"."` empty, else a piece token.
    pub cells: Vec<Vec<String>>,
}

impl BoardSnapshot {
    pub fn from_rows(width: u8, height: u8, rows: &[Vec<CellView>]) -> Self {
        Self {
            width,
            height,
            cells: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub charge: u32,
    pub max: u32,
    pub meter: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLower {
    Input,
    Swapping,
    Resolving,
    GameOver,
}

impl From<GamePhase> for PhaseLower {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Input => Self::Input,
            GamePhase::Swapping => Self::Swapping,
            GamePhase::Resolving => Self::Resolving,
            GamePhase::GameOver => Self::GameOver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeLower {
    Won,
    Lost,
}

impl From<LevelOutcome> for OutcomeLower {
    fn from(value: LevelOutcome) -> Self {
        match value {
            LevelOutcome::Won => Self::Won,
            LevelOutcome::Lost => Self::Lost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub kind: GoalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
    pub amount: u32,
    pub progress: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    ClearGem,
    ClearBomb,
    FillCart,
}

impl From<&GoalProgress> for GoalSnapshot {
    fn from(g: &GoalProgress) -> Self {
        let (kind, color) = match g.goal {
            Goal::ClearGem { color, .. } => (GoalKind::ClearGem, Some(color)),
            Goal::ClearBomb { .. } => (GoalKind::ClearBomb, None),
            Goal::FillCart { .. } => (GoalKind::FillCart, None),
        };
        Self {
            kind,
            color,
            amount: g.goal.amount(),
            progress: g.progress,
        }
    }
}

/// Wire form of a [`GameEvent`]. Cells are `[x, y]`, pieces are board tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventRecord {
    PhaseChanged { phase: PhaseLower },
    SwapApplied { a: [i8; 2], b: [i8; 2] },
    SwapReverted { a: [i8; 2], b: [i8; 2] },
    PieceCleared { cell: [i8; 2], piece: String },
    BombCreated { cell: [i8; 2], piece: String },
    CartSpawned { cell: [i8; 2], piece: String },
    PieceMoved { from: [i8; 2], to: [i8; 2] },
    PieceSpawned { cell: [i8; 2], piece: String },
    ScoreChanged { score: u32 },
    MovesChanged { moves_left: u32 },
    CartMeterChanged { meter: f32 },
    ObjectivesChanged,
    GameOver,
    LevelFinished { outcome: OutcomeLower },
}

fn xy(c: Cell) -> [i8; 2] {
    [c.x, c.y]
}

impl From<&GameEvent> for EventRecord {
    fn from(ev: &GameEvent) -> Self {
        match *ev {
            GameEvent::PhaseChanged(p) => Self::PhaseChanged { phase: p.into() },
            GameEvent::SwapApplied { a, b } => Self::SwapApplied { a: xy(a), b: xy(b) },
            GameEvent::SwapReverted { a, b } => Self::SwapReverted { a: xy(a), b: xy(b) },
            GameEvent::PieceCleared { cell, piece } => Self::PieceCleared {
                cell: xy(cell),
                piece: piece.to_string(),
            },
            GameEvent::BombCreated { cell, piece } => Self::BombCreated {
                cell: xy(cell),
                piece: piece.to_string(),
            },
            GameEvent::CartSpawned { cell, piece } => Self::CartSpawned {
                cell: xy(cell),
                piece: piece.to_string(),
            },
            GameEvent::PieceMoved(m) => Self::PieceMoved {
                from: xy(m.from),
                to: xy(m.to),
            },
            GameEvent::PieceSpawned { cell, piece } => Self::PieceSpawned {
                cell: xy(cell),
                piece: piece.to_string(),
            },
            GameEvent::ScoreChanged(score) => Self::ScoreChanged { score },
            GameEvent::MovesChanged(moves_left) => Self::MovesChanged { moves_left },
            GameEvent::CartMeterChanged(meter) => Self::CartMeterChanged { meter },
            GameEvent::ObjectivesChanged => Self::ObjectivesChanged,
            GameEvent::GameOver => Self::GameOver,
            GameEvent::LevelFinished(o) => Self::LevelFinished { outcome: o.into() },
        }
    }
}

/// Deterministic state hash serialized as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "control")]
        Control(ControlMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Control(m)) => Ok(ParsedMessage::Control(m)),
        Err(e) => {
            // An unknown `type` is answered with an error, not treated as malformed JSON.
            #[derive(Debug, Deserialize)]
            struct Envelope<'a> {
                #[serde(rename = "type", borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let env = serde_json::from_str::<Envelope>(json)?;
            match env.msg_type {
                Some("hello") | Some("command") | Some("control") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: env.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Control(ControlMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities {
            stream_observations: true,
            role: Some(RequestedRole::Auto),
        },
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        controller_id,
        game_id: "match3".to_string(),
        capabilities: ServerCapabilities {
            command_modes: vec![
                CommandMode::Swap,
                CommandMode::Activate,
                CommandMode::Cart,
                CommandMode::Restart,
            ],
            features: vec![
                CapabilityFeature::Holes,
                CapabilityFeature::Goals,
                CapabilityFeature::Cart,
                CapabilityFeature::LastEvents,
                CapabilityFeature::StateHash,
            ],
        },
    }
}

/// Create an acknowledgment for the command with sequence number `seq`
pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_types::{Move, Piece};

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"test-ai","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "test-ai");
                assert_eq!(msg.protocol_version, "1.0.0");
                assert!(msg.requested.role.is_none());
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_parse_command_swap() {
        let json = r#"{"type":"command","seq":2,"ts":1,"mode":"swap","swap":{"a":[1,0],"b":[1,1]}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.mode, CommandMode::Swap);
                let swap = msg.swap.unwrap();
                assert_eq!(swap.a, [1, 0]);
                assert_eq!(swap.b, [1, 1]);
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_command_cart_without_color() {
        let json = r#"{"type":"command","seq":3,"ts":1,"mode":"cart","cart":{"x":0,"y":0}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.mode, CommandMode::Cart);
                assert_eq!(msg.cart.unwrap().color, None);
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_control() {
        let json = r#"{"type":"control","seq":3,"ts":1234567910,"action":"release"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Control(msg) => assert_eq!(msg.action, ControlAction::Release),
            _ => panic!("Expected Control message"),
        }
    }

    #[test]
    fn test_unknown_type_is_not_a_parse_error() {
        match parse_message(r#"{"type":"ping","seq":9}"#).unwrap() {
            ParsedMessage::Unknown(u) => assert_eq!(u.seq, 9),
            _ => panic!("Expected Unknown message"),
        }
        assert!(parse_message(r#"{"type":"command","seq":4}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, "1.0.0", 7, AssignedRole::Controller, Some(7));
        let v = serde_json::to_value(&welcome).unwrap();
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["role"], "controller");
        assert_eq!(v["game_id"], "match3");
        assert_eq!(v["capabilities"]["command_modes"][0], "swap");
    }

    #[test]
    fn test_error_codes_serialize_snake_case() {
        let error = create_error(5, ErrorCode::NotController, "Only controller may send commands");
        let v = serde_json::to_value(&error).unwrap();
        assert_eq!(v["code"], "not_controller");
        assert_eq!(ErrorCode::from_request_code("busy"), ErrorCode::Busy);
        assert_eq!(
            ErrorCode::from_request_code("invalid_activation"),
            ErrorCode::InvalidActivation
        );
    }

    #[test]
    fn test_state_hash_hex() {
        let json = serde_json::to_string(&StateHash(0xab)).unwrap();
        assert_eq!(json, "\"00000000000000ab\"");
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateHash(0xab));
    }

    #[test]
    fn test_event_records() {
        let ev = GameEvent::PieceCleared {
            cell: Cell::new(2, 3),
            piece: Piece::plain(1),
        };
        let v = serde_json::to_value(EventRecord::from(&ev)).unwrap();
        assert_eq!(v["event"], "piece_cleared");
        assert_eq!(v["cell"], serde_json::json!([2, 3]));
        assert_eq!(v["piece"], "1");

        let ev = GameEvent::PieceMoved(Move {
            from: Cell::new(0, 4),
            to: Cell::new(0, 1),
        });
        let v = serde_json::to_value(EventRecord::from(&ev)).unwrap();
        assert_eq!(v["from"], serde_json::json!([0, 4]));

        let v = serde_json::to_value(EventRecord::from(&GameEvent::GameOver)).unwrap();
        assert_eq!(v, serde_json::json!({"event": "game_over"}));
    }
}
