//! Adapter module - external control via TCP socket with a JSON protocol
//!
//! Lets an external agent (AI, bot, test harness) drive a match-3 game and
//! watch its state. Also loads level files.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//!    (unless it asks to be an observer)
//! 4. **Observations**: After every applied command, the game state and the
//!    events of that action are broadcast to streaming clients
//! 5. **Commanding**: Only the controller may send commands
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and requested capabilities
//! - **command**: `swap`, `activate`, `cart` or `restart`
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with role and capabilities
//! - **observation**: Board tokens, score, moves, cart meter, goals, events, `state_hash`
//! - **ack**: Command applied
//! - **error**: Error response with code and message
//!
//! Every client `seq` must strictly increase. A full command queue answers
//! `backpressure` instead of blocking.
//!
//! # Environment Variables
//!
//! - `MATCH3_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `MATCH3_AI_PORT`: Port number (default: 7878)
//! - `MATCH3_AI_MAX_PENDING`: Command queue capacity (default: 10)
//! - `MATCH3_AI_LOG_PATH`: Append every wire line to this JSONL file
//! - `MATCH3_AI_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":...,"board":{"width":6,"height":6,"cells":[["0","1",...],...]},...}
//! Client -> Server: {"type":"command","seq":2,"ts":0,"mode":"swap","swap":{"a":[1,0],"b":[1,1]}}
//! Server -> Client: {"type":"ack","seq":2,"ts":...,"status":"ok"}
//! Server -> Client: {"type":"observation","seq":2,...,"last_events":[{"event":"swap_applied","a":[1,0],"b":[1,1]},...]}
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod session;

pub use match3_core as core;
pub use match3_types as types;

pub use config::{load_level, parse_level, LevelFile};
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, run_server, ServerConfig, ServerState};
pub use session::Session;
