//! Game loop side of the adapter: applies inbound commands to a [`GameState`]
//! and produces the acks, errors and observations to send back.

use match3_core::{GameState, RandomSource, RequestError, SimpleRng};
use match3_types::GameEvent;

use crate::protocol::{create_ack, create_error, ErrorCode, ObservationMessage};
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::server::build_observation;

pub struct Session<R = SimpleRng> {
    game: GameState<R>,
    obs_seq: u64,
}

impl<R: RandomSource + Clone> Session<R> {
    /// Wrap a started game.
    pub fn new(game: GameState<R>) -> Self {
        Self { game, obs_seq: 0 }
    }

    pub fn game(&self) -> &GameState<R> {
        &self.game
    }

    /// Apply one command and run it to completion.
    pub fn apply(&mut self, cmd: ClientCommand) -> Result<Vec<GameEvent>, RequestError> {
        match cmd {
            ClientCommand::Swap { a, b } => self.game.request_swap(a, b)?,
            ClientCommand::Activate { cell } => self.game.request_activate_special(cell)?,
            ClientCommand::Cart { cell, color } => self.game.request_activate_cart(cell, color)?,
            ClientCommand::Restart => {
                self.game.restart();
                return Ok(self.game.ui_state_events().to_vec());
            }
        }
        Ok(self.game.resolve())
    }

    /// Next observation with its own sequence number.
    pub fn observation(&mut self, events: &[GameEvent]) -> ObservationMessage {
        self.obs_seq += 1;
        build_observation(&self.game.snapshot(), self.obs_seq, events)
    }

    /// Handle one inbound command from the server.
    pub fn handle(&mut self, inbound: InboundCommand) -> Vec<OutboundMessage> {
        let client_id = inbound.client_id;
        match inbound.payload {
            InboundPayload::SnapshotRequest => {
                let events = self.game.ui_state_events();
                vec![OutboundMessage::ToClientObservation {
                    client_id,
                    obs: self.observation(&events),
                }]
            }
            InboundPayload::Command(cmd) => match self.apply(cmd) {
                Ok(events) => {
                    for ev in &events {
                        if let GameEvent::LevelFinished(outcome) = ev {
                            println!(
                                "[Match3] Level finished: {} (score {}, moves left {})",
                                outcome.as_str(),
                                self.game.score(),
                                self.game.moves_left()
                            );
                        }
                    }
                    vec![
                        OutboundMessage::ToClientAck {
                            client_id,
                            ack: create_ack(inbound.seq),
                        },
                        OutboundMessage::BroadcastObservation {
                            obs: self.observation(&events),
                        },
                    ]
                }
                Err(e) => vec![OutboundMessage::ToClientError {
                    client_id,
                    err: create_error(
                        inbound.seq,
                        ErrorCode::from_request_code(e.code()),
                        e.message(),
                    ),
                }],
            },
        }
    }
}
