//! The control loop: read the stream, let the engine reconcile, prompt on the
//! local turn, send the move, repeat.

use board_core::{LocalAction, Step, SyncEngine};
use tracing::{info, warn};

use crate::clients::{EventStream, Transport};
use crate::error::ClientError;
use crate::prompt::Prompt;

/// How a session ended without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Resigned,
    /// The server reported the game as finished, with its status.
    GameOver(String),
    StreamEnded,
}

pub struct Session<T, P> {
    transport: T,
    prompt: P,
    game_id: String,
    engine: SyncEngine,
}

impl<T: Transport, P: Prompt> Session<T, P> {
    pub fn new(transport: T, prompt: P, game_id: &str, user_id: &str) -> Self {
        Self {
            transport,
            prompt,
            game_id: game_id.to_string(),
            engine: SyncEngine::new(user_id),
        }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Play the game until the user leaves, the game ends or an error occurs.
    /// The stream is closed on every path out of here.
    pub async fn run(&mut self) -> Result<Outcome, ClientError> {
        let mut stream = self.transport.open_stream(&self.game_id).await?;

        let result = self.drive(&mut stream).await;
        drop(stream);

        if result.is_err() {
            self.engine.abort();
        }
        result
    }

    async fn drive(&mut self, stream: &mut EventStream) -> Result<Outcome, ClientError> {
        while let Some(event) = stream.next_event().await? {
            match self.engine.handle_event(event)? {
                Step::Wait => {}
                Step::Prompt => {
                    if let Some(outcome) = self.play_local_move().await? {
                        return Ok(outcome);
                    }
                }
                Step::Finished(status) => return Ok(Outcome::GameOver(status)),
            }
        }

        info!(game_id = %self.game_id, "Game stream ended");
        Ok(Outcome::StreamEnded)
    }

    /// Prompt until the user plays a legal move or leaves the game.
    /// Returns `None` once a move has been sent.
    async fn play_local_move(&mut self) -> Result<Option<Outcome>, ClientError> {
        loop {
            let suggestions = self.engine.suggestions();
            let Some(line) = self.prompt.read_line(&suggestions).await? else {
                info!("Input closed");
                self.engine.abort();
                return Ok(Some(Outcome::Quit));
            };

            match self.engine.handle_input(&line)? {
                LocalAction::Quit => return Ok(Some(Outcome::Quit)),
                LocalAction::Resign => {
                    if let Err(err) = self.transport.resign(&self.game_id).await {
                        warn!(error = %err, "Resignation failed");
                    }
                    return Ok(Some(Outcome::Resigned));
                }
                LocalAction::Rejected(err) => {
                    self.prompt.notice(&format!("Invalid move: {err}")).await?;
                }
                LocalAction::Submit(mv) => {
                    self.transport.submit_move(&self.game_id, &mv.uci).await?;
                    info!(uci = %mv.uci, san = %mv.san, "Move sent");
                    return Ok(None);
                }
            }
        }
    }
}
